use std::path::{Path, PathBuf};

/// Walk up from `base_dir` until a directory holding a `.git` entry is found.
pub fn find_project_root(base_dir: &Path) -> Option<PathBuf> {
    let current_dir = base_dir.canonicalize().ok()?;

    for ancestor in current_dir.ancestors() {
        if ancestor.join(".git").exists() {
            return Some(ancestor.to_path_buf());
        }
    }

    log::debug!(
        "Could not find a project root above {}",
        current_dir.display()
    );

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_project_root_from_nested_dir() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let base_dir = tmp_dir.path().join("csb");
        std::fs::create_dir_all(base_dir.join(".git")).unwrap();
        let nested_dir = base_dir.join("build").join("bench");
        std::fs::create_dir_all(&nested_dir).unwrap();

        let project_root = find_project_root(&nested_dir).unwrap();
        assert_eq!(project_root, base_dir.canonicalize().unwrap());
    }

    #[test]
    fn test_find_project_root_without_git_dir() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let base_dir = tmp_dir.path().join("csb");
        std::fs::create_dir_all(&base_dir).unwrap();

        // The temp dir itself may live inside a repository, only check that
        // the lookup never stops at the directory without `.git`.
        let project_root = find_project_root(&base_dir);
        assert_ne!(project_root, Some(base_dir.canonicalize().unwrap()));
    }
}
