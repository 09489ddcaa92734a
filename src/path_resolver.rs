//! Host/container path translation and binary lookup.
//!
//! The project root on the controlling host is mounted at a fixed location
//! inside the execution containers (`/home` by default). Every path handed to
//! an execution unit goes through [`PathResolver::resolve_path`] so that the
//! same configuration works for both native and containerized runs.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::ApplicationError;
use crate::helpers::{find_project_root, get_env_path};
use crate::prelude::*;

/// Mount point of the project root inside the execution containers.
pub const CONTAINER_ROOT: &str = "/home";

/// Overrides the discovered project root.
pub const PROJECT_ROOT_ENV: &str = "BM_PROJECT_ROOT";

#[derive(Debug, Clone, PartialEq)]
pub struct PathResolver {
    project_root: PathBuf,
    container_root: PathBuf,
}

impl PathResolver {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            container_root: PathBuf::from(CONTAINER_ROOT),
        }
    }

    pub fn with_container_root(mut self, container_root: impl Into<PathBuf>) -> Self {
        self.container_root = container_root.into();
        self
    }

    /// Build a resolver for the project the process runs in.
    ///
    /// The root is taken from `BM_PROJECT_ROOT` when set, otherwise from the
    /// closest ancestor of the current directory holding a `.git` entry, and
    /// finally falls back to the current directory itself.
    pub fn discover() -> Result<Self> {
        if let Some(project_root) = get_env_path(PROJECT_ROOT_ENV) {
            debug!(
                "Using project root {} from {PROJECT_ROOT_ENV}",
                project_root.display()
            );
            return Ok(Self::new(project_root));
        }

        let current_dir = env::current_dir().context("Failed to read the current directory")?;
        let project_root = find_project_root(&current_dir).unwrap_or(current_dir);
        debug!("Using project root {}", project_root.display());
        Ok(Self::new(project_root))
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn container_root(&self) -> &Path {
        &self.container_root
    }

    /// Map `input` to the path an execution unit should use.
    ///
    /// Relative inputs are taken as relative to the project root. Absolute
    /// inputs under the project root are rebased onto the container mount
    /// point when `in_container` is set and kept as is otherwise. Absolute
    /// inputs outside the project root are never rewritten.
    pub fn resolve_path(&self, input: impl AsRef<Path>, in_container: bool) -> PathBuf {
        let input = input.as_ref();

        let relative = if input.is_absolute() {
            match input.strip_prefix(&self.project_root) {
                Ok(relative) if in_container => relative.to_path_buf(),
                _ => return input.to_path_buf(),
            }
        } else {
            input
                .components()
                .filter(|component| !matches!(component, Component::CurDir))
                .collect::<PathBuf>()
        };

        let base = if in_container {
            &self.container_root
        } else {
            &self.project_root
        };

        if relative.as_os_str().is_empty() {
            base.clone()
        } else {
            base.join(relative)
        }
    }

    /// Express `path` relative to the project root, if it lives under it.
    pub fn strip_project_root(&self, path: &Path) -> Option<PathBuf> {
        path.strip_prefix(&self.project_root)
            .ok()
            .map(Path::to_path_buf)
    }
}

/// Locate the executable or script `name`.
///
/// The first match wins:
/// 1. `<$env_var_dir>/<name>`, when `env_var_dir` names a set variable;
/// 2. the bare `name`, when it is an executable found on `PATH`;
/// 3. `<dir>/<name>`.
pub fn ensure_exists(
    name: &str,
    dir: Option<&Path>,
    env_var_dir: Option<&str>,
) -> std::result::Result<PathBuf, ApplicationError> {
    let mut searched = Vec::new();

    if let Some(env_var) = env_var_dir {
        match get_env_path(env_var) {
            Some(env_dir) => {
                let candidate = env_dir.join(name);
                if candidate.is_file() {
                    debug!("Found {name} through {env_var} at {}", candidate.display());
                    return Ok(candidate);
                }
                searched.push(env_dir);
            }
            None => trace!("{env_var} is not set, skipping it for {name}"),
        }
    }

    if exists_system_wide(name) {
        debug!("Found {name} on PATH");
        return Ok(PathBuf::from(name));
    }

    if let Some(dir) = dir {
        let candidate = dir.join(name);
        if candidate.is_file() {
            debug!("Found {name} at {}", candidate.display());
            return Ok(candidate);
        }
        searched.push(dir.to_path_buf());
    }

    Err(ApplicationError::NotFound {
        name: name.to_owned(),
        searched,
    })
}

/// Whether `name` is an executable reachable through `PATH`.
pub fn exists_system_wide(name: &str) -> bool {
    if name.is_empty() || name.contains(std::path::MAIN_SEPARATOR) {
        return false;
    }

    let Some(paths) = env::var_os("PATH") else {
        return false;
    };

    env::split_paths(&paths).any(|dir| is_executable(&dir.join(name)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
