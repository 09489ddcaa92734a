use std::env;
use std::path::PathBuf;

/// Read a directory from the environment variable `name`.
///
/// Unset and empty variables are treated the same way. A leading `~` is
/// expanded, since CI configurations tend to pass it through unexpanded.
pub fn get_env_path(name: &str) -> Option<PathBuf> {
    let value = env::var(name).ok()?;
    if value.trim().is_empty() {
        return None;
    }
    Some(expand_path(&value))
}

pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}
