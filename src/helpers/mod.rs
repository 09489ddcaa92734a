mod env_path;
mod find_project_root;

pub use env_path::{expand_path, get_env_path};
pub use find_project_root::find_project_root;
