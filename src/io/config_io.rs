use std::fs;
use std::path::{Path, PathBuf};

use crate::io::store_io::StoreError;
use crate::model::config::StoreConfig;

/// Path of the config file inside a store directory
pub fn config_path(todo_dir: &Path) -> PathBuf {
    todo_dir.join("todo.toml")
}

/// Read todo.toml. A missing file yields the defaults; a file that is
/// present but unparseable is an error.
pub fn read_config(todo_dir: &Path) -> Result<StoreConfig, StoreError> {
    let path = config_path(todo_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoreConfig::default()),
        Err(e) => return Err(StoreError::ReadError { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}
