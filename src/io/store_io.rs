use std::path::{Path, PathBuf};

use crate::io::config_io;
use crate::io::state;
use crate::io::storage::{FileStore, StorageError};
use crate::model::config::StoreConfig;
use crate::model::todo::Filter;
use crate::ops::list_state::ListStateManager;

/// Name of the directory holding a todo store
pub const TODO_DIR: &str = ".todo";

/// Error type for locating and opening a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no todo list found: run `todo init` to create one")]
    NotAStore,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse todo.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A located store directory and its configuration
#[derive(Debug, Clone)]
pub struct TodoStore {
    /// Directory containing `.todo/`
    pub root: PathBuf,
    /// The `.todo/` directory itself
    pub todo_dir: PathBuf,
    pub config: StoreConfig,
}

impl TodoStore {
    /// Load the list held by this store.
    pub fn open_list(&self) -> Result<ListStateManager<FileStore>, StoreError> {
        let store = FileStore::new(&self.todo_dir);
        let mut list = ListStateManager::load(store, &self.config.storage.key)?;
        log::debug!(
            "loaded {} items from {}",
            list.items().len(),
            self.todo_dir.display()
        );
        list.set_filter(self.current_filter());
        Ok(list)
    }

    /// The filter saved in .state.json, falling back to the configured default.
    pub fn current_filter(&self) -> Filter {
        state::read_ui_state(&self.todo_dir)
            .and_then(|s| s.filter)
            .unwrap_or(self.config.display.default_filter)
    }

    pub fn save_filter(&self, filter: Filter) -> Result<(), StoreError> {
        let mut ui = state::read_ui_state(&self.todo_dir).unwrap_or_default();
        ui.filter = Some(filter);
        state::write_ui_state(&self.todo_dir, &ui)?;
        Ok(())
    }
}

/// Find the store by walking up from `start`, looking for a `.todo/` directory.
pub fn discover_store(start: &Path) -> Result<PathBuf, StoreError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(TODO_DIR).is_dir() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(StoreError::NotAStore);
        }
    }
}

/// Open the store rooted at `root`.
pub fn load_store(root: &Path) -> Result<TodoStore, StoreError> {
    let todo_dir = root.join(TODO_DIR);
    if !todo_dir.is_dir() {
        return Err(StoreError::NotAStore);
    }
    let config = config_io::read_config(&todo_dir)?;
    Ok(TodoStore {
        root: root.to_path_buf(),
        todo_dir,
        config,
    })
}
