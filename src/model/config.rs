use serde::{Deserialize, Serialize};

use crate::model::todo::Filter;

/// Configuration from todo.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the collection is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig { key: default_key() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Filter used when no filter has been chosen yet
    #[serde(default)]
    pub default_filter: Filter,
    /// Number of id characters shown in list output
    #[serde(default = "default_id_width")]
    pub id_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            default_filter: Filter::All,
            id_width: default_id_width(),
        }
    }
}

/// Default key; also written by `todo init`
pub const DEFAULT_KEY: &str = "todos";

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

fn default_id_width() -> usize {
    8
}
