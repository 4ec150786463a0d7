use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::todo::Filter;

/// Persisted view state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Filter last chosen with `todo filter`
    #[serde(default)]
    pub filter: Option<Filter>,
}

/// Read .state.json from the store directory
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let path = dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the store directory
pub fn write_ui_state(dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
