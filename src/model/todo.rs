use serde::{Deserialize, Serialize};
use std::fmt;

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Opaque unique id (UUID v4), never changes after creation
    pub id: String,
    /// User-entered label, stored exactly as given
    pub text: String,
    /// Completion flag
    pub done: bool,
}

impl Todo {
    /// Create a fresh, not-done entry with a newly generated id
    pub fn new(text: String) -> Self {
        Todo {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            done: false,
        }
    }

    /// The first `width` characters of the id, for display
    pub fn short_id(&self, width: usize) -> &str {
        match self.id.char_indices().nth(width) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

/// True when `text` has something other than whitespace in it
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Which subset of the list is on display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// The predicate for this filter
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.done,
            Filter::Completed => todo.done,
        }
    }

    pub fn parse_filter(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Filter::All),
            "active" => Some(Filter::Active),
            "completed" => Some(Filter::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Active => write!(f, "active"),
            Filter::Completed => write!(f, "completed"),
        }
    }
}
