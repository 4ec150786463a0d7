use serde::Serialize;

use crate::model::todo::{Filter, Todo};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TodoJson<'a> {
    pub id: &'a str,
    pub text: &'a str,
    pub done: bool,
}

#[derive(Serialize)]
pub struct ListJson<'a> {
    pub filter: Filter,
    pub items: Vec<TodoJson<'a>>,
    pub remaining: usize,
}

#[derive(Serialize)]
pub struct CountJson {
    pub remaining: usize,
    pub total: usize,
}

/// Result of a single mutating command
#[derive(Serialize)]
pub struct ChangeJson {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,
    pub remaining: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn todo_to_json(todo: &Todo) -> TodoJson<'_> {
    TodoJson {
        id: &todo.id,
        text: &todo.text,
        done: todo.done,
    }
}

pub fn list_to_json<'a>(filter: Filter, visible: &[&'a Todo], remaining: usize) -> ListJson<'a> {
    ListJson {
        filter,
        items: visible.iter().map(|&t| todo_to_json(t)).collect(),
        remaining,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single todo as `[x] <short id> <text>`
pub fn format_todo_line(todo: &Todo, id_width: usize) -> String {
    let check = if todo.done { 'x' } else { ' ' };
    format!("[{}] {} {}", check, todo.short_id(id_width), todo.text)
}

/// `1 item left`, `3 items left`
pub fn format_remaining(remaining: usize) -> String {
    if remaining == 1 {
        "1 item left".to_string()
    } else {
        format!("{} items left", remaining)
    }
}

/// The list view: one line per visible todo, a blank line, then the count.
pub fn format_list(visible: &[&Todo], remaining: usize, id_width: usize) -> Vec<String> {
    let mut lines: Vec<String> = visible
        .iter()
        .map(|t| format_todo_line(t, id_width))
        .collect();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format_remaining(remaining));
    lines
}
