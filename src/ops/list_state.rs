use crate::io::persist;
use crate::io::storage::{KeyValueStore, StorageError};
use crate::model::todo::{Filter, Todo, is_blank};

/// Owns the todo collection and keeps it in sync with a store.
///
/// The collection is newest-first. Every operation that changes it writes
/// the whole collection back under `key`; operations that change nothing
/// (unknown id, blank text) return `Ok(false)` and write nothing.
pub struct ListStateManager<S: KeyValueStore> {
    store: S,
    key: String,
    todos: Vec<Todo>,
    filter: Filter,
    remaining: usize,
}

impl<S: KeyValueStore> ListStateManager<S> {
    /// Load the collection stored under `key`. Missing or unreadable data
    /// starts an empty list.
    pub fn load(store: S, key: &str) -> Result<Self, StorageError> {
        let todos = persist::load_todos(&store, key)?.unwrap_or_default();
        let remaining = count_remaining(&todos);
        Ok(ListStateManager {
            store,
            key: key.to_string(),
            todos,
            filter: Filter::All,
            remaining,
        })
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Prepend a new todo. Returns its id, or `None` if `text` is blank.
    pub fn add(&mut self, text: &str) -> Result<Option<String>, StorageError> {
        if is_blank(text) {
            return Ok(None);
        }
        let todo = Todo::new(text.to_string());
        let id = todo.id.clone();
        self.todos.insert(0, todo);
        self.commit()?;
        Ok(Some(id))
    }

    /// Flip `done` on the todo with `id`.
    pub fn toggle(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(todo) = self.find_mut(id) else {
            return Ok(false);
        };
        todo.done = !todo.done;
        self.commit()?;
        Ok(true)
    }

    /// Replace the text of the todo with `id`. Blank or unchanged text is ignored.
    pub fn rename(&mut self, id: &str, new_text: &str) -> Result<bool, StorageError> {
        if is_blank(new_text) {
            return Ok(false);
        }
        let Some(todo) = self.find_mut(id) else {
            return Ok(false);
        };
        if todo.text == new_text {
            return Ok(false);
        }
        todo.text = new_text.to_string();
        self.commit()?;
        Ok(true)
    }

    /// Remove the todo with `id`.
    pub fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != id);
        if self.todos.len() == before {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    /// Remove every completed todo, keeping the rest in order.
    /// Returns how many were removed.
    pub fn clear_completed(&mut self) -> Result<usize, StorageError> {
        let before = self.todos.len();
        self.todos.retain(|t| !t.done);
        let removed = before - self.todos.len();
        if removed > 0 {
            self.commit()?;
        }
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    /// Select which todos `visible_items` returns. Never touches the collection.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Todos passing the current filter, in collection order.
    pub fn visible_items(&self) -> Vec<&Todo> {
        self.todos.iter().filter(|t| self.filter.matches(t)).collect()
    }

    /// Number of todos not yet done.
    pub fn remaining_count(&self) -> usize {
        self.remaining
    }

    /// The whole collection, newest first.
    pub fn items(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Expand a unique id prefix to the full id.
    ///
    /// An exact match always wins; otherwise the prefix must match exactly one todo.
    pub fn resolve_id(&self, prefix: &str) -> Option<&str> {
        if prefix.is_empty() {
            return None;
        }
        if let Some(todo) = self.get(prefix) {
            return Some(&todo.id);
        }
        let mut matches = self.todos.iter().filter(|t| t.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(todo), None) => Some(&todo.id),
            _ => None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The collection as it would be written to the store.
    pub fn snapshot(&self) -> Result<String, StorageError> {
        Ok(persist::encode_todos(&self.todos)?)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn find_mut(&mut self, id: &str) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| t.id == id)
    }

    /// Write the collection back and refresh the derived count.
    fn commit(&mut self) -> Result<(), StorageError> {
        self.remaining = count_remaining(&self.todos);
        persist::save_todos(&mut self.store, &self.key, &self.todos)
    }
}

fn count_remaining(todos: &[Todo]) -> usize {
    todos.iter().filter(|t| !t.done).count()
}
