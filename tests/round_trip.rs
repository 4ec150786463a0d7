use pretty_assertions::assert_eq;
use tempfile::TempDir;
use todo::io::persist::{load_todos, save_todos};
use todo::io::storage::{FileStore, MemoryStore};
use todo::model::todo::Todo;
use todo::ops::list_state::ListStateManager;

fn item(id: &str, text: &str, done: bool) -> Todo {
    Todo {
        id: id.to_string(),
        text: text.to_string(),
        done,
    }
}

/// Helper: save through a FileStore, load back, and assert equality
fn assert_file_round_trip(todos: Vec<Todo>) {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path());
    save_todos(&mut store, "todos", &todos).unwrap();
    let loaded = load_todos(&store, "todos").unwrap();
    assert_eq!(loaded, Some(todos));
}

#[test]
fn round_trip_empty() {
    assert_file_round_trip(vec![]);
}

#[test]
fn round_trip_mixed() {
    assert_file_round_trip(vec![
        item("c", "third", false),
        item("b", "second", true),
        item("a", "first", false),
    ]);
}

#[test]
fn round_trip_awkward_text() {
    assert_file_round_trip(vec![
        item("q", "quotes \" and \\ backslashes", false),
        item("u", "unicode: café ☕ 日本語", true),
        item("n", "line\nbreak\ttab", false),
        item("s", "  leading and trailing  ", false),
    ]);
}

#[test]
fn manager_state_survives_reload_through_files() {
    let dir = TempDir::new().unwrap();

    let mut list = ListStateManager::load(FileStore::new(dir.path()), "todos").unwrap();
    list.add("a").unwrap();
    let b = list.add("b").unwrap().unwrap();
    list.add("c").unwrap();
    list.toggle(&b).unwrap();
    let expected = list.items().to_vec();

    let reloaded = ListStateManager::load(FileStore::new(dir.path()), "todos").unwrap();
    assert_eq!(reloaded.items(), expected.as_slice());
    assert_eq!(reloaded.remaining_count(), 2);
}

#[test]
fn memory_and_file_stores_agree() {
    let dir = TempDir::new().unwrap();
    let todos = vec![item("x", "one", true), item("y", "two", false)];

    let mut file = FileStore::new(dir.path());
    let mut memory = MemoryStore::new();
    save_todos(&mut file, "todos", &todos).unwrap();
    save_todos(&mut memory, "todos", &todos).unwrap();

    let on_disk = std::fs::read_to_string(dir.path().join("todos.json")).unwrap();
    assert_eq!(Some(on_disk.as_str()), memory.raw("todos"));
}
