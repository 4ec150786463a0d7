mod init;
pub use init::{cmd_init, init_store};

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::storage::{FileStore, StorageError};
use crate::io::store_io::{self, StoreError, TodoStore};
use crate::model::todo::Filter;
use crate::ops::list_state::ListStateManager;

type CmdResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let dir = match cli.dir {
        Some(ref d) => Some(
            std::fs::canonicalize(d).map_err(|e| format!("cannot resolve -C path '{}': {}", d, e))?,
        ),
        None => None,
    };
    let dir = dir.as_deref();

    match cli.command {
        None => cmd_list(ListArgs { filter: None }, dir, json),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, dir),

            // Read commands
            Commands::List(args) => cmd_list(args, dir, json),
            Commands::Count => cmd_count(dir, json),
            Commands::Recovery(args) => cmd_recovery(args, dir, json),

            // Write commands
            Commands::Add(args) => cmd_add(args, dir, json),
            Commands::Toggle(args) => cmd_toggle(args, dir, json),
            Commands::Edit(args) => cmd_edit(args, dir, json),
            Commands::Rm(args) => cmd_rm(args, dir, json),
            Commands::Clear => cmd_clear(dir, json),
            Commands::Filter(args) => cmd_filter(args, dir, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_store_cwd(dir: Option<&Path>) -> Result<TodoStore, StoreError> {
    let start: PathBuf = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let root = store_io::discover_store(&start)?;
    store_io::load_store(&root)
}

fn open_cwd(dir: Option<&Path>) -> Result<(TodoStore, ListStateManager<FileStore>), StoreError> {
    let store = load_store_cwd(dir)?;
    let list = store.open_list()?;
    Ok((store, list))
}

fn parse_filter(s: &str) -> Result<Filter, String> {
    Filter::parse_filter(s).ok_or_else(|| {
        format!(
            "unknown filter \"{}\" (expected all, active or completed)",
            s
        )
    })
}

/// Map a command-line id to a full id. Unknown prefixes pass through
/// unchanged, so the operation they feed is a no-op.
fn resolve(list: &ListStateManager<FileStore>, arg: &str) -> String {
    list.resolve_id(arg).unwrap_or(arg).to_string()
}

/// If a save failed, keep what should have been written in the recovery log.
fn check_saved<T>(list: &ListStateManager<FileStore>, result: Result<T, StorageError>) -> Result<T, Box<dyn Error>> {
    match result {
        Ok(v) => Ok(v),
        Err(e) => {
            let body = list.snapshot().unwrap_or_default();
            recovery::log_recovery(
                list.store().dir(),
                RecoveryEntry {
                    timestamp: Utc::now(),
                    category: RecoveryCategory::Write,
                    description: "save failed".to_string(),
                    fields: vec![("Error".to_string(), e.to_string())],
                    body,
                },
            );
            Err(e.into())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_change(
    list: &ListStateManager<FileStore>,
    changed: bool,
    id: Option<String>,
    removed: Option<usize>,
) -> CmdResult {
    print_json(&ChangeJson {
        changed,
        id,
        removed,
        remaining: list.remaining_count(),
    })
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, dir: Option<&Path>, json: bool) -> CmdResult {
    let (store, mut list) = open_cwd(dir)?;
    if let Some(ref f) = args.filter {
        list.set_filter(parse_filter(f)?);
    }

    let visible = list.visible_items();
    if json {
        return print_json(&list_to_json(list.filter(), &visible, list.remaining_count()));
    }
    for line in format_list(&visible, list.remaining_count(), store.config.display.id_width) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_count(dir: Option<&Path>, json: bool) -> CmdResult {
    let (_store, list) = open_cwd(dir)?;
    if json {
        return print_json(&CountJson {
            remaining: list.remaining_count(),
            total: list.items().len(),
        });
    }
    println!("{}", list.remaining_count());
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, dir: Option<&Path>, json: bool) -> CmdResult {
    let (store, mut list) = open_cwd(dir)?;
    let text = args.text.join(" ");
    let result = list.add(&text);
    let id = check_saved(&list, result)?;

    if json {
        return print_change(&list, id.is_some(), id, None);
    }
    if let Some(ref id) = id
        && let Some(todo) = list.get(id)
    {
        println!("{}", todo.short_id(store.config.display.id_width));
    }
    Ok(())
}

fn cmd_toggle(args: IdArgs, dir: Option<&Path>, json: bool) -> CmdResult {
    let (store, mut list) = open_cwd(dir)?;
    let id = resolve(&list, &args.id);
    let result = list.toggle(&id);
    let changed = check_saved(&list, result)?;
    print_updated(&store, &list, &id, changed, json)
}

fn cmd_edit(args: EditArgs, dir: Option<&Path>, json: bool) -> CmdResult {
    let (store, mut list) = open_cwd(dir)?;
    let id = resolve(&list, &args.id);
    let text = args.text.join(" ");
    let result = list.rename(&id, &text);
    let changed = check_saved(&list, result)?;
    print_updated(&store, &list, &id, changed, json)
}

/// After toggle/edit: the changed line, or nothing for a no-op
fn print_updated(
    store: &TodoStore,
    list: &ListStateManager<FileStore>,
    id: &str,
    changed: bool,
    json: bool,
) -> CmdResult {
    if json {
        return print_change(list, changed, changed.then(|| id.to_string()), None);
    }
    if changed && let Some(todo) = list.get(id) {
        println!("{}", format_todo_line(todo, store.config.display.id_width));
    }
    Ok(())
}

fn cmd_rm(args: IdArgs, dir: Option<&Path>, json: bool) -> CmdResult {
    let (_store, mut list) = open_cwd(dir)?;
    let id = resolve(&list, &args.id);
    let result = list.delete(&id);
    let changed = check_saved(&list, result)?;
    if json {
        return print_change(&list, changed, changed.then_some(id), None);
    }
    Ok(())
}

fn cmd_clear(dir: Option<&Path>, json: bool) -> CmdResult {
    let (_store, mut list) = open_cwd(dir)?;
    let result = list.clear_completed();
    let removed = check_saved(&list, result)?;
    if json {
        return print_change(&list, removed > 0, None, Some(removed));
    }
    if removed > 0 {
        println!("removed {}", removed);
    }
    Ok(())
}

fn cmd_filter(args: FilterArgs, dir: Option<&Path>, json: bool) -> CmdResult {
    let filter = parse_filter(&args.filter)?;
    let (store, mut list) = open_cwd(dir)?;
    store.save_filter(filter)?;
    list.set_filter(filter);

    let visible = list.visible_items();
    if json {
        return print_json(&list_to_json(filter, &visible, list.remaining_count()));
    }
    for line in format_list(&visible, list.remaining_count(), store.config.display.id_width) {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn cmd_recovery(args: RecoveryCmd, dir: Option<&Path>, json: bool) -> CmdResult {
    let store = load_store_cwd(dir)?;
    let todo_dir = &store.todo_dir;

    match args.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery::recovery_log_path(todo_dir).display());
            Ok(())
        }
        Some(RecoveryAction::Prune(prune)) => {
            let before = match prune.before {
                Some(ref s) => Some(parse_timestamp(s)?),
                None => None,
            };
            let removed = recovery::prune_recovery(todo_dir, before, prune.all)?;
            if json {
                return print_json(&serde_json::json!({ "removed": removed }));
            }
            println!("pruned {} entries", removed);
            Ok(())
        }
        None => {
            let entries = recovery::read_recovery_entries(todo_dir, Some(args.limit.unwrap_or(10)));
            if json {
                let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
                return print_json(&values);
            }
            if entries.is_empty() {
                println!("recovery log is empty");
                return Ok(());
            }
            for entry in &entries {
                print!("{}", entry.to_display_markdown());
            }
            Ok(())
        }
    }
}

/// Accept RFC 3339 or a bare date (midnight UTC).
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid timestamp \"{}\" (expected YYYY-MM-DD or RFC 3339)", s))
}
