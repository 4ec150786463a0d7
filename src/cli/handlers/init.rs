use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io;
use crate::io::store_io::{self, TODO_DIR};

const TODO_TOML_TEMPLATE: &str = r##"# todo list settings

[storage]
# Name of the file (without .json) the list is saved to, inside .todo/
key = "todos"

[display]
# Filter used by `todo list` until one is chosen with `todo filter`
default_filter = "all"     # "all", "active" or "completed"
# How many characters of each id to print
id_width = 8
"##;

/// Create `.todo/` under `cwd`. Returns the new directory.
pub fn init_store(cwd: &Path, force: bool) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let todo_dir = cwd.join(TODO_DIR);

    if todo_dir.is_dir() && !force {
        return Err("todo list already exists in ./.todo/ (use --force to reinitialize)".into());
    }

    if !force
        && let Some(parent) = cwd.parent()
        && let Ok(parent_root) = store_io::discover_store(parent)
    {
        eprintln!(
            "Note: a list already exists at {}/",
            parent_root.join(TODO_DIR).display()
        );
        eprintln!("Creating a new one in ./.todo/");
    }

    fs::create_dir_all(&todo_dir)?;
    let config_path = config_io::config_path(&todo_dir);
    if !config_path.exists() {
        fs::write(config_path, TODO_TOML_TEMPLATE)?;
    }
    Ok(todo_dir)
}

pub fn cmd_init(args: InitArgs, dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir()?,
    };
    init_store(&cwd, args.force)?;
    println!("Initialized todo list in ./.todo/");
    Ok(())
}
