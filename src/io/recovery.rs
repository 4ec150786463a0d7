use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::io::storage::atomic_write;

/// Maximum size of the recovery log before old entries are trimmed (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Default number of days before entries are prunable.
pub const PRUNE_AGE_DAYS: i64 = 30;

/// Written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- todo recovery log: append-only copies of data that could not be used
     If a list came up empty unexpectedly, the old contents are here.
     View with: todo recovery
     Prune old entries: todo recovery prune
     Safe to delete if empty or stale. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// A stored value could not be decoded and was replaced
    Parser,
    /// A save failed; the body holds what should have been written
    Write,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Parser => write!(f, "parser"),
            RecoveryCategory::Write => write!(f, "write"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "parser" => Some(RecoveryCategory::Parser),
            "write" => Some(RecoveryCategory::Write),
            _ => None,
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

/// Return the path to the recovery log file.
pub fn recovery_log_path(dir: &Path) -> PathBuf {
    dir.join(".recovery.log")
}

// ---------------------------------------------------------------------------
// Entry formatting
// ---------------------------------------------------------------------------

impl RecoveryEntry {
    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "## {} - {}: {}\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        ));
        out.push('\n');

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            let fence = fence_for(&self.body);
            out.push('\n');
            out.push_str(&fence);
            out.push_str("text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&fence);
            out.push('\n');
        }

        out.push('\n');
        out.push_str("---\n");
        out
    }

    /// Serialize to JSON value for `todo recovery --json`.
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "category": self.category.to_string(),
            "description": self.description,
            "fields": fields,
            "body": self.body,
        })
    }

    /// Format as raw markdown for display.
    pub fn to_display_markdown(&self) -> String {
        self.to_markdown()
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append a recovery entry to the log. Errors are swallowed and reported as warnings.
pub fn log_recovery(dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(dir, entry) {
        log::warn!("could not write to recovery log: {}", e);
    }
}

fn log_recovery_inner(dir: &Path, entry: RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(dir);

    if let Ok(meta) = fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
        let content = fs::read_to_string(&path)?;
        let trimmed = prune_entries_before(&content, &cutoff);
        if trimmed.len() < content.len() {
            atomic_write(&path, trimmed.as_bytes())?;
        }
    }

    let needs_header = fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }

    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Reading entries
// ---------------------------------------------------------------------------

/// Read recovery entries, most recent first.
pub fn read_recovery_entries(dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let content = match fs::read_to_string(recovery_log_path(dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);

    // Entries are parsed oldest-first
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries = entries.into_iter().skip(skip).collect();
    }

    entries.reverse();
    entries
}

/// Parse all entries from the log content string.
fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    split_entries(content)
        .1
        .iter()
        .filter_map(|chunk| parse_entry(chunk))
        .collect()
}

/// Split the log into the text before the first entry and one raw chunk per
/// entry. Each chunk starts at its `## ` line; a `## ` line inside a body
/// fence does not start a new chunk.
fn split_entries(content: &str) -> (String, Vec<String>) {
    let mut preamble = String::new();
    let mut chunks: Vec<String> = Vec::new();
    let mut open_fence: Option<usize> = None;

    for line in content.lines() {
        match open_fence {
            Some(len) if closes_fence(line, len) => open_fence = None,
            Some(_) => {}
            None => {
                if line.starts_with("## ") {
                    chunks.push(String::new());
                } else {
                    open_fence = fence_len(line);
                }
            }
        }
        let target = chunks.last_mut().unwrap_or(&mut preamble);
        target.push_str(line);
        target.push('\n');
    }

    (preamble, chunks)
}

/// Parse one chunk produced by `split_entries`.
fn parse_entry(chunk: &str) -> Option<RecoveryEntry> {
    let mut lines = chunk.lines();
    let header = lines.next()?.strip_prefix("## ")?;
    let (timestamp, category, description) = parse_entry_header(header)?;

    let mut fields = Vec::new();
    let mut body: Vec<&str> = Vec::new();
    let mut open_fence: Option<usize> = None;

    for line in lines {
        if let Some(len) = open_fence {
            if closes_fence(line, len) {
                open_fence = None;
            } else {
                body.push(line);
            }
            continue;
        }

        if line == "---" {
            break;
        }
        if let Some(len) = fence_len(line) {
            open_fence = Some(len);
            continue;
        }
        if let Some((key, value)) = line.trim().split_once(": ") {
            fields.push((key.to_string(), value.to_string()));
        }
    }

    Some(RecoveryEntry {
        timestamp,
        category,
        description,
        fields,
        body: body.join("\n"),
    })
}

// ---------------------------------------------------------------------------
// Body fences
// ---------------------------------------------------------------------------

/// A backtick fence longer than any backtick run in `body` (minimum three),
/// so nothing inside the body can close it.
fn fence_for(body: &str) -> String {
    let longest = body
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat((longest + 1).max(3))
}

/// Length of the opening fence on `line`, if it is one.
fn fence_len(line: &str) -> Option<usize> {
    let len = line.len() - line.trim_start_matches('`').len();
    (len >= 3).then_some(len)
}

/// A closing fence is a line of only backticks, at least as long as the opener.
fn closes_fence(line: &str, open_len: usize) -> bool {
    let line = line.trim_end();
    line.len() >= open_len && line.bytes().all(|b| b == b'`')
}

/// Parse an entry header: `<timestamp> - <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp_str, rest) = header.split_once(" - ")?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);

    let (category_str, description) = rest.split_once(": ")?;
    let category = RecoveryCategory::parse_category(category_str)?;

    Some((timestamp, category, description.to_string()))
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

/// Prune entries from the recovery log. Returns the number of entries removed.
pub fn prune_recovery(dir: &Path, before: Option<DateTime<Utc>>, all: bool) -> io::Result<usize> {
    let path = recovery_log_path(dir);
    if !path.exists() {
        return Ok(0);
    }

    let content = fs::read_to_string(&path)?;
    let original_count = parse_entries(&content).len();

    if all {
        atomic_write(&path, FILE_HEADER.as_bytes())?;
        return Ok(original_count);
    }

    let cutoff = before.unwrap_or_else(|| Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS));
    let trimmed = prune_entries_before(&content, &cutoff);
    let new_count = parse_entries(&trimmed).len();

    atomic_write(&path, trimmed.as_bytes())?;
    Ok(original_count.saturating_sub(new_count))
}

/// Remove entries with timestamps before `cutoff` from the raw content.
/// Text before the first entry and entries whose header can't be read are kept.
fn prune_entries_before(content: &str, cutoff: &DateTime<Utc>) -> String {
    let (mut result, chunks) = split_entries(content);
    for chunk in chunks {
        let stale = parse_entry(&chunk).is_some_and(|e| e.timestamp < *cutoff);
        if !stale {
            result.push_str(&chunk);
        }
    }
    result
}
