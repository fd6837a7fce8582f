use crate::error::{timestamp_error, BotResult};
use chrono::DateTime;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const NOTE_EXTENSION: &str = "md";

/// Format a start timestamp as `DD-HH-MM`, in the offset it was written with
pub fn file_stamp(start: &str) -> BotResult<String> {
    if start.is_empty() {
        return Err(timestamp_error(start, "event has no start time"));
    }

    let parsed = DateTime::parse_from_rfc3339(start)
        .map_err(|e| timestamp_error(start, &e.to_string()))?;

    Ok(parsed.format("%d-%H-%M").to_string())
}

/// `<DD-HH-MM>-<group>.md`
pub fn note_file_name(group_name: &str, start: &str) -> BotResult<String> {
    Ok(format!(
        "{}-{}.{}",
        file_stamp(start)?,
        group_name,
        NOTE_EXTENSION
    ))
}

pub fn note_path(dir: &Path, group_name: &str, start: &str) -> BotResult<PathBuf> {
    Ok(dir.join(note_file_name(group_name, start)?))
}

/// Append `text` and a trailing newline, creating the file when missing
pub fn append_note(path: &Path, text: &str) -> BotResult<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", text)?;
    info!("Appended start meeting notes to {}", path.display());
    Ok(())
}
