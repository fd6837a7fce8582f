pub mod file;
pub mod matcher;
pub mod notes;

use crate::components::google_calendar::models::CalendarEvent;
use crate::config::UserConfig;
use crate::error::BotResult;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// None of today's events belongs to the user
    NoShift,
    /// Notes were appended to `path` for `members` attendees
    NoteWritten { path: PathBuf, members: usize },
}

/// Find the user's shift among today's events and append the start meeting notes
pub fn write_start_meeting(
    events: &[CalendarEvent],
    user: &UserConfig,
    notes_dir: &Path,
) -> BotResult<RunOutcome> {
    let Some(own) = matcher::find_own_shift(events, &user.user_name) else {
        info!("No event for {:?} today", user.user_name);
        return Ok(RunOutcome::NoShift);
    };

    let start = own.precise_start().unwrap_or_default();
    // Resolve the path first so an all-day match never writes anything
    let path = file::note_path(notes_dir, &user.group_name, start)?;

    let members = matcher::same_shift_members(events, start);
    let text = notes::render_note(&members);
    file::append_note(&path, &text)?;

    Ok(RunOutcome::NoteWritten {
        path,
        members: members.len(),
    })
}
