pub mod google_calendar;
pub mod start_meeting;

pub use google_calendar::{CalendarReader, GoogleCalendarClient};
pub use start_meeting::RunOutcome;
