pub mod client;
pub mod models;
pub mod secret;
pub mod time;
pub mod token;

pub use client::GoogleCalendarClient;
pub use models::{CalendarEvent, DayWindow};
pub use secret::OAuthClient;
pub use token::{StoredToken, TokenManager};

use crate::error::BotResult;
use async_trait::async_trait;

/// Source of a day's calendar events
#[async_trait]
pub trait CalendarReader: Send + Sync {
    /// Events of `calendar_id` starting inside `window`, ordered by start time
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &DayWindow,
    ) -> BotResult<Vec<CalendarEvent>>;
}
