use serde::{Deserialize, Serialize};

/// Simplified calendar event representation
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub created: Option<String>,
    pub start_date_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date_time: Option<String>,
    pub end_date: Option<String>,
}

impl CalendarEvent {
    /// Event title, empty when the event has none
    pub fn title(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    /// Precise start timestamp; `None` for all-day events and blank values
    pub fn precise_start(&self) -> Option<&str> {
        self.start_date_time.as_deref().filter(|s| !s.is_empty())
    }
}

/// Time bounds of one day, formatted for the Calendar API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    pub time_min: String,
    pub time_max: String,
}

/// One page of the `events.list` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
    pub next_page_token: Option<String>,
}

/// Event resource as returned by the API
#[derive(Debug, Deserialize)]
pub struct ApiEvent {
    #[serde(default)]
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub created: Option<String>,
    pub start: Option<ApiEventTime>,
    pub end: Option<ApiEventTime>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

impl From<ApiEvent> for CalendarEvent {
    fn from(event: ApiEvent) -> Self {
        let start = event.start.unwrap_or_default();
        let end = event.end.unwrap_or_default();
        CalendarEvent {
            id: event.id,
            summary: event.summary,
            description: event.description,
            created: event.created,
            start_date_time: start.date_time,
            start_date: start.date,
            end_date_time: end.date_time,
            end_date: end.date,
        }
    }
}
