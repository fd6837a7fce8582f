use super::models::{CalendarEvent, DayWindow, EventsPage};
use super::CalendarReader;
use crate::error::{google_calendar_error, BotResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

/// Base URL of the Calendar v3 REST API
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar reader backed by the Google Calendar REST API
#[derive(Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new(access_token: &str) -> Self {
        Self::with_base_url(DEFAULT_API_BASE, access_token)
    }

    /// Create a client against another API root (used by tests)
    pub fn with_base_url(base_url: &str, access_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            access_token: access_token.to_string(),
        }
    }

    fn events_url(&self, calendar_id: &str) -> BotResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        // Calendar ids contain '@' and '#', so they go in as an encoded segment
        url.path_segments_mut()
            .map_err(|_| google_calendar_error("API base URL cannot have path segments"))?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events"]);

        Ok(url)
    }

    async fn fetch_page(
        &self,
        calendar_id: &str,
        window: &DayWindow,
        page_token: Option<&str>,
    ) -> BotResult<EventsPage> {
        let mut url = self.events_url(calendar_id)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("timeMin", &window.time_min)
                .append_pair("timeMax", &window.time_max)
                .append_pair("singleEvents", "true")
                .append_pair("showDeleted", "false")
                .append_pair("orderBy", "startTime");
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))
    }
}

#[async_trait]
impl CalendarReader for GoogleCalendarClient {
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &DayWindow,
    ) -> BotResult<Vec<CalendarEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .fetch_page(calendar_id, window, page_token.as_deref())
                .await?;
            debug!("Fetched page with {} events", page.items.len());
            events.extend(page.items.into_iter().map(CalendarEvent::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        info!(
            "Fetched {} events between {} and {}",
            events.len(),
            window.time_min,
            window.time_max
        );
        Ok(events)
    }
}
