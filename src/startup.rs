use crate::components::google_calendar::{
    time::day_window, CalendarReader, GoogleCalendarClient, OAuthClient, TokenManager,
};
use crate::components::start_meeting::{write_start_meeting, RunOutcome};
use crate::config::Config;
use crate::error::{other_error, BotResult};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and validate the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Fetch today's events and write the start meeting notes.
///
/// `now` decides which day "today" is and in which zone.
pub async fn run<R, Tz>(
    config: &Config,
    reader: &R,
    now: &DateTime<Tz>,
    notes_dir: &Path,
) -> BotResult<RunOutcome>
where
    R: CalendarReader + ?Sized,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let window = day_window(now)?;
    info!(
        "Fetching events of {} from {} to {}",
        config.env.calendar_id, window.time_min, window.time_max
    );

    let events = reader.list_events(&config.env.calendar_id, &window).await?;
    write_start_meeting(&events, &config.user, notes_dir)
}

/// Authenticate against Google and run against the real calendar
pub async fn start(config: &Config) -> BotResult<RunOutcome> {
    let oauth = OAuthClient::load(&config.client_secret_path())?;
    let token_manager = TokenManager::new(oauth, config.token_cache_path()?);
    let token = token_manager
        .get_token(config.authorization_code(), &config.url_file())
        .await?;

    let reader = GoogleCalendarClient::new(&token.access_token);
    let notes_dir = config.notes_dir()?;

    match config.timezone()? {
        Some(tz) => run(config, &reader, &Utc::now().with_timezone(&tz), &notes_dir).await,
        None => run(config, &reader, &Local::now(), &notes_dir).await,
    }
}

/// Keep the console open for `exitPauseSecs` before exiting
pub async fn pause_before_exit(config: &Config) {
    if config.env.exit_pause_secs > 0 {
        tokio::time::sleep(Duration::from_secs(config.env.exit_pause_secs)).await;
    }
}
