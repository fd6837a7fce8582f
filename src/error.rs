use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Configuration error: {0}")]
    #[diagnostic(code(startmeeting::config))]
    Config(String),

    #[error("Google Calendar authorization is required; the authorization URL was written to {url_file}")]
    #[diagnostic(
        code(startmeeting::authorization_required),
        help(
            "Open that URL in a browser, allow access, then paste the code it shows into \
             `authorizationCode` under [env] in config.toml and run again."
        )
    )]
    AuthorizationRequired { url_file: String },

    #[error("Google rejected the authorization code: {reason}; a fresh authorization URL was written to {url_file}")]
    #[diagnostic(
        code(startmeeting::authorization_rejected),
        help(
            "Codes work only once. Open that URL again, allow access, then replace \
             `authorizationCode` under [env] with the new code and run again."
        )
    )]
    AuthorizationRejected { url_file: String, reason: String },

    #[error("Credential error: {0}")]
    #[diagnostic(code(startmeeting::credential))]
    Credential(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(startmeeting::google_calendar))]
    GoogleCalendar(String),

    #[error("Cannot derive a note file name from start time {value:?}: {reason}")]
    #[diagnostic(
        code(startmeeting::timestamp),
        help("Only timed events can open a start meeting; all-day events carry no start time.")
    )]
    Timestamp { value: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(startmeeting::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(startmeeting::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(startmeeting::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type BotResult<T> = Result<T, Error>;

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create credential errors
pub fn credential_error(message: &str) -> Error {
    Error::Credential(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create timestamp errors
pub fn timestamp_error(value: &str, reason: &str) -> Error {
    Error::Timestamp {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
