use crate::components::start_meeting::matcher::normalize_name;
use crate::error::{config_error, BotResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file read when `STARTMEETING_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Environment variable that overrides the config file location
pub const CONFIG_PATH_VAR: &str = "STARTMEETING_CONFIG";
pub const DEFAULT_CLIENT_SECRET_PATH: &str = "client_secret.json";
pub const DEFAULT_URL_FILE: &str = "url.txt";
/// Token cache location, relative to the home directory
pub const TOKEN_CACHE_DIR: &str = ".credentials";
pub const TOKEN_CACHE_FILE: &str = "startmeeting.json";

/// Main configuration structure, read from `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(alias = "User")]
    pub user: UserConfig,
    #[serde(alias = "Env")]
    pub env: EnvConfig,
}

/// Who we are looking for and where they work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Display name searched for in event titles
    #[serde(rename = "userName", alias = "UserName", alias = "user_name")]
    pub user_name: String,
    /// Group or location label, used in the note file name
    #[serde(
        rename = "canteraName",
        alias = "CanteraName",
        alias = "groupName",
        alias = "group_name"
    )]
    pub group_name: String,
}

/// Calendar access and local paths
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Google Calendar ID to read
    #[serde(
        rename = "calendarID",
        alias = "CalendarID",
        alias = "calendarId",
        alias = "calendar_id"
    )]
    pub calendar_id: String,
    /// Code shown by Google after visiting the authorization URL
    #[serde(
        rename = "authorizationCode",
        alias = "AuthorizationCode",
        alias = "authorization_code",
        default
    )]
    pub authorization_code: String,
    /// IANA time zone for "today"; system local time when absent
    #[serde(alias = "timeZone", default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(
        rename = "clientSecretPath",
        alias = "client_secret_path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client_secret_path: Option<PathBuf>,
    #[serde(
        rename = "tokenCachePath",
        alias = "token_cache_path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub token_cache_path: Option<PathBuf>,
    /// File the authorization URL is written to on first run
    #[serde(
        rename = "urlFile",
        alias = "url_file",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub url_file: Option<PathBuf>,
    /// Directory notes are written to; the desktop when absent
    #[serde(
        rename = "notesDir",
        alias = "notes_dir",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notes_dir: Option<PathBuf>,
    /// Seconds to wait before the process exits
    #[serde(rename = "exitPauseSecs", alias = "exit_pause_secs", default)]
    pub exit_pause_secs: u64,
}

impl Config {
    /// Load configuration from `.env`, `STARTMEETING_CONFIG` and the config file
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> BotResult<Self> {
        debug!("Reading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            config_error(&format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> BotResult<Self> {
        let mut config: Config = toml::from_str(content)?;
        // The label ends up in a file name verbatim
        config.user.group_name = config.user.group_name.trim().to_string();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> BotResult<()> {
        if normalize_name(&self.user.user_name).is_empty() {
            return Err(config_error("userName must not be empty"));
        }

        let group = self.user.group_name.as_str();
        if group.is_empty() {
            return Err(config_error("canteraName must not be empty"));
        }
        if group.contains(['/', '\\']) {
            return Err(config_error("canteraName must not contain path separators"));
        }

        if self.env.calendar_id.trim().is_empty() {
            return Err(config_error("calendarID must not be empty"));
        }

        self.timezone()?;
        Ok(())
    }

    /// Configured time zone, if any
    pub fn timezone(&self) -> BotResult<Option<Tz>> {
        match self.env.timezone.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => name
                .parse::<Tz>()
                .map(Some)
                .map_err(|e| config_error(&format!("Invalid timezone {}: {}", name, e))),
        }
    }

    /// Authorization code, when one has been pasted into the config
    pub fn authorization_code(&self) -> Option<&str> {
        let code = self.env.authorization_code.trim();
        (!code.is_empty()).then_some(code)
    }

    pub fn client_secret_path(&self) -> PathBuf {
        self.env
            .client_secret_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CLIENT_SECRET_PATH))
    }

    pub fn url_file(&self) -> PathBuf {
        self.env
            .url_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_URL_FILE))
    }

    /// Where the OAuth token is cached between runs
    pub fn token_cache_path(&self) -> BotResult<PathBuf> {
        if let Some(path) = &self.env.token_cache_path {
            return Ok(path.clone());
        }
        let home = dirs::home_dir()
            .ok_or_else(|| config_error("Could not determine the home directory"))?;
        Ok(home.join(TOKEN_CACHE_DIR).join(TOKEN_CACHE_FILE))
    }

    /// Directory the meeting notes go to
    pub fn notes_dir(&self) -> BotResult<PathBuf> {
        if let Some(dir) = &self.env.notes_dir {
            return Ok(dir.clone());
        }
        if let Some(desktop) = dirs::desktop_dir() {
            return Ok(desktop);
        }
        let home = dirs::home_dir()
            .ok_or_else(|| config_error("Could not determine the home directory"))?;
        Ok(home.join("Desktop"))
    }
}
