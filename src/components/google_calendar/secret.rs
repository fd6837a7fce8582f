use crate::error::{config_error, BotResult};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
/// Redirect used when the client secret lists none; Google shows the code on screen
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// OAuth client registration used for authorization and token requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub redirect_uri: String,
}

#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecretEntry>,
    web: Option<ClientSecretEntry>,
}

#[derive(Debug, Deserialize)]
struct ClientSecretEntry {
    client_id: String,
    client_secret: String,
    auth_uri: Option<String>,
    token_uri: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl OAuthClient {
    /// Load the client from a `client_secret.json` downloaded from the Google Cloud console,
    /// letting `GOOGLE_CLIENT_ID` and `GOOGLE_CLIENT_SECRET` override it.
    pub fn load(path: &Path) -> BotResult<Self> {
        let env_id = env::var("GOOGLE_CLIENT_ID").ok().filter(|v| !v.is_empty());
        let env_secret = env::var("GOOGLE_CLIENT_SECRET").ok().filter(|v| !v.is_empty());

        match fs::read_to_string(path) {
            Ok(content) => {
                let mut client = Self::from_json(&content)?;
                if let Some(id) = env_id {
                    client.client_id = id;
                }
                if let Some(secret) = env_secret {
                    client.client_secret = secret;
                }
                Ok(client)
            }
            Err(e) => match (env_id, env_secret) {
                (Some(client_id), Some(client_secret)) => Ok(Self::from_parts(client_id, client_secret)),
                _ => Err(config_error(&format!(
                    "Unable to read client secret file {}: {}",
                    path.display(),
                    e
                ))),
            },
        }
    }

    /// Parse the JSON of a client secret file ("installed" or "web" application)
    pub fn from_json(content: &str) -> BotResult<Self> {
        let file: ClientSecretFile = serde_json::from_str(content).map_err(|e| {
            config_error(&format!("Unable to parse client secret file: {}", e))
        })?;
        let entry = file
            .installed
            .or(file.web)
            .ok_or_else(|| config_error("Client secret file has no \"installed\" or \"web\" entry"))?;

        Ok(Self {
            client_id: entry.client_id,
            client_secret: entry.client_secret,
            auth_uri: entry.auth_uri.unwrap_or_else(|| DEFAULT_AUTH_URI.to_string()),
            token_uri: entry.token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            redirect_uri: entry
                .redirect_uris
                .into_iter()
                .next()
                .unwrap_or_else(|| OOB_REDIRECT_URI.to_string()),
        })
    }

    /// Client with Google's default endpoints
    pub fn from_parts(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            auth_uri: DEFAULT_AUTH_URI.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            redirect_uri: OOB_REDIRECT_URI.to_string(),
        }
    }

    /// Same client with a different redirect URI
    pub fn with_redirect_uri(mut self, redirect_uri: &str) -> Self {
        self.redirect_uri = redirect_uri.to_string();
        self
    }
}
