use super::secret::{OAuthClient, CALENDAR_READONLY_SCOPE};
use crate::error::{config_error, credential_error, BotResult, Error};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

/// A cached token this close to expiry is refreshed instead of used
const EXPIRY_SKEW_SECS: i64 = 60;
/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN: i64 = 3600;
/// State sent with the authorization URL written for manual code entry
pub const MANUAL_AUTH_STATE: &str = "state-token";

/// OAuth token as persisted in the cache file
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Unix timestamp when the access token expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl StoredToken {
    /// Whether the token should no longer be sent at unix time `now`
    pub fn is_expired(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - EXPIRY_SKEW_SECS <= now,
            None => false,
        }
    }
}

/// Obtains OAuth tokens and caches them on disk between runs
#[derive(Clone)]
pub struct TokenManager {
    oauth: OAuthClient,
    cache_path: PathBuf,
    client: Client,
}

impl TokenManager {
    pub fn new(oauth: OAuthClient, cache_path: PathBuf) -> Self {
        Self {
            oauth,
            cache_path,
            client: Client::new(),
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Build the consent URL for read-only calendar access
    pub fn authorization_url(&self, state: &str) -> BotResult<String> {
        let mut url = Url::parse(&self.oauth.auth_uri)
            .map_err(|e| config_error(&format!("Invalid auth_uri {}: {}", self.oauth.auth_uri, e)))?;

        url.query_pairs_mut()
            .append_pair("access_type", "offline")
            .append_pair("client_id", &self.oauth.client_id)
            .append_pair("redirect_uri", &self.oauth.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", CALENDAR_READONLY_SCOPE)
            .append_pair("state", state);

        Ok(url.to_string())
    }

    /// Get an access token from the cache, by refreshing it, or by exchanging
    /// `authorization_code`.
    ///
    /// Without a cached token or a code, the authorization URL is written to
    /// `url_file` and [`Error::AuthorizationRequired`] is returned. A code the
    /// token endpoint refuses gives [`Error::AuthorizationRejected`].
    pub async fn get_token(
        &self,
        authorization_code: Option<&str>,
        url_file: &Path,
    ) -> BotResult<StoredToken> {
        if let Some(token) = self.load_cached() {
            if !token.is_expired(Utc::now().timestamp()) {
                debug!("Using cached token from {}", self.cache_path.display());
                return Ok(token);
            }
            if token.refresh_token.is_some() {
                info!("Cached token expired, refreshing");
                return self.refresh_token(&token).await;
            }
            warn!("Cached token expired and has no refresh token");
        }

        let Some(code) = authorization_code else {
            self.write_authorization_url(url_file)?;
            return Err(Error::AuthorizationRequired {
                url_file: url_file.display().to_string(),
            });
        };

        let token = match self.exchange_code(code).await {
            Ok(token) => token,
            Err(e) => {
                // Keep a valid URL next to the guidance in the error
                if let Err(write_err) = self.write_authorization_url(url_file) {
                    warn!("Failed to write authorization URL: {}", write_err);
                }
                let reason = match e {
                    Error::Credential(message) => message,
                    other => other.to_string(),
                };
                return Err(Error::AuthorizationRejected {
                    url_file: url_file.display().to_string(),
                    reason,
                });
            }
        };

        self.set_token(&token)?;
        Ok(token)
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> BotResult<StoredToken> {
        let params = [
            ("client_id", self.oauth.client_id.as_str()),
            ("client_secret", self.oauth.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.oauth.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .post_token_form(&params, "Failed to exchange authorization code")
            .await?;
        parse_token_response(&response, None)
    }

    /// Refresh an expired token
    async fn refresh_token(&self, token: &StoredToken) -> BotResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| credential_error("No refresh token in token data"))?;

        let params = [
            ("client_id", self.oauth.client_id.as_str()),
            ("client_secret", self.oauth.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let context = format!(
            "Failed to refresh token (delete {} to authorize again)",
            self.cache_path.display()
        );
        let response = self.post_token_form(&params, &context).await?;

        // Google usually omits the refresh token on refresh; keep the old one
        let new_token = parse_token_response(&response, Some(refresh_token))?;
        self.set_token(&new_token)?;
        Ok(new_token)
    }

    async fn post_token_form(&self, params: &[(&str, &str)], context: &str) -> BotResult<Value> {
        let response = self
            .client
            .post(&self.oauth.token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| credential_error(&format!("{}: {}", context, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(credential_error(&format!(
                "{}: HTTP {} - {}",
                context, status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| credential_error(&format!("Failed to parse token response: {}", e)))
    }

    /// Read the cached token; unreadable or corrupt caches count as absent
    pub fn load_cached(&self) -> Option<StoredToken> {
        let data = match fs::read_to_string(&self.cache_path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Token cache {} not found", self.cache_path.display());
                return None;
            }
            Err(e) => {
                warn!("Failed to read token cache {}: {}", self.cache_path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&data) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("Failed to parse token cache {}: {}", self.cache_path.display(), e);
                None
            }
        }
    }

    /// Save a token to the cache file
    pub fn set_token(&self, token: &StoredToken) -> BotResult<()> {
        info!("Saving credential file to: {}", self.cache_path.display());

        if let Some(parent) = self
            .cache_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty() && !p.exists())
        {
            fs::create_dir_all(parent).map_err(|e| {
                credential_error(&format!(
                    "Unable to create credential directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
            // Only a directory created here is locked down
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(parent, fs::Permissions::from_mode(0o700))?;
            }
        }

        let data = serde_json::to_string_pretty(token)?;
        fs::write(&self.cache_path, data).map_err(|e| {
            credential_error(&format!("Unable to cache oauth token: {}", e))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.cache_path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    fn write_authorization_url(&self, url_file: &Path) -> BotResult<()> {
        let url = self.authorization_url(MANUAL_AUTH_STATE)?;
        fs::write(url_file, format!("{}\n", url))?;
        info!("Authorization URL written to {}", url_file.display());
        Ok(())
    }
}

/// Turn a token endpoint response into a [`StoredToken`]
fn parse_token_response(resp: &Value, previous_refresh: Option<&str>) -> BotResult<StoredToken> {
    let access_token = resp
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| credential_error("Token response missing 'access_token' field"))?
        .to_string();

    let token_type = resp
        .get("token_type")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(default_token_type);

    let refresh_token = resp
        .get("refresh_token")
        .and_then(|v| v.as_str())
        .or(previous_refresh)
        .map(|s| s.to_string());

    let expires_in = resp
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .unwrap_or(DEFAULT_EXPIRES_IN);

    Ok(StoredToken {
        access_token,
        token_type,
        refresh_token,
        expires_at: Some(Utc::now().timestamp() + expires_in),
    })
}
