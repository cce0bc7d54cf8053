//! Bearer-token acquisition for the directory client.

use std::error::Error;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ports::Clock;

/// Seconds subtracted from the stated token lifetime so a token is never
/// presented right at its expiry boundary.
const EXPIRY_SAFETY_WINDOW_SECS: i64 = 60;

/// Where the directory client gets its bearer token.
pub enum TokenSource {
    /// A pre-issued token, used as-is.
    Static(String),
    /// A client-credentials exchange with an in-instance cache.
    ClientCredentials(ClientCredentials),
}

impl TokenSource {
    /// Returns a bearer token, fetching or refreshing if needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the token exchange fails; callers treat that
    /// as a directory failure.
    pub async fn bearer(&self, client: &Client) -> Result<String, Box<dyn Error + Send + Sync>> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::ClientCredentials(credentials) => credentials.bearer(client).await,
        }
    }
}

/// Cached token with its refresh deadline.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Client-credentials exchange with a cache scoped to this instance — no
/// process-global state.
pub struct ClientCredentials {
    token_url: String,
    client_id: String,
    client_secret: String,
    audience: String,
    clock: Arc<dyn Clock>,
    cache: Mutex<Option<CachedToken>>,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
    grant_type: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

impl ClientCredentials {
    /// Creates an exchange against `token_url` for the given client.
    #[must_use]
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        audience: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            audience: audience.into(),
            clock,
            cache: Mutex::new(None),
        }
    }

    async fn bearer(&self, client: &Client) -> Result<String, Box<dyn Error + Send + Sync>> {
        let now = self.clock.now();
        if let Some(token) = self.cached_token(now) {
            return Ok(token);
        }

        let body = TokenRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            audience: &self.audience,
            grant_type: "client_credentials",
        };
        let response = client
            .post(&self.token_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Token exchange request failed: {e}"))?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("Token exchange returned HTTP {}", status.as_u16()).into());
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse token exchange response: {e}"))?;

        let expires_at = expiry_from(now, token.expires_in);
        if let Ok(mut cache) = self.cache.lock() {
            *cache = Some(CachedToken { access_token: token.access_token.clone(), expires_at });
        }
        Ok(token.access_token)
    }

    fn cached_token(&self, now: DateTime<Utc>) -> Option<String> {
        let cache = self.cache.lock().ok()?;
        cache.as_ref().filter(|t| t.expires_at > now).map(|t| t.access_token.clone())
    }

    #[cfg(test)]
    fn prime_cache(&self, access_token: &str, expires_at: DateTime<Utc>) {
        if let Ok(mut cache) = self.cache.lock() {
            *cache = Some(CachedToken { access_token: access_token.into(), expires_at });
        }
    }
}

/// Refresh deadline: stated lifetime minus the safety window.
fn expiry_from(now: DateTime<Utc>, expires_in_secs: i64) -> DateTime<Utc> {
    now + Duration::seconds(expires_in_secs - EXPIRY_SAFETY_WINDOW_SECS)
}
