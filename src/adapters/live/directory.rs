//! Live adapter for the `UserDirectory` port using the platform's
//! management HTTP API.

use std::error::Error;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};

use super::token::TokenSource;
use crate::ports::{LinkDirective, PortFuture, UserDirectory};
use crate::profile::Profile;

/// Every directory call is bounded so a hung dependency cannot stall the
/// login path.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Management-API client for a directory tenant.
///
/// `base_url` is the management root, e.g.
/// `https://tenant.example.com/api/v2`.
pub struct LiveDirectory {
    client: Client,
    base_url: String,
    token: TokenSource,
}

#[derive(Serialize)]
struct LinkBody<'a> {
    provider: &'a str,
    user_id: &'a str,
}

#[derive(Serialize)]
struct UserMetadataPatch<'a> {
    user_metadata: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct AppMetadataPatch<'a> {
    app_metadata: &'a Map<String, Value>,
}

impl LiveDirectory {
    /// Creates a directory client with a bounded request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        token: TokenSource,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| format!("Failed to build directory HTTP client: {e}"))?;
        Ok(Self { client, base_url: base_url.into().trim_end_matches('/').to_string(), token })
    }

    async fn check_status(
        operation: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, Box<dyn Error + Send + Sync>> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(format!("{operation} returned HTTP {}: {body}", status.as_u16()).into())
    }
}

impl UserDirectory for LiveDirectory {
    fn find_profiles_by_email(&self, email: &str) -> PortFuture<'_, Vec<Profile>> {
        let email = email.to_string();
        Box::pin(async move {
            let bearer = self.token.bearer(&self.client).await?;
            let response = self
                .client
                .get(format!("{}/users-by-email", self.base_url))
                .bearer_auth(bearer)
                .query(&[("email", email.as_str())])
                .send()
                .await
                .map_err(|e| format!("GET /users-by-email failed: {e}"))?;
            let response = Self::check_status("GET /users-by-email", response).await?;
            let profiles: Vec<Profile> = response
                .json()
                .await
                .map_err(|e| format!("Failed to parse users-by-email response: {e}"))?;
            Ok(profiles)
        })
    }

    fn update_user_metadata(
        &self,
        user_id: &str,
        metadata: &Map<String, Value>,
    ) -> PortFuture<'_, ()> {
        let user_id = user_id.to_string();
        let metadata = metadata.clone();
        Box::pin(async move {
            let bearer = self.token.bearer(&self.client).await?;
            let response = self
                .client
                .patch(format!("{}/users/{user_id}", self.base_url))
                .bearer_auth(bearer)
                .json(&UserMetadataPatch { user_metadata: &metadata })
                .send()
                .await
                .map_err(|e| format!("PATCH /users user_metadata failed: {e}"))?;
            Self::check_status("PATCH /users user_metadata", response).await?;
            Ok(())
        })
    }

    fn update_app_metadata(
        &self,
        user_id: &str,
        metadata: &Map<String, Value>,
    ) -> PortFuture<'_, ()> {
        let user_id = user_id.to_string();
        let metadata = metadata.clone();
        Box::pin(async move {
            let bearer = self.token.bearer(&self.client).await?;
            let response = self
                .client
                .patch(format!("{}/users/{user_id}", self.base_url))
                .bearer_auth(bearer)
                .json(&AppMetadataPatch { app_metadata: &metadata })
                .send()
                .await
                .map_err(|e| format!("PATCH /users app_metadata failed: {e}"))?;
            Self::check_status("PATCH /users app_metadata", response).await?;
            Ok(())
        })
    }

    fn link_identity(
        &self,
        primary_user_id: &str,
        directive: &LinkDirective,
    ) -> PortFuture<'_, ()> {
        let primary_user_id = primary_user_id.to_string();
        let directive = directive.clone();
        Box::pin(async move {
            let bearer = self.token.bearer(&self.client).await?;
            let body = LinkBody {
                provider: &directive.provider,
                user_id: &directive.provider_user_id,
            };
            let response = self
                .client
                .post(format!("{}/users/{primary_user_id}/identities", self.base_url))
                .bearer_auth(bearer)
                .json(&body)
                .send()
                .await
                .map_err(|e| format!("POST /identities failed: {e}"))?;
            Self::check_status("POST /identities", response).await?;
            Ok(())
        })
    }
}
