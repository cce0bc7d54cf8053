//! Live adapter for the `ProfileSync` port using JSON-RPC over HTTP.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::ports::{PortFuture, ProfileSync};
use crate::profile::Profile;

const SYNC_TIMEOUT: Duration = Duration::from_secs(15);

/// Pushes profiles downstream as JSON-RPC 2.0 `pushAuthUserProfile` calls
/// with basic auth. This boundary is strict: any failure propagates.
pub struct JsonRpcProfileSync {
    client: Client,
    url: String,
    username: String,
    password: String,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: RpcParams<'a>,
    id: String,
}

#[derive(Serialize)]
struct RpcParams<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    #[serde(rename = "userProfile")]
    user_profile: &'a Profile,
}

impl JsonRpcProfileSync {
    /// Creates a sync client for `url` with basic-auth credentials.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl ProfileSync for JsonRpcProfileSync {
    fn push_profile(&self, app_user_id: &str, profile: &Profile) -> PortFuture<'_, ()> {
        let app_user_id = app_user_id.to_string();
        let profile = profile.clone();
        Box::pin(async move {
            let body = RpcRequest {
                jsonrpc: "2.0",
                method: "pushAuthUserProfile",
                params: RpcParams { user_id: &app_user_id, user_profile: &profile },
                id: Uuid::new_v4().to_string(),
            };
            let response = self
                .client
                .post(&self.url)
                .basic_auth(&self.username, Some(&self.password))
                .timeout(SYNC_TIMEOUT)
                .json(&body)
                .send()
                .await
                .map_err(|e| format!("Profile push request failed: {e}"))?;
            let status = response.status();
            if !status.is_success() {
                return Err(format!("Profile push returned HTTP {}", status.as_u16()).into());
            }
            let reply: Value = response
                .json()
                .await
                .map_err(|e| format!("Failed to parse profile push response: {e}"))?;
            if let Some(error) = reply.get("error") {
                let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
                let message =
                    error.get("message").and_then(Value::as_str).unwrap_or("unknown error");
                return Err(format!("Profile push error {code}: {message}").into());
            }
            Ok(())
        })
    }
}
