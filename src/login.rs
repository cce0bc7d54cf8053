//! Login event context passed through the rule pipeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Login statistics reported by the platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginStats {
    /// Number of logins for this profile, including the current one.
    pub logins_count: u32,
}

/// Details of the inbound authorization request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestInfo {
    /// Query-string parameters of the authorization request.
    pub query: HashMap<String, String>,
}

/// Mutable per-login context, mirroring the platform's rule context object.
///
/// Rules read the client flags and annotate the token claim maps; the link
/// rule additionally sets [`primary_user`](Self::primary_user) when it
/// folds the authenticating account into another profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginContext {
    /// Display name of the client application.
    pub client_name: String,
    /// Per-client configuration flags (e.g. `isXForgeApp`).
    pub client_metadata: HashMap<String, String>,
    /// Authentication protocol, e.g. `"oidc-basic-profile"` or
    /// `"oauth2-refresh-token"`.
    pub protocol: String,
    /// Login statistics.
    pub stats: LoginStats,
    /// The inbound authorization request.
    pub request: RequestInfo,
    /// Claims to attach to the access token.
    pub access_token: Map<String, Value>,
    /// Claims to attach to the ID token.
    pub id_token: Map<String, Value>,
    /// Set to the surviving profile's `user_id` after a successful link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_user: Option<String>,
}

impl LoginContext {
    /// Returns `true` if the named client-metadata flag equals `"true"`.
    #[must_use]
    pub fn client_flag(&self, name: &str) -> bool {
        self.client_metadata.get(name).is_some_and(|v| v == "true")
    }
}
