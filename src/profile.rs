//! Profile and identity records as delivered by the user directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One provider-specific credential binding attached to a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider tag, e.g. `"google-oauth2"` or `"auth0"`.
    pub provider: String,
    /// Opaque identifier assigned by the provider.
    #[serde(rename = "user_id")]
    pub provider_user_id: String,
    /// Whether this identity came from a social connection.
    #[serde(rename = "isSocial", default)]
    pub is_social: bool,
}

/// An account record at the identity platform.
///
/// Field names follow the directory's wire format so fixtures captured from
/// the platform deserialize unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Composite key, conventionally `provider|provider_user_id`.
    pub user_id: String,
    /// Primary email address, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the email address has been verified. Absent means false.
    #[serde(default)]
    pub email_verified: bool,
    /// Display name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Credential bindings; index 0 is the identity used for this login.
    #[serde(default)]
    pub identities: Vec<Identity>,
    /// User-editable profile data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<Map<String, Value>>,
    /// App-owned profile data. Presence signals the account has completed
    /// onboarding before.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_metadata: Option<Map<String, Value>>,
    /// When the directory created this record.
    pub created_at: DateTime<Utc>,
    /// When the directory last modified this record.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Returns `true` if the profile carries the `manually_unlinked`
    /// opt-out sentinel in its user metadata.
    #[must_use]
    pub fn manually_unlinked(&self) -> bool {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.get("manually_unlinked"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Returns `true` if the profile has non-empty app metadata.
    #[must_use]
    pub fn has_app_metadata(&self) -> bool {
        self.app_metadata.as_ref().is_some_and(|m| !m.is_empty())
    }

    /// Returns the email address, or `""` when absent.
    #[must_use]
    pub fn email_or_empty(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }
}
