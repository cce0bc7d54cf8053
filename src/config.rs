//! Environment-backed configuration for the rule pipeline.

use std::env;

use crate::linking::{DirectoryFailurePolicy, LinkerOptions, MergeOptions, PrimarySelectionPolicy};

/// Deployment configuration, read once at startup.
///
/// Optional integrations (webhook, profile sync) are simply skipped when
/// their settings are absent; the directory settings are required only for
/// live runs.
#[derive(Debug, Clone, Default)]
pub struct RuleConfig {
    /// Management-API root, e.g. `https://tenant.example.com/api/v2`.
    pub directory_base_url: Option<String>,
    /// Pre-issued directory bearer token.
    pub directory_token: Option<String>,
    /// Client id for a client-credentials token exchange.
    pub client_id: Option<String>,
    /// Client secret for a client-credentials token exchange.
    pub client_secret: Option<String>,
    /// Which profile survives a merge.
    pub selection_policy: PrimarySelectionPolicy,
    /// What happens when the directory misbehaves during linking.
    pub failure_policy: DirectoryFailurePolicy,
    /// Drop duplicate array elements when merging metadata.
    pub dedup_arrays: bool,
    /// Chat webhook for signup notifications.
    pub signup_webhook_url: Option<String>,
    /// Channel for signup notifications.
    pub signup_channel: String,
    /// Downstream profile-sync endpoint.
    pub sync_url: Option<String>,
    /// Basic-auth username for profile sync.
    pub sync_username: Option<String>,
    /// Basic-auth password for profile sync.
    pub sync_password: Option<String>,
}

impl RuleConfig {
    /// Loads configuration from the environment, honoring a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error when a policy variable holds an unknown value.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let selection_policy = match env::var("ACCTLINK_SELECTION_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => PrimarySelectionPolicy::default(),
        };
        let failure_policy = match env::var("ACCTLINK_FAILURE_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => DirectoryFailurePolicy::default(),
        };

        Ok(Self {
            directory_base_url: env::var("ACCTLINK_DIRECTORY_URL").ok(),
            directory_token: env::var("ACCTLINK_DIRECTORY_TOKEN").ok(),
            client_id: env::var("ACCTLINK_CLIENT_ID").ok(),
            client_secret: env::var("ACCTLINK_CLIENT_SECRET").ok(),
            selection_policy,
            failure_policy,
            dedup_arrays: env::var("ACCTLINK_DEDUP_ARRAYS").is_ok_and(|v| v == "true"),
            signup_webhook_url: env::var("ACCTLINK_SIGNUP_WEBHOOK").ok(),
            signup_channel: env::var("ACCTLINK_SIGNUP_CHANNEL")
                .unwrap_or_else(|_| "#new-users".to_string()),
            sync_url: env::var("ACCTLINK_SYNC_URL").ok(),
            sync_username: env::var("ACCTLINK_SYNC_USERNAME").ok(),
            sync_password: env::var("ACCTLINK_SYNC_PASSWORD").ok(),
        })
    }

    /// The linker options this configuration selects.
    #[must_use]
    pub fn linker_options(&self) -> LinkerOptions {
        LinkerOptions {
            selection: self.selection_policy,
            failure: self.failure_policy,
            merge: MergeOptions { dedup_arrays: self.dedup_arrays },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_default_policies() {
        let config = RuleConfig::default();
        let options = config.linker_options();
        assert_eq!(options.selection, PrimarySelectionPolicy::MostRecentlyUpdated);
        assert_eq!(options.failure, DirectoryFailurePolicy::SwallowAndContinue);
        assert!(!options.merge.dedup_arrays);
    }

    #[test]
    fn default_signup_channel_is_empty_until_loaded() {
        // Default derives an empty channel; from_env substitutes the
        // fallback. This just pins the Default behavior for tests.
        assert_eq!(RuleConfig::default().signup_channel, "");
    }
}
