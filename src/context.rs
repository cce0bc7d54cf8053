//! Service context bundling all port trait objects.

use std::sync::Arc;

use crate::adapters::live::token::ClientCredentials;
use crate::adapters::live::{
    JsonRpcProfileSync, LiveClock, LiveDirectory, TokenSource, WebhookNotifier,
};
use crate::adapters::memory::{
    CapturingNotifier, CapturingProfileSync, FixedClock, MemoryDirectory,
};
use crate::config::RuleConfig;
use crate::ports::{Clock, Notifier, ProfileSync, UserDirectory};
use crate::profile::Profile;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors wire
/// up different adapter implementations (live, in-memory).
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Arc<dyn Clock>,
    /// The user directory.
    pub directory: Arc<dyn UserDirectory>,
    /// Signup notification sink.
    pub notifier: Arc<dyn Notifier>,
    /// Downstream profile sync.
    pub profile_sync: Arc<dyn ProfileSync>,
    /// Deployment configuration consulted by the rules.
    pub config: RuleConfig,
}

/// Handles onto the in-memory adapters, for assertions in tests and for
/// inspecting an offline simulation.
pub struct MemoryHandles {
    /// The seeded directory.
    pub directory: Arc<MemoryDirectory>,
    /// The capturing notifier.
    pub notifier: Arc<CapturingNotifier>,
    /// The capturing profile sync.
    pub profile_sync: Arc<CapturingProfileSync>,
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ServiceContext {
    /// Creates a live context from configuration.
    ///
    /// The directory token source prefers a pre-issued token and falls back
    /// to a client-credentials exchange derived from the management root.
    ///
    /// # Errors
    ///
    /// Returns an error when required directory settings are missing or the
    /// HTTP client cannot be built.
    pub fn live(config: RuleConfig) -> Result<Self, String> {
        let clock: Arc<dyn Clock> = Arc::new(LiveClock);
        let base_url = config
            .directory_base_url
            .clone()
            .ok_or("ACCTLINK_DIRECTORY_URL is not set")?;

        let token = if let Some(token) = config.directory_token.clone() {
            TokenSource::Static(token)
        } else {
            let client_id = config.client_id.clone().ok_or(
                "Set ACCTLINK_DIRECTORY_TOKEN, or ACCTLINK_CLIENT_ID and ACCTLINK_CLIENT_SECRET",
            )?;
            let client_secret = config.client_secret.clone().ok_or(
                "Set ACCTLINK_DIRECTORY_TOKEN, or ACCTLINK_CLIENT_ID and ACCTLINK_CLIENT_SECRET",
            )?;
            TokenSource::ClientCredentials(ClientCredentials::new(
                token_url_for(&base_url),
                client_id,
                client_secret,
                format!("{}/", base_url.trim_end_matches('/')),
                Arc::clone(&clock),
            ))
        };

        let directory = LiveDirectory::new(base_url, token).map_err(|e| e.to_string())?;

        let notifier: Arc<dyn Notifier> = match &config.signup_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
            None => Arc::new(CapturingNotifier::new()),
        };
        let profile_sync: Arc<dyn ProfileSync> =
            match (&config.sync_url, &config.sync_username, &config.sync_password) {
                (Some(url), Some(user), Some(pass)) => {
                    Arc::new(JsonRpcProfileSync::new(url.clone(), user.clone(), pass.clone()))
                }
                _ => Arc::new(CapturingProfileSync::new()),
            };

        Ok(Self { clock, directory: Arc::new(directory), notifier, profile_sync, config })
    }

    /// Creates an in-memory context seeded with `profiles`, returning
    /// handles for inspection.
    #[must_use]
    pub fn in_memory(profiles: Vec<Profile>, config: RuleConfig) -> (Self, MemoryHandles) {
        let directory = Arc::new(MemoryDirectory::new(profiles));
        let notifier = Arc::new(CapturingNotifier::new());
        let profile_sync = Arc::new(CapturingProfileSync::new());
        let clock: Arc<dyn Clock> =
            Arc::new(FixedClock(chrono::DateTime::UNIX_EPOCH));
        let directory_port: Arc<dyn UserDirectory> = directory.clone();
        let notifier_port: Arc<dyn Notifier> = notifier.clone();
        let profile_sync_port: Arc<dyn ProfileSync> = profile_sync.clone();
        let context = Self {
            clock,
            directory: directory_port,
            notifier: notifier_port,
            profile_sync: profile_sync_port,
            config,
        };
        (context, MemoryHandles { directory, notifier, profile_sync })
    }
}

/// Derives the token-exchange endpoint from the management root origin.
fn token_url_for(base_url: &str) -> String {
    let origin = base_url
        .find("//")
        .and_then(|scheme_end| {
            base_url[scheme_end + 2..]
                .find('/')
                .map(|path_start| &base_url[..scheme_end + 2 + path_start])
        })
        .unwrap_or(base_url);
    format!("{origin}/oauth/token")
}
