//! Live adapter for the `Notifier` port using a chat webhook.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::ports::{Notifier, PortFuture};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts signup messages to a chat webhook, dropping failures.
pub struct WebhookNotifier {
    client: Client,
    webhook_url: String,
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
    channel: &'a str,
}

impl WebhookNotifier {
    /// Creates a notifier for `webhook_url`.
    #[must_use]
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self { client: Client::new(), webhook_url: webhook_url.into() }
    }
}

impl Notifier for WebhookNotifier {
    fn notify_signup(&self, message: &str, channel: &str) -> PortFuture<'_, ()> {
        let body = serde_json::to_value(WebhookMessage { text: message, channel })
            .unwrap_or_default();
        Box::pin(async move {
            // Fire-and-forget: a webhook hiccup never surfaces to the login.
            let result = self
                .client
                .post(&self.webhook_url)
                .timeout(WEBHOOK_TIMEOUT)
                .json(&body)
                .send()
                .await;
            match result {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => {
                    eprintln!(
                        "Warning: signup webhook returned HTTP {}",
                        response.status().as_u16()
                    );
                }
                Err(err) => eprintln!("Warning: signup webhook failed: {err}"),
            }
            Ok(())
        })
    }
}
