//! Capturing `Notifier` adapter.

use std::sync::Mutex;

use crate::ports::{Notifier, PortFuture};

/// Records notifications instead of delivering them.
#[derive(Default)]
pub struct CapturingNotifier {
    messages: Mutex<Vec<(String, String)>>,
}

impl CapturingNotifier {
    /// Creates an empty capturing notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the `(message, channel)` pairs posted so far.
    #[must_use]
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl Notifier for CapturingNotifier {
    fn notify_signup(&self, message: &str, channel: &str) -> PortFuture<'_, ()> {
        let entry = (message.to_string(), channel.to_string());
        Box::pin(async move {
            if let Ok(mut messages) = self.messages.lock() {
                messages.push(entry);
            }
            Ok(())
        })
    }
}
