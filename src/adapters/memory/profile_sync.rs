//! Capturing `ProfileSync` adapter.

use std::sync::Mutex;

use crate::ports::{PortFuture, ProfileSync};
use crate::profile::Profile;

/// Records profile pushes instead of sending them; can simulate a
/// downstream outage.
#[derive(Default)]
pub struct CapturingProfileSync {
    pushes: Mutex<Vec<(String, Profile)>>,
    fail: Mutex<bool>,
}

impl CapturingProfileSync {
    /// Creates an empty capturing sync.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the `(app_user_id, profile)` pairs pushed so far.
    #[must_use]
    pub fn pushes(&self) -> Vec<(String, Profile)> {
        self.pushes.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Makes every subsequent push fail.
    pub fn fail(&self) {
        if let Ok(mut fail) = self.fail.lock() {
            *fail = true;
        }
    }
}

impl ProfileSync for CapturingProfileSync {
    fn push_profile(&self, app_user_id: &str, profile: &Profile) -> PortFuture<'_, ()> {
        let entry = (app_user_id.to_string(), profile.clone());
        Box::pin(async move {
            if *self.fail.lock().map_err(|_| "sync lock poisoned")? {
                return Err("profile push returned JSON-RPC error -32000: unavailable".into());
            }
            self.pushes.lock().map_err(|_| "sync lock poisoned")?.push(entry);
            Ok(())
        })
    }
}
