//! In-memory `UserDirectory` adapter.
//!
//! Holds a seeded profile set, records every outbound call so tests can
//! assert on the exact wire traffic (including "no calls at all"), and can
//! inject failures per operation.

use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::ports::{LinkDirective, PortFuture, UserDirectory};
use crate::profile::{Identity, Profile};

/// One recorded directory operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryCall {
    /// A `find_profiles_by_email` lookup.
    FindByEmail {
        /// The queried email.
        email: String,
    },
    /// A full-replace user-metadata write.
    UpdateUserMetadata {
        /// Target profile id.
        user_id: String,
        /// The complete replacement object.
        metadata: Map<String, Value>,
    },
    /// A full-replace app-metadata write.
    UpdateAppMetadata {
        /// Target profile id.
        user_id: String,
        /// The complete replacement object.
        metadata: Map<String, Value>,
    },
    /// An identity-link directive.
    LinkIdentity {
        /// The surviving profile's id.
        primary_user_id: String,
        /// Provider of the attached identity.
        provider: String,
        /// Provider-assigned id of the attached identity.
        provider_user_id: String,
    },
}

#[derive(Default)]
struct Failures {
    find: bool,
    update: bool,
    link: bool,
    // Link calls at or beyond this index fail (0-based).
    link_after: Option<usize>,
}

/// In-memory directory over a seeded profile list.
pub struct MemoryDirectory {
    profiles: Mutex<Vec<Profile>>,
    calls: Mutex<Vec<DirectoryCall>>,
    failures: Mutex<Failures>,
    link_attempts: Mutex<usize>,
}

impl MemoryDirectory {
    /// Creates a directory seeded with `profiles`.
    #[must_use]
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(Failures::default()),
            link_attempts: Mutex::new(0),
        }
    }

    /// Returns a snapshot of all recorded calls, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<DirectoryCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Returns the current stored profile for `user_id`, if any.
    #[must_use]
    pub fn profile(&self, user_id: &str) -> Option<Profile> {
        self.profiles
            .lock()
            .ok()
            .and_then(|profiles| profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    /// Makes every email lookup fail with an HTTP-400-shaped error.
    pub fn fail_find(&self) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.find = true;
        }
    }

    /// Makes every metadata update fail.
    pub fn fail_update(&self) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.update = true;
        }
    }

    /// Makes every link call fail.
    pub fn fail_link(&self) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.link = true;
        }
    }

    /// Makes link calls fail starting with the `n`th attempt (0-based).
    pub fn fail_link_after(&self, n: usize) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.link_after = Some(n);
        }
    }

    fn record(&self, call: DirectoryCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl UserDirectory for MemoryDirectory {
    fn find_profiles_by_email(&self, email: &str) -> PortFuture<'_, Vec<Profile>> {
        let email = email.to_string();
        Box::pin(async move {
            self.record(DirectoryCall::FindByEmail { email: email.clone() });
            if self.failures.lock().is_ok_and(|f| f.find) {
                return Err("GET /users-by-email returned HTTP 400".into());
            }
            let profiles = self.profiles.lock().map_err(|_| "directory lock poisoned")?;
            Ok(profiles.iter().filter(|p| p.email.as_deref() == Some(&email)).cloned().collect())
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
            self.record(DirectoryCall::UpdateUserMetadata {
                user_id: user_id.clone(),
                metadata: metadata.clone(),
            });
            if self.failures.lock().is_ok_and(|f| f.update) {
                return Err("PATCH /users returned HTTP 500".into());
            }
            let mut profiles = self.profiles.lock().map_err(|_| "directory lock poisoned")?;
            if let Some(profile) = profiles.iter_mut().find(|p| p.user_id == user_id) {
                profile.user_metadata = Some(metadata);
            }
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
            self.record(DirectoryCall::UpdateAppMetadata {
                user_id: user_id.clone(),
                metadata: metadata.clone(),
            });
            if self.failures.lock().is_ok_and(|f| f.update) {
                return Err("PATCH /users returned HTTP 500".into());
            }
            let mut profiles = self.profiles.lock().map_err(|_| "directory lock poisoned")?;
            if let Some(profile) = profiles.iter_mut().find(|p| p.user_id == user_id) {
                profile.app_metadata = Some(metadata);
            }
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
            self.record(DirectoryCall::LinkIdentity {
                primary_user_id: primary_user_id.clone(),
                provider: directive.provider.clone(),
                provider_user_id: directive.provider_user_id.clone(),
            });
            let attempt = {
                let mut attempts =
                    self.link_attempts.lock().map_err(|_| "directory lock poisoned")?;
                let current = *attempts;
                *attempts += 1;
                current
            };
            let failures = self.failures.lock().map_err(|_| "directory lock poisoned")?;
            if failures.link || failures.link_after.is_some_and(|n| attempt >= n) {
                return Err("POST /identities returned HTTP 400".into());
            }
            drop(failures);

            let mut profiles = self.profiles.lock().map_err(|_| "directory lock poisoned")?;
            if let Some(profile) = profiles.iter_mut().find(|p| p.user_id == primary_user_id) {
                profile.identities.push(Identity {
                    provider: directive.provider,
                    provider_user_id: directive.provider_user_id,
                    is_social: false,
                });
            }
            Ok(())
        })
    }
}
