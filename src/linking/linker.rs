//! Link orchestration: Discover → Select → Merge → Link.

use std::error::Error;
use std::str::FromStr;

use super::candidates::find_link_candidates;
use super::merge::{merge_metadata, MergeOptions};
use super::select::{select_primary, PrimarySelectionPolicy, Selection};
use crate::ports::{LinkDirective, UserDirectory};
use crate::profile::Profile;

/// How a directory failure during linking is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryFailurePolicy {
    /// Log the failure and return the original subject unchanged. Linking
    /// is an enhancement to login, not a precondition: a broken merge must
    /// never lock a user out.
    #[default]
    SwallowAndContinue,
    /// Surface the failure to the caller, failing the login.
    PropagateError,
}

impl FromStr for DirectoryFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "swallow" => Ok(Self::SwallowAndContinue),
            "propagate" => Ok(Self::PropagateError),
            other => {
                Err(format!("Unknown failure policy: {other}. Expected swallow or propagate"))
            }
        }
    }
}

/// Configuration for one linker deployment.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkerOptions {
    /// Which profile survives a merge.
    pub selection: PrimarySelectionPolicy,
    /// What happens when the directory misbehaves.
    pub failure: DirectoryFailurePolicy,
    /// Metadata merge knobs.
    pub merge: MergeOptions,
}

/// What one linker invocation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkOutcome {
    /// The profile downstream consumers should see: the merged primary on
    /// success, otherwise the original subject.
    pub profile: Profile,
    /// The surviving profile's id, set only when at least one link
    /// succeeded.
    pub primary_user: Option<String>,
    /// Number of identities attached in this invocation.
    pub linked: usize,
}

impl LinkOutcome {
    fn unchanged(subject: &Profile) -> Self {
        Self { profile: subject.clone(), primary_user: None, linked: 0 }
    }
}

/// Drives the account-linking steps against a user directory.
pub struct AccountLinker {
    options: LinkerOptions,
}

impl AccountLinker {
    /// Creates a linker with the given options.
    #[must_use]
    pub fn new(options: LinkerOptions) -> Self {
        Self { options }
    }

    /// Runs discovery, selection, merge, and link for one authenticated
    /// subject.
    ///
    /// Directory calls are strictly sequential; for multiple secondaries
    /// the link sequence stops at the first failure, keeping prior merges
    /// (they are not rolled back or retried).
    ///
    /// # Errors
    ///
    /// Returns an error only under
    /// [`DirectoryFailurePolicy::PropagateError`]; the default policy
    /// degrades every directory failure into an unchanged outcome.
    pub async fn run(
        &self,
        subject: &Profile,
        directory: &dyn UserDirectory,
    ) -> Result<LinkOutcome, Box<dyn Error + Send + Sync>> {
        let candidates = match find_link_candidates(subject, directory).await {
            Ok(candidates) => candidates,
            Err(err) => return self.degrade(subject, "candidate discovery", err.as_ref()),
        };

        let Some(selection) = select_primary(self.options.selection, subject, candidates) else {
            return Ok(LinkOutcome::unchanged(subject));
        };

        self.merge_and_link(subject, selection, directory).await
    }

    async fn merge_and_link(
        &self,
        subject: &Profile,
        selection: Selection,
        directory: &dyn UserDirectory,
    ) -> Result<LinkOutcome, Box<dyn Error + Send + Sync>> {
        let Selection { mut primary, secondaries } = selection;
        let mut linked = 0;

        for secondary in secondaries {
            let merged_user = merge_metadata(
                secondary.user_metadata.as_ref(),
                primary.user_metadata.as_ref(),
                self.options.merge,
            );
            let merged_app = merge_metadata(
                secondary.app_metadata.as_ref(),
                primary.app_metadata.as_ref(),
                self.options.merge,
            );

            // Both metadata writes must land before the link call.
            let step = async {
                directory.update_user_metadata(&primary.user_id, &merged_user).await?;
                directory.update_app_metadata(&primary.user_id, &merged_app).await?;
                let directive = link_directive(&secondary)?;
                directory.link_identity(&primary.user_id, &directive).await
            };
            if let Err(err) = step.await {
                if linked == 0 {
                    return self.degrade(subject, "merge/link", err.as_ref());
                }
                // Later failure in a multi-link pass: keep what succeeded,
                // skip the rest.
                eprintln!(
                    "Warning: account linking stopped after {linked} link(s) at merge/link: {err}"
                );
                break;
            }

            primary.user_metadata = Some(merged_user);
            primary.app_metadata = Some(merged_app);
            linked += 1;
        }

        if linked == 0 {
            return Ok(LinkOutcome::unchanged(subject));
        }
        let primary_user = Some(primary.user_id.clone());
        Ok(LinkOutcome { profile: primary, primary_user, linked })
    }

    fn degrade(
        &self,
        subject: &Profile,
        stage: &str,
        err: &(dyn Error + Send + Sync),
    ) -> Result<LinkOutcome, Box<dyn Error + Send + Sync>> {
        match self.options.failure {
            DirectoryFailurePolicy::SwallowAndContinue => {
                eprintln!("Warning: account linking skipped at {stage}: {err}");
                Ok(LinkOutcome::unchanged(subject))
            }
            DirectoryFailurePolicy::PropagateError => Err(format!("{stage} failed: {err}").into()),
        }
    }
}

/// Builds the link directive from the secondary's login identity.
fn link_directive(secondary: &Profile) -> Result<LinkDirective, Box<dyn Error + Send + Sync>> {
    let identity = secondary
        .identities
        .first()
        .ok_or_else(|| format!("Profile {} has no identities to link", secondary.user_id))?;
    Ok(LinkDirective {
        provider: identity.provider.clone(),
        provider_user_id: identity.provider_user_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::directory::{DirectoryCall, MemoryDirectory};
    use crate::testutil::{profile, profile_at, ts};
    use serde_json::{json, Map, Value};
    use std::sync::Arc;

    fn meta(value: Value) -> Option<Map<String, Value>> {
        Some(value.as_object().unwrap().clone())
    }

    fn linker() -> AccountLinker {
        AccountLinker::new(LinkerOptions::default())
    }

    #[tokio::test]
    async fn no_candidates_is_a_silent_no_op() {
        let subject = profile("auth0|me", "a@x.com");
        let directory = Arc::new(MemoryDirectory::new(vec![subject.clone()]));

        let outcome = linker().run(&subject, directory.as_ref()).await.unwrap();
        assert_eq!(outcome.profile, subject);
        assert_eq!(outcome.primary_user, None);
        assert_eq!(outcome.linked, 0);
        assert_eq!(directory.calls().len(), 1); // the email lookup only
    }

    #[tokio::test]
    async fn onboarded_subject_absorbs_candidate() {
        let mut subject = profile("auth0|me", "a@x.com");
        subject.app_metadata = meta(json!({"xf_role": "admin", "tags": ["s"]}));
        subject.user_metadata = meta(json!({"theme": "dark"}));
        let mut candidate = profile("google-oauth2|g1", "a@x.com");
        candidate.app_metadata = meta(json!({"xf_role": "user", "tags": ["c"]}));
        let directory =
            Arc::new(MemoryDirectory::new(vec![subject.clone(), candidate.clone()]));

        let outcome = linker().run(&subject, directory.as_ref()).await.unwrap();

        assert_eq!(outcome.profile.user_id, "auth0|me");
        assert_eq!(outcome.primary_user.as_deref(), Some("auth0|me"));
        assert_eq!(outcome.linked, 1);
        // Candidate is secondary: its array elements come first, subject's
        // scalars win.
        let app = outcome.profile.app_metadata.unwrap();
        assert_eq!(app["xf_role"], json!("admin"));
        assert_eq!(app["tags"], json!(["c", "s"]));

        let calls = directory.calls();
        assert_eq!(calls.len(), 4);
        assert!(matches!(&calls[1], DirectoryCall::UpdateUserMetadata { user_id, .. }
            if user_id == "auth0|me"));
        assert!(matches!(&calls[2], DirectoryCall::UpdateAppMetadata { user_id, .. }
            if user_id == "auth0|me"));
        assert_eq!(
            calls[3],
            DirectoryCall::LinkIdentity {
                primary_user_id: "auth0|me".into(),
                provider: "google-oauth2".into(),
                provider_user_id: "g1".into(),
            }
        );
    }

    #[tokio::test]
    async fn fresh_subject_folds_into_most_recent_candidate() {
        let subject = profile_at("auth0|me", "a@x.com", ts(10, 0), ts(10, 0));
        let stale = profile_at("auth0|stale", "a@x.com", ts(1, 0), ts(2, 0));
        let fresh = profile_at("google-oauth2|fresh", "a@x.com", ts(1, 0), ts(9, 0));
        let directory = Arc::new(MemoryDirectory::new(vec![
            subject.clone(),
            stale.clone(),
            fresh.clone(),
        ]));

        let outcome = linker().run(&subject, directory.as_ref()).await.unwrap();

        assert_eq!(outcome.profile.user_id, "google-oauth2|fresh");
        assert_eq!(outcome.primary_user.as_deref(), Some("google-oauth2|fresh"));
        assert_eq!(outcome.linked, 1);
        // Subject's identity was linked; the stale candidate was left alone.
        let links: Vec<_> = directory
            .calls()
            .into_iter()
            .filter(|c| matches!(c, DirectoryCall::LinkIdentity { .. }))
            .collect();
        assert_eq!(
            links,
            vec![DirectoryCall::LinkIdentity {
                primary_user_id: "google-oauth2|fresh".into(),
                provider: "auth0".into(),
                provider_user_id: "me".into(),
            }]
        );
    }

    #[tokio::test]
    async fn discovery_failure_swallows_by_default() {
        let subject = profile("auth0|me", "a@x.com");
        let directory = Arc::new(MemoryDirectory::new(vec![]));
        directory.fail_find();

        let outcome = linker().run(&subject, directory.as_ref()).await.unwrap();
        assert_eq!(outcome.profile, subject);
        assert_eq!(outcome.linked, 0);
        let links: Vec<_> = directory
            .calls()
            .into_iter()
            .filter(|c| matches!(c, DirectoryCall::LinkIdentity { .. }))
            .collect();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn discovery_failure_propagates_when_configured() {
        let subject = profile("auth0|me", "a@x.com");
        let directory = Arc::new(MemoryDirectory::new(vec![]));
        directory.fail_find();

        let linker = AccountLinker::new(LinkerOptions {
            failure: DirectoryFailurePolicy::PropagateError,
            ..LinkerOptions::default()
        });
        let result = linker.run(&subject, directory.as_ref()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn link_failure_returns_original_subject() {
        let mut subject = profile("auth0|me", "a@x.com");
        subject.app_metadata = meta(json!({"xf_role": "user"}));
        let candidate = profile("google-oauth2|g1", "a@x.com");
        let directory =
            Arc::new(MemoryDirectory::new(vec![subject.clone(), candidate]));
        directory.fail_link();

        let outcome = linker().run(&subject, directory.as_ref()).await.unwrap();
        assert_eq!(outcome.profile, subject);
        assert_eq!(outcome.primary_user, None);
        assert_eq!(outcome.linked, 0);
    }

    #[tokio::test]
    async fn oldest_created_links_all_in_order() {
        let subject = profile_at("auth0|me", "a@x.com", ts(10, 0), ts(10, 0));
        let oldest = profile_at("auth0|oldest", "a@x.com", ts(1, 0), ts(1, 0));
        let middle = profile_at("google-oauth2|mid", "a@x.com", ts(5, 0), ts(5, 0));
        let directory = Arc::new(MemoryDirectory::new(vec![
            subject.clone(),
            oldest.clone(),
            middle.clone(),
        ]));

        let linker = AccountLinker::new(LinkerOptions {
            selection: PrimarySelectionPolicy::OldestCreated,
            ..LinkerOptions::default()
        });
        let outcome = linker.run(&subject, directory.as_ref()).await.unwrap();

        assert_eq!(outcome.profile.user_id, "auth0|oldest");
        assert_eq!(outcome.linked, 2);
        let links: Vec<_> = directory
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                DirectoryCall::LinkIdentity { provider_user_id, .. } => Some(provider_user_id),
                _ => None,
            })
            .collect();
        assert_eq!(links, vec!["me".to_string(), "mid".to_string()]);
    }

    #[tokio::test]
    async fn multi_link_stops_early_but_keeps_prior_successes() {
        let subject = profile_at("auth0|me", "a@x.com", ts(10, 0), ts(10, 0));
        let oldest = profile_at("auth0|oldest", "a@x.com", ts(1, 0), ts(1, 0));
        let middle = profile_at("google-oauth2|mid", "a@x.com", ts(5, 0), ts(5, 0));
        let directory = Arc::new(MemoryDirectory::new(vec![
            subject.clone(),
            oldest.clone(),
            middle.clone(),
        ]));
        directory.fail_link_after(1);

        let linker = AccountLinker::new(LinkerOptions {
            selection: PrimarySelectionPolicy::OldestCreated,
            ..LinkerOptions::default()
        });
        let outcome = linker.run(&subject, directory.as_ref()).await.unwrap();

        // First link (the subject) succeeded, second (middle) failed and was
        // not retried. Login still succeeds with the primary profile.
        assert_eq!(outcome.profile.user_id, "auth0|oldest");
        assert_eq!(outcome.primary_user.as_deref(), Some("auth0|oldest"));
        assert_eq!(outcome.linked, 1);
        let links: Vec<_> = directory
            .calls()
            .into_iter()
            .filter(|c| matches!(c, DirectoryCall::LinkIdentity { .. }))
            .collect();
        assert_eq!(links.len(), 2); // second attempt happened and failed; none after
    }

    #[tokio::test]
    async fn manually_unlinked_candidate_never_reaches_the_wire() {
        let subject = profile_at("auth0|me", "a@x.com", ts(10, 0), ts(10, 0));
        let eligible = profile_at("google-oauth2|ok", "a@x.com", ts(1, 0), ts(9, 0));
        let mut optout = profile_at("auth0|optout", "a@x.com", ts(1, 0), ts(12, 0));
        optout.user_metadata = meta(json!({"manually_unlinked": true}));
        let mut unverified = profile_at("auth0|unverified", "a@x.com", ts(1, 0), ts(11, 0));
        unverified.email_verified = false;
        let directory = Arc::new(MemoryDirectory::new(vec![
            subject.clone(),
            eligible.clone(),
            optout,
            unverified,
        ]));

        let outcome = linker().run(&subject, directory.as_ref()).await.unwrap();

        assert_eq!(outcome.profile.user_id, "google-oauth2|ok");
        for call in directory.calls() {
            match call {
                DirectoryCall::FindByEmail { .. } => {}
                DirectoryCall::UpdateUserMetadata { user_id, .. }
                | DirectoryCall::UpdateAppMetadata { user_id, .. }
                | DirectoryCall::LinkIdentity { primary_user_id: user_id, .. } => {
                    assert!(!user_id.contains("optout") && !user_id.contains("unverified"));
                }
            }
        }
    }
}
