//! Candidate discovery: which other profiles are eligible for linking.

use std::error::Error;

use crate::ports::UserDirectory;
use crate::profile::Profile;

/// Finds profiles eligible to be linked with `subject`.
///
/// Preconditions checked before any directory call: the subject must have a
/// non-empty email, the email must be verified, and the subject must not be
/// flagged `manually_unlinked`. When any of these fail the result is an
/// empty list with zero outbound calls.
///
/// The directory result is filtered in order: profiles flagged
/// `manually_unlinked`, then unverified profiles, then the subject itself.
/// Directory-returned order is preserved.
///
/// # Errors
///
/// Returns an error when the directory query fails; the caller decides
/// whether that degrades or propagates.
pub async fn find_link_candidates(
    subject: &Profile,
    directory: &dyn UserDirectory,
) -> Result<Vec<Profile>, Box<dyn Error + Send + Sync>> {
    let Some(email) = subject.email.as_deref().filter(|e| !e.is_empty()) else {
        return Ok(Vec::new());
    };
    if !subject.email_verified || subject.manually_unlinked() {
        return Ok(Vec::new());
    }

    let profiles = directory.find_profiles_by_email(email).await?;
    Ok(profiles
        .into_iter()
        .filter(|p| !p.manually_unlinked())
        .filter(|p| p.email_verified)
        .filter(|p| p.user_id != subject.user_id)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::directory::{DirectoryCall, MemoryDirectory};
    use crate::testutil::profile;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn unverified_subject_makes_no_directory_call() {
        let directory = Arc::new(MemoryDirectory::new(vec![profile("auth0|other", "a@x.com")]));
        let mut subject = profile("auth0|me", "a@x.com");
        subject.email_verified = false;

        let candidates = find_link_candidates(&subject, directory.as_ref()).await.unwrap();
        assert!(candidates.is_empty());
        assert!(directory.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_email_makes_no_directory_call() {
        let directory = Arc::new(MemoryDirectory::new(vec![]));
        let mut subject = profile("auth0|me", "a@x.com");
        subject.email = None;

        let candidates = find_link_candidates(&subject, directory.as_ref()).await.unwrap();
        assert!(candidates.is_empty());
        assert!(directory.calls().is_empty());
    }

    #[tokio::test]
    async fn manually_unlinked_subject_makes_no_directory_call() {
        let directory = Arc::new(MemoryDirectory::new(vec![profile("auth0|other", "a@x.com")]));
        let mut subject = profile("auth0|me", "a@x.com");
        subject.user_metadata =
            Some(json!({"manually_unlinked": true}).as_object().unwrap().clone());

        let candidates = find_link_candidates(&subject, directory.as_ref()).await.unwrap();
        assert!(candidates.is_empty());
        assert!(directory.calls().is_empty());
    }

    #[tokio::test]
    async fn filters_unlinked_unverified_and_self() {
        let subject = profile("auth0|me", "a@x.com");
        let mut unlinked = profile("auth0|unlinked", "a@x.com");
        unlinked.user_metadata =
            Some(json!({"manually_unlinked": true}).as_object().unwrap().clone());
        let mut unverified = profile("auth0|unverified", "a@x.com");
        unverified.email_verified = false;
        let eligible = profile("google-oauth2|g1", "a@x.com");

        let directory = Arc::new(MemoryDirectory::new(vec![
            unlinked,
            subject.clone(),
            unverified,
            eligible.clone(),
        ]));

        let candidates = find_link_candidates(&subject, directory.as_ref()).await.unwrap();
        assert_eq!(candidates, vec![eligible]);
        assert_eq!(
            directory.calls(),
            vec![DirectoryCall::FindByEmail { email: "a@x.com".into() }]
        );
    }

    #[tokio::test]
    async fn preserves_directory_order() {
        let subject = profile("auth0|me", "a@x.com");
        let first = profile("auth0|first", "a@x.com");
        let second = profile("auth0|second", "a@x.com");
        let directory =
            Arc::new(MemoryDirectory::new(vec![first.clone(), second.clone()]));

        let candidates = find_link_candidates(&subject, directory.as_ref()).await.unwrap();
        assert_eq!(candidates, vec![first, second]);
    }

    #[tokio::test]
    async fn directory_failure_propagates_to_caller() {
        let directory = Arc::new(MemoryDirectory::new(vec![]));
        directory.fail_find();
        let subject = profile("auth0|me", "a@x.com");

        let result = find_link_candidates(&subject, directory.as_ref()).await;
        assert!(result.is_err());
    }
}
