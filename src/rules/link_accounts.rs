//! The account-linking rule: wraps the linker core.

use super::{Rule, RuleFuture};
use crate::context::ServiceContext;
use crate::linking::AccountLinker;
use crate::login::LoginContext;
use crate::profile::Profile;

/// Links same-email accounts and merges their metadata.
pub struct LinkAccounts;

impl Rule for LinkAccounts {
    fn name(&self) -> &'static str {
        "link-accounts"
    }

    fn apply<'a>(
        &'a self,
        user: &'a mut Profile,
        context: &'a mut LoginContext,
        services: &'a ServiceContext,
    ) -> RuleFuture<'a> {
        Box::pin(async move {
            let linker = AccountLinker::new(services.config.linker_options());
            let outcome = linker.run(user, services.directory.as_ref()).await?;
            if let Some(primary_user) = outcome.primary_user {
                context.primary_user = Some(primary_user);
            }
            // The subject may no longer exist as a standalone profile; pass
            // the surviving profile to the rest of the pipeline.
            *user = outcome.profile;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::testutil::{profile_at, ts};

    #[tokio::test]
    async fn replaces_user_with_primary_and_sets_context() {
        let subject = profile_at("auth0|me", "a@x.com", ts(10, 0), ts(10, 0));
        let candidate = profile_at("google-oauth2|g", "a@x.com", ts(1, 0), ts(5, 0));
        let (services, _handles) = ServiceContext::in_memory(
            vec![subject.clone(), candidate.clone()],
            RuleConfig::default(),
        );

        let mut user = subject;
        let mut context = LoginContext::default();
        LinkAccounts.apply(&mut user, &mut context, &services).await.unwrap();

        assert_eq!(user.user_id, "google-oauth2|g");
        assert_eq!(context.primary_user.as_deref(), Some("google-oauth2|g"));
    }

    #[tokio::test]
    async fn no_candidates_leaves_user_and_context_alone() {
        let subject = profile_at("auth0|me", "a@x.com", ts(10, 0), ts(10, 0));
        let (services, handles) =
            ServiceContext::in_memory(vec![subject.clone()], RuleConfig::default());

        let mut user = subject.clone();
        let mut context = LoginContext::default();
        LinkAccounts.apply(&mut user, &mut context, &services).await.unwrap();

        assert_eq!(user, subject);
        assert!(context.primary_user.is_none());
        assert_eq!(handles.directory.calls().len(), 1);
    }
}
