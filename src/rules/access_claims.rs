//! Access-token email claim for flagged clients.

use serde_json::json;

use super::{Rule, RuleFuture};
use crate::context::ServiceContext;
use crate::login::LoginContext;
use crate::profile::Profile;

const CLAIM_NAMESPACE: &str = "https://sil.org/";

/// Adds the subject's email-verification state to the access token for
/// clients flagged `isAudioManagerApp`.
pub struct AccessTokenEmailClaim;

impl Rule for AccessTokenEmailClaim {
    fn name(&self) -> &'static str {
        "access-token-email-claim"
    }

    fn apply<'a>(
        &'a self,
        user: &'a mut Profile,
        context: &'a mut LoginContext,
        _services: &'a ServiceContext,
    ) -> RuleFuture<'a> {
        Box::pin(async move {
            if !context.client_flag("isAudioManagerApp") {
                return Ok(());
            }
            context
                .access_token
                .insert(format!("{CLAIM_NAMESPACE}email_verified"), json!(user.email_verified));
            Ok(())
        })
    }
}
