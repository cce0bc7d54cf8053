//! ID-token name claims from user metadata.

use serde_json::Value;

use super::{Rule, RuleFuture};
use crate::context::ServiceContext;
use crate::login::LoginContext;
use crate::profile::Profile;

const CLAIM_NAMESPACE: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/";

/// Copies `given_name` and `family_name` from user metadata into
/// namespaced ID-token claims. Unconditional; missing fields are skipped.
pub struct IdTokenNameClaims;

impl Rule for IdTokenNameClaims {
    fn name(&self) -> &'static str {
        "id-token-name-claims"
    }

    fn apply<'a>(
        &'a self,
        user: &'a mut Profile,
        context: &'a mut LoginContext,
        _services: &'a ServiceContext,
    ) -> RuleFuture<'a> {
        Box::pin(async move {
            let Some(metadata) = user.user_metadata.as_ref() else {
                return Ok(());
            };
            if let Some(given_name) = metadata.get("given_name").and_then(Value::as_str) {
                context
                    .id_token
                    .insert(format!("{CLAIM_NAMESPACE}givenname"), Value::String(given_name.into()));
            }
            if let Some(family_name) = metadata.get("family_name").and_then(Value::as_str) {
                context
                    .id_token
                    .insert(format!("{CLAIM_NAMESPACE}surname"), Value::String(family_name.into()));
            }
            Ok(())
        })
    }
}
