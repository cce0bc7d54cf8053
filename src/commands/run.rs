//! `acctlink run` command.

use std::path::Path;

use serde::Deserialize;

use crate::config::RuleConfig;
use crate::context::ServiceContext;
use crate::login::LoginContext;
use crate::profile::Profile;
use crate::rules::Pipeline;

/// A captured login event: the authenticated profile plus rule context.
#[derive(Deserialize)]
struct LoginEvent {
    user: Profile,
    context: LoginContext,
}

/// Execute the `run` command against a login-event fixture.
///
/// With `--profiles`, the pipeline runs against an in-memory directory
/// seeded from that file; otherwise against the live directory configured
/// in the environment.
///
/// # Errors
///
/// Returns an error string when a file cannot be read or parsed, the
/// context cannot be built, or a rule fails.
pub fn run(event_path: &Path, profiles_path: Option<&Path>) -> Result<(), String> {
    let event = read_json::<LoginEvent>(event_path)?;

    let services = match profiles_path {
        Some(path) => {
            let profiles = read_json::<Vec<Profile>>(path)?;
            let (services, _handles) =
                ServiceContext::in_memory(profiles, RuleConfig::from_env()?);
            services
        }
        None => ServiceContext::live(RuleConfig::from_env()?)?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to build async runtime: {e}"))?;

    let LoginEvent { mut user, mut context } = event;
    runtime.block_on(Pipeline::standard().run(&mut user, &mut context, &services))?;

    let output = serde_json::json!({ "user": user, "context": context });
    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|e| format!("Failed to render result: {e}"))?;
    println!("{rendered}");
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}
