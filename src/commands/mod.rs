//! Command dispatch and handlers.

pub mod rules;
pub mod run;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Run { event, profiles } => run::run(event, profiles.as_deref()),
        Command::Rules => rules::run(),
    }
}
