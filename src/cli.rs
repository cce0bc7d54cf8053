//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `acctlink`.
#[derive(Debug, Parser)]
#[command(name = "acctlink", version, about = "Run login rules against a captured login event")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the standard rule pipeline against a login-event fixture.
    Run {
        /// Path to a JSON fixture holding `{"user": ..., "context": ...}`.
        event: PathBuf,
        /// Simulate offline against a JSON file of directory profiles
        /// instead of the live directory.
        #[arg(long)]
        profiles: Option<PathBuf>,
    },
    /// List the rules in pipeline order.
    Rules,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_run_subcommand() {
        let cli = Cli::parse_from(["acctlink", "run", "event.json"]);
        match cli.command {
            Command::Run { event, profiles } => {
                assert_eq!(event.to_str(), Some("event.json"));
                assert!(profiles.is_none());
            }
            Command::Rules => panic!("expected run"),
        }
    }

    #[test]
    fn parses_profiles_flag() {
        let cli = Cli::parse_from(["acctlink", "run", "event.json", "--profiles", "seed.json"]);
        match cli.command {
            Command::Run { profiles, .. } => {
                assert_eq!(profiles.unwrap().to_str(), Some("seed.json"));
            }
            Command::Rules => panic!("expected run"),
        }
    }

    #[test]
    fn parses_rules_subcommand() {
        let cli = Cli::parse_from(["acctlink", "rules"]);
        assert!(matches!(cli.command, Command::Rules));
    }
}
