//! Binary entrypoint for the `acctlink` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match acctlink::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
