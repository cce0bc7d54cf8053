//! `acctlink rules` command.

use crate::rules::Pipeline;

/// Execute the `rules` command: print the pipeline in execution order.
///
/// # Errors
///
/// Infallible today; keeps the dispatch signature uniform.
pub fn run() -> Result<(), String> {
    for (index, name) in Pipeline::standard().rule_names().iter().enumerate() {
        println!("{}. {name}", index + 1);
    }
    Ok(())
}
