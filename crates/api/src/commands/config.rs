//! Config command - Prints the resolved settings.

use common::{AppResult, Settings};

/// Execute the config command
pub fn execute(settings: &Settings) -> AppResult<()> {
    println!("{:#?}", settings);
    Ok(())
}
