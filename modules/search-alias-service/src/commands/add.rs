//! Add command - stores a bookmark

use super::{Command, CommandError, LIST_PATH, Outcome};
use crate::registry::Registry;

/// Execute the add command
pub fn execute(name: &str, url: &str, registry: &Registry) -> Result<Outcome, CommandError> {
    // A bookmark named like a command could never be looked up.
    if Command::parse(name).is_some() {
        return Err(CommandError::Reserved(name.to_string()));
    }

    registry.add(name, url)?;
    log::info!("[SEARCH_ALIAS] Added bookmark '{}' -> {}", name, url);

    Ok(Outcome::Redirect(LIST_PATH.to_string()))
}
