//! Remove command - deletes a bookmark

use super::{CommandError, LIST_PATH, Outcome};
use crate::registry::Registry;

/// Execute the remove command
pub fn execute(name: &str, registry: &Registry) -> Result<Outcome, CommandError> {
    registry.delete(name)?;
    log::info!("[SEARCH_ALIAS] Removed bookmark '{}'", name);

    Ok(Outcome::Redirect(LIST_PATH.to_string()))
}
