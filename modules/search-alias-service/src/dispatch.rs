//! Query dispatch: command, bookmark, or default search.

use crate::commands::{self, Command, CommandError, Outcome};
use crate::registry::Registry;
use search_alias_types::expand_template;
use std::sync::Arc;

/// Resolves raw query strings against the command table and the registry.
pub struct Dispatcher {
    registry: Arc<Registry>,
    /// Search template used when nothing else matches
    default_url: String,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, default_url: impl Into<String>) -> Self {
        Self {
            registry,
            default_url: default_url.into(),
        }
    }

    /// Resolve one query.
    ///
    /// The first word selects a command or a bookmark; the rest are command
    /// arguments or, for a bookmark, the text substituted into its template.
    /// Anything unmatched goes to the default search with the whole query.
    pub fn dispatch(&self, query: &str) -> Result<Outcome, CommandError> {
        let query = query.trim();
        let parts: Vec<&str> = query.split_whitespace().collect();

        let Some((first, args)) = parts.split_first() else {
            return Ok(Outcome::Redirect(expand_template(&self.default_url, "")));
        };

        if let Some(cmd) = Command::parse(first) {
            return commands::execute(cmd, args, &self.registry);
        }

        if let Some(bookmark) = self.registry.get(first) {
            let text = args.join(" ");
            log::debug!("[SEARCH_ALIAS] Bookmark '{}' with '{}'", bookmark.name, text);
            return Ok(Outcome::Redirect(bookmark.redirect_target(&text)));
        }

        Ok(Outcome::Redirect(expand_template(&self.default_url, query)))
    }
}
