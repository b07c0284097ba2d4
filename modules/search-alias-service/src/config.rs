use crate::defaults::{DEFAULT_SUGGEST_URL, DEFAULT_URL};
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    /// `[host]:port` to listen on
    pub bind: String,
    /// Bookmarks file; empty keeps bookmarks in memory only
    pub bookmarks_path: String,
    /// OpenSearch short name
    pub title: String,
    /// Public host (and port) used in the OpenSearch descriptor
    pub fqdn: String,
    /// Search template for queries that match nothing
    pub default_url: String,
    /// Suggestion template advertised to browsers
    pub suggest_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            bind: var("SEARCH_ALIAS_BIND", "0.0.0.0:8000"),
            bookmarks_path: var("SEARCH_ALIAS_BOOKMARKS", "bookmarks.toml"),
            title: var("SEARCH_ALIAS_TITLE", "Search"),
            fqdn: var("SEARCH_ALIAS_FQDN", "localhost:8000"),
            default_url: var("SEARCH_ALIAS_URL", DEFAULT_URL),
            suggest_url: var("SEARCH_ALIAS_SUGGEST_URL", DEFAULT_SUGGEST_URL),
        }
    }
}
