//! Axum route handlers for the search endpoint and the RPC API.

use crate::commands::{CommandError, Outcome};
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::pages::escape_html;
use crate::registry::{Registry, RegistryError};
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use search_alias_types::*;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

pub struct AppState {
    pub registry: Arc<Registry>,
    pub dispatcher: Dispatcher,
    pub config: Config,
    pub start_time: Instant,
    /// Cleared when the reload watcher stops; `None` when it never started
    pub watching: Option<Arc<AtomicBool>>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, config: Config) -> Self {
        Self {
            dispatcher: Dispatcher::new(registry.clone(), config.default_url.clone()),
            registry,
            config,
            start_time: Instant::now(),
            watching: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

// GET /?q=<query>
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match state.dispatcher.dispatch(&params.q) {
        Ok(outcome) => outcome_response(outcome),
        Err(e) => {
            log::warn!("[SEARCH_ALIAS] Query '{}' failed: {}", params.q, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

fn outcome_response(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Redirect(url) => match HeaderValue::from_bytes(header_safe(&url).as_bytes()) {
            Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
            Err(_) => {
                log::warn!("[SEARCH_ALIAS] Cannot redirect to {:?}", url);
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect target").into_response()
            }
        },
        Outcome::Text(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response(),
    }
}

/// Replace line breaks and other control characters, which a header value
/// cannot carry, with spaces.
fn header_safe(url: &str) -> String {
    url.chars()
        .map(|c| if c.is_control() && c != '\t' { ' ' } else { c })
        .collect()
}

fn error_status(e: &CommandError) -> StatusCode {
    match e {
        CommandError::Usage(_) | CommandError::Reserved(_) => StatusCode::BAD_REQUEST,
        CommandError::Registry(RegistryError::UnknownBookmark(_)) => StatusCode::NOT_FOUND,
        CommandError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// GET /opensearch.xml
pub async fn opensearch(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = &state.config;
    let title = escape_html(&config.title);
    let fqdn = escape_html(&config.fqdn);
    let suggest = escape_html(&expand_template(&config.suggest_url, "{searchTerms}"));

    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<OpenSearchDescription xmlns="http://a9.com/-/spec/opensearch/1.1/" xmlns:moz="http://www.mozilla.org/2006/browser/search/">
  <ShortName>{title}</ShortName>
  <Description>{title}</Description>
  <InputEncoding>UTF-8</InputEncoding>
  <Url type="text/html" method="get" template="http://{fqdn}/?q={{searchTerms}}"/>
  <Url type="application/x-suggestions+json" template="{suggest}"/>
  <moz:SearchForm>http://{fqdn}/</moz:SearchForm>
</OpenSearchDescription>
"#,
    );

    (
        [(
            header::CONTENT_TYPE,
            "application/opensearchdescription+xml; charset=utf-8",
        )],
        xml,
    )
}

// GET /rpc/bookmarks
pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<Vec<Bookmark>>>) {
    (StatusCode::OK, Json(RpcResponse::ok(state.registry.all())))
}

// GET /rpc/status
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<ServiceStatus>>) {
    (
        StatusCode::OK,
        Json(RpcResponse::ok(ServiceStatus {
            running: true,
            uptime_secs: state.start_time.elapsed().as_secs(),
            bookmark_count: state.registry.len(),
            watching: state
                .watching
                .as_ref()
                .map(|w| w.load(Ordering::SeqCst))
                .unwrap_or(false),
        })),
    )
}
