//! Search Alias Service: standalone binary redirecting short queries to bookmarks.
//!
//! Type `g rust traits` to land on a Google search, `add name url` to store a
//! new bookmark, `help` for the rest.
//! Default: http://0.0.0.0:8000/

mod commands;
mod config;
mod defaults;
mod dispatch;
mod pages;
mod registry;
mod routes;
mod watcher;

#[cfg(test)]
mod watcher_tests;

use config::Config;
use registry::Registry;
use routes::AppState;
use std::sync::Arc;
use watcher::ReloadWatcher;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    log::info!("Opening bookmarks at: {}", config.bookmarks_path);
    let registry = Arc::new(
        Registry::open(&config.bookmarks_path).expect("Failed to open bookmarks"),
    );

    if registry.is_empty() {
        log::info!("No bookmarks found, adding {} defaults", defaults::DEFAULT_BOOKMARKS.len());
        registry
            .seed_defaults(defaults::DEFAULT_BOOKMARKS)
            .expect("Failed to save default bookmarks");
    }
    log::info!("Loaded {} bookmarks", registry.len());

    let watcher = if registry.path().is_some() {
        match ReloadWatcher::start(registry.clone()) {
            Ok(w) => Some(w),
            Err(e) => {
                log::warn!("Hot reload disabled: {}", e);
                None
            }
        }
    } else {
        log::info!("Bookmarks kept in memory only");
        None
    };

    let mut state = AppState::new(registry, config.clone());
    state.watching = watcher.as_ref().map(|w| w.active_flag());
    let state = Arc::new(state);

    let cors = tower_http::cors::CorsLayer::permissive();

    let app = axum::Router::new()
        .route("/", axum::routing::get(routes::search))
        .route("/list", axum::routing::get(pages::list_page))
        .route("/help", axum::routing::get(pages::help_page))
        .route("/opensearch.xml", axum::routing::get(routes::opensearch))
        .route("/rpc/bookmarks", axum::routing::get(routes::list_bookmarks))
        .route("/rpc/status", axum::routing::get(routes::status))
        .with_state(state)
        .layer(cors);

    log::info!("Search Alias Service listening on http://{}", config.bind);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    if let Some(w) = watcher {
        log::debug!("Stopping watcher (active: {})", w.is_active());
        w.stop().await;
    }
    log::info!("Search Alias Service stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
