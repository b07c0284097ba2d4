//! HTML pages for the `list` and `help` commands.

use crate::commands::Command;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

const STYLE: &str = r#"<style>
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0f1117; color: #e0e0e0; padding: 20px; }
  h1 { color: #58a6ff; margin-bottom: 8px; }
  .meta { color: #8b949e; font-size: 0.85em; margin-bottom: 20px; }
  table { width: 100%; border-collapse: collapse; margin-bottom: 24px; }
  th { background: #161b22; color: #8b949e; text-align: left; padding: 8px 12px; font-size: 0.85em; text-transform: uppercase; border-bottom: 1px solid #30363d; }
  td { padding: 8px 12px; border-bottom: 1px solid #21262d; font-size: 0.9em; }
  tr:hover { background: #161b22; }
  .mono { font-family: 'SF Mono', 'Consolas', monospace; font-size: 0.85em; word-break: break-all; }
</style>"#;

// GET /list
pub async fn list_page(State(state): State<Arc<AppState>>) -> Response {
    let bookmarks = state.registry.all();

    let mut rows = String::new();
    for b in &bookmarks {
        rows.push_str(&format!(
            "<tr><td class=\"mono\">{}</td><td class=\"mono\">{}</td></tr>\n",
            escape_html(&b.name),
            escape_html(&b.url),
        ));
    }
    if rows.is_empty() {
        rows = "<tr><td colspan=\"2\">No bookmarks yet. Try <code>add name url</code>.</td></tr>"
            .to_string();
    }

    let body = format!(
        r#"<h1>Bookmarks</h1>
  <p class="meta">{count} bookmarks</p>
  <table>
    <thead><tr><th>Name</th><th>URL</th></tr></thead>
    <tbody>{rows}</tbody>
  </table>"#,
        count = bookmarks.len(),
        rows = rows,
    );

    html_page(&state.config.title, &body)
}

// GET /help
pub async fn help_page(State(state): State<Arc<AppState>>) -> Response {
    let mut rows = String::new();
    for cmd in Command::ALL {
        rows.push_str(&format!(
            "<tr><td class=\"mono\">{}</td><td>{}</td></tr>\n",
            escape_html(cmd.usage()),
            escape_html(cmd.description()),
        ));
    }

    let body = format!(
        r#"<h1>Help</h1>
  <p class="meta">Type a command, or a bookmark name followed by search terms. Anything else is searched with the default engine.</p>
  <table>
    <thead><tr><th>Command</th><th>Description</th></tr></thead>
    <tbody>{rows}</tbody>
  </table>"#,
        rows = rows,
    );

    html_page(&state.config.title, &body)
}

fn html_page(title: &str, body: &str) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="search" type="application/opensearchdescription+xml" title="{title}" href="/opensearch.xml">
{style}
</head>
<body>
  {body}
</body>
</html>"#,
        title = escape_html(title),
        style = STYLE,
        body = body,
    );

    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response()
}

/// Escape text for HTML and XML element or attribute content.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
