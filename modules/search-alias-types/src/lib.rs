//! Shared types for the search alias service and its RPC clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Domain Types
// =====================================================

/// A named URL template usable as a redirect target.
///
/// The template may carry one `%s` placeholder that receives the text typed
/// after the bookmark name. `%%` stands for a literal percent sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub name: String,
    pub url: String,
}

impl Bookmark {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Where a lookup of this bookmark with trailing `text` should redirect.
    ///
    /// Templates without a placeholder, or lookups without trailing text,
    /// redirect to the literal template.
    pub fn redirect_target(&self, text: &str) -> String {
        if !text.is_empty() && has_placeholder(&self.url) {
            expand_template(&self.url, text)
        } else {
            self.url.clone()
        }
    }
}

/// Substitute `text` into the first `%s` of `template`.
///
/// `%%` collapses to `%`; any other `%` sequence (including a second `%s`)
/// is copied through untouched. No percent-encoding is applied to `text`.
pub fn expand_template(template: &str, text: &str) -> String {
    let mut out = String::with_capacity(template.len() + text.len());
    let mut substituted = false;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('s') if !substituted => {
                chars.next();
                out.push_str(text);
                substituted = true;
            }
            _ => out.push('%'),
        }
    }

    out
}

/// Whether `template` contains an unescaped `%s`.
pub fn has_placeholder(template: &str) -> bool {
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.next() {
                Some('s') => return true,
                Some(_) => {}
                None => return false,
            }
        }
    }
    false
}

// =====================================================
// RPC Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub bookmark_count: usize,
    pub watching: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> RpcResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_with_query() {
        let bookmark = Bookmark::new("g", "https://www.google.com/search?q=%s&btnK");
        assert_eq!(
            bookmark.redirect_target("foo bar"),
            "https://www.google.com/search?q=foo bar&btnK"
        );
    }

    #[test]
    fn test_redirect_without_query() {
        let bookmark = Bookmark::new("g", "https://www.google.com/search?q=%s&btnK");
        assert_eq!(
            bookmark.redirect_target(""),
            "https://www.google.com/search?q=%s&btnK"
        );
    }

    #[test]
    fn test_redirect_without_placeholder() {
        let bookmark = Bookmark::new("gh", "https://github.com/");
        assert_eq!(bookmark.redirect_target("rust"), "https://github.com/");
        assert_eq!(bookmark.redirect_target(""), "https://github.com/");
    }

    #[test]
    fn test_zero_bookmark() {
        let bookmark = Bookmark::new("", "");
        assert_eq!(bookmark.redirect_target(""), "");
        assert_eq!(bookmark.redirect_target("x"), "");
    }

    #[test]
    fn test_expand_empty_text() {
        assert_eq!(
            expand_template("https://x/?q=%s", ""),
            "https://x/?q="
        );
    }

    #[test]
    fn test_expand_escaped_percent() {
        let tpl = "http://www.google.com/search?q=define%%3A+%s&hl=en";
        assert!(has_placeholder(tpl));
        assert_eq!(
            expand_template(tpl, "rust"),
            "http://www.google.com/search?q=define%3A+rust&hl=en"
        );
    }

    #[test]
    fn test_expand_only_first_placeholder() {
        assert_eq!(expand_template("/%s/%s", "a"), "/a/%s");
    }

    #[test]
    fn test_escaped_placeholder_is_not_a_placeholder() {
        assert!(!has_placeholder("https://x/?q=%%s"));
        assert!(!has_placeholder("https://x/100%"));
        assert!(has_placeholder("%s"));
    }

    #[test]
    fn test_rpc_response_skips_empty_fields() {
        let ok = serde_json::to_value(RpcResponse::ok(3)).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": 3}));

        let err = serde_json::to_value(RpcResponse::<u8>::err("boom")).unwrap();
        assert_eq!(err, serde_json::json!({"success": false, "error": "boom"}));
    }
}
