//! Markup handling for imported rich text.
//!
//! Question banks are exported from web pages, so titles, options and answers
//! often carry HTML. [`strip_tags`] reduces a fragment to its text for
//! comparison; [`sanitize`] neutralizes the tags that must never reach a
//! surface which interprets markup.

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

// A tag starts with `<`, an optional `/` or `!`, and a letter. A lone `<`
// followed by a space or digit stays text.
static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[/!]?[A-Za-z][^>]*>").expect("valid regex"));

static META: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<meta\b[^>]*>").expect("valid regex"));

static SCRIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex")
});

static EMBEDDED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(iframe|object|embed|base)\b[^>]*>").expect("valid regex")
});

/// Placeholder left where a meta tag was.
pub const META_PLACEHOLDER: &str = "&lt;meta tag removed&gt;";

/// Placeholder left where a script block was.
pub const SCRIPT_PLACEHOLDER: &str = "&lt;script removed&gt;";

/// Remove markup from a fragment, keeping its text content.
///
/// Comments are dropped, tags are removed and character references are
/// decoded (`&amp;` becomes `&`).
pub fn strip_tags(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let without_comments = COMMENT.replace_all(html, "");
    let text = TAG.replace_all(&without_comments, "");
    html_escape::decode_html_entities(&text).into_owned()
}

/// Neutralize tags that could navigate, execute code or embed foreign content.
///
/// - `<meta ...>` becomes a visible placeholder (stops refresh redirects).
/// - `<script>...</script>` is removed with its content.
/// - `<iframe>`, `<object>`, `<embed>` and `<base>` opening tags are replaced
///   by a placeholder naming the tag.
///
/// All other markup passes through unchanged.
pub fn sanitize(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let clean = META.replace_all(html, META_PLACEHOLDER);
    let clean = SCRIPT.replace_all(&clean, SCRIPT_PLACEHOLDER);
    let clean = EMBEDDED.replace_all(&clean, "&lt;${1} removed&gt;");
    clean.into_owned()
}
