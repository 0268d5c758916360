use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
});

/// `local@domain.tld`-shaped, ASCII only, no whitespace, at least one dot after `@`.
pub fn is_valid_email(s: &str) -> bool {
    !s.trim().is_empty() && s.is_ascii() && EMAIL_RE.is_match(s)
}

/// Parses `s` as an absolute URL, refusing input the parser would silently
/// rewrite. `Url::parse` drops embedded tabs and newlines and trims the ends,
/// so the stored string must already be free of them to be usable verbatim
/// as a `Location` header.
fn parse_verbatim(s: &str) -> Option<Url> {
    if s.is_empty() || s.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return None;
    }
    Url::parse(s).ok()
}

/// Absolute URL with the `https` scheme.
pub fn is_valid_redirect_url(s: &str) -> bool {
    matches!(parse_verbatim(s), Some(url) if url.scheme() == "https")
}

/// Absolute `http`/`https` URL with a host.
pub fn is_valid_webhook_url(s: &str) -> bool {
    matches!(
        parse_verbatim(s),
        Some(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some()
    )
}

/// Treat missing and whitespace-only values alike.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
