//! Safe-to-log URL rendition
//!
//! Sensitive query values are replaced with a marker, everything else in the
//! query is kept as received. The result is capped in length afterwards, so
//! a cut can land inside a marker.

use std::borrow::Cow;
use url::{form_urlencoded, Url};

/// Returned for absent or empty input
pub const INVALID_URL: &str = "[INVALID_URL]";

/// Returned when the input does not parse as a URL
pub const MALFORMED_URL: &str = "[MALFORMED_URL]";

/// Replacement value for sensitive parameters (stored form-encoded)
pub const REDACTED: &str = "[REDACTED]";

/// Appended after a cut
pub const TRUNCATION_MARKER: &str = "...[TRUNCATED]";

/// Characters kept before a cut
pub const MAX_LOGGED_LENGTH: usize = 200;

/// Query parameter names whose values never reach a log
pub const SENSITIVE_PARAMS: &[&str] = &["password", "token", "key", "secret", "api_key", "auth"];

/// Produce a log-safe rendition of `url`. Never fails.
pub fn sanitize_url(url: Option<&str>) -> String {
    let Some(raw) = url.filter(|u| !u.is_empty()) else {
        return INVALID_URL.to_string();
    };

    let Ok(mut parsed) = Url::parse(raw) else {
        return MALFORMED_URL.to_string();
    };

    if parsed.query().is_some_and(|q| q.split('&').all(str::is_empty)) {
        parsed.set_query(None);
    } else if let Some(redacted) = parsed.query().and_then(redact_query) {
        parsed.set_query(Some(&redacted));
    }

    truncate(parsed.as_str())
}

/// Rewrite sensitive pairs; `None` when nothing needed redacting
fn redact_query(query: &str) -> Option<String> {
    let marker: String = form_urlencoded::byte_serialize(REDACTED.as_bytes()).collect();
    let mut redacted_any = false;

    let pairs: Vec<Cow<'_, str>> = query
        .split('&')
        .map(|pair| {
            let name = pair.split_once('=').map_or(pair, |(name, _)| name);
            if is_sensitive(name) {
                redacted_any = true;
                Cow::Owned(format!("{name}={marker}"))
            } else {
                Cow::Borrowed(pair)
            }
        })
        .collect();

    redacted_any.then(|| pairs.join("&"))
}

/// Compare on the decoded name so `api%5Fkey` and `api_key` are the same
fn is_sensitive(raw_name: &str) -> bool {
    form_urlencoded::parse(raw_name.as_bytes())
        .next()
        .is_some_and(|(name, _)| SENSITIVE_PARAMS.iter().any(|param| *param == name))
}

fn truncate(serialized: &str) -> String {
    if serialized.chars().count() <= MAX_LOGGED_LENGTH {
        return serialized.to_string();
    }
    let mut cut: String = serialized.chars().take(MAX_LOGGED_LENGTH).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}
