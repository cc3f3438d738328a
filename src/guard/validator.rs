//! Request URL validation
//!
//! Checks run in a fixed order: presence, length, structure, scheme,
//! optional domain allow-list, then the suspicious-content screen.

use regex::RegexSet;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

use super::{Rejection, Validation};
use crate::config::ValidationConfig;

/// Longest URL accepted, in UTF-16 code units
pub const MAX_URL_LENGTH: usize = 2048;

/// Only scheme accepted
const ALLOWED_SCHEME: &str = "https";

/// Known injection vectors, matched case-insensitively against the raw input
const SUSPICIOUS_PATTERNS: &[&str] = &[
    r"(?i)javascript:",
    r"(?i)data:",
    r"(?i)vbscript:",
    r"(?i)<script",
    r"(?i)on[a-z0-9_]+=",
    r"(?i)\\x",
    r"(?i)%00",
];

static SUSPICIOUS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(SUSPICIOUS_PATTERNS).expect("suspicious URL patterns must compile")
});

/// URL validator with an optional host allow-list
#[derive(Debug, Clone, Default)]
pub struct UrlValidator {
    /// `None` leaves hosts unrestricted
    allowed_domains: Option<BTreeSet<String>>,
}

impl UrlValidator {
    pub fn from_config(config: &ValidationConfig) -> Self {
        let allow = &config.allowed_domains;
        if allow.enabled {
            Self::with_allowed_domains(&allow.domains)
        } else {
            Self::default()
        }
    }

    /// Restrict accepted hosts to `domains` and their subdomains
    pub fn with_allowed_domains<S: AsRef<str>>(domains: &[S]) -> Self {
        let domains = domains
            .iter()
            .map(|d| d.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        Self {
            allowed_domains: Some(domains),
        }
    }

    pub const fn restricts_domains(&self) -> bool {
        self.allowed_domains.is_some()
    }

    pub fn validate(&self, url: Option<&str>) -> Validation {
        match self.check(url) {
            Ok(normalized) => Validation::Valid(normalized),
            Err(rejection) => Validation::Invalid(rejection),
        }
    }

    fn check(&self, url: Option<&str>) -> Result<String, Rejection> {
        let raw = url.filter(|u| !u.is_empty()).ok_or(Rejection::Missing)?;

        if raw.encode_utf16().count() > MAX_URL_LENGTH {
            return Err(Rejection::TooLong);
        }

        let parsed = Url::parse(raw).map_err(|_| Rejection::Malformed)?;

        if parsed.scheme() != ALLOWED_SCHEME {
            return Err(Rejection::Protocol);
        }

        if let Some(allowed) = &self.allowed_domains {
            let host = parsed.host_str().unwrap_or_default();
            if !host_allowed(allowed, host) {
                return Err(Rejection::DomainNotAllowed);
            }
        }

        // Screen the raw text: the parser re-encodes some of these vectors
        if SUSPICIOUS.is_match(raw) {
            return Err(Rejection::Suspicious);
        }

        Ok(parsed.to_string())
    }
}

/// Exact match or dot-suffix subdomain match
fn host_allowed(allowed: &BTreeSet<String>, host: &str) -> bool {
    if host.is_empty() {
        return false;
    }
    if allowed.contains(host) {
        return true;
    }
    allowed
        .iter()
        .any(|domain| host.ends_with(&format!(".{domain}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(url: &str) -> Validation {
        UrlValidator::default().validate(Some(url))
    }

    fn accepted(validation: &Validation) -> bool {
        matches!(validation, Validation::Valid(_))
    }

    #[test]
    fn test_missing_or_empty() {
        let validator = UrlValidator::default();
        assert_eq!(
            validator.validate(None),
            Validation::Invalid(Rejection::Missing)
        );
        assert_eq!(
            validator.validate(Some("")),
            Validation::Invalid(Rejection::Missing)
        );
    }

    #[test]
    fn test_https_accepted_and_normalized() {
        assert_eq!(
            validate("https://example.com/a?x=1"),
            Validation::Valid("https://example.com/a?x=1".to_string())
        );
        assert_eq!(
            validate("HTTPS://Example.COM:443/a/../b"),
            Validation::Valid("https://example.com/b".to_string())
        );
        assert_eq!(
            validate("https://example.com"),
            Validation::Valid("https://example.com/".to_string())
        );
    }

    #[test]
    fn test_non_https_rejected() {
        assert_eq!(
            validate("http://example.com"),
            Validation::Invalid(Rejection::Protocol)
        );
        assert_eq!(
            validate("ftp://example.com/file"),
            Validation::Invalid(Rejection::Protocol)
        );
        assert_eq!(
            validate("javascript:alert(1)"),
            Validation::Invalid(Rejection::Protocol)
        );
    }

    #[test]
    fn test_malformed_rejected() {
        assert_eq!(validate("not a url"), Validation::Invalid(Rejection::Malformed));
        assert_eq!(validate("https://"), Validation::Invalid(Rejection::Malformed));
        assert_eq!(validate("   "), Validation::Invalid(Rejection::Malformed));
    }

    #[test]
    fn test_length_limit() {
        let base = "https://example.com/";
        let at_limit = format!("{base}{}", "a".repeat(MAX_URL_LENGTH - base.len()));
        assert!(accepted(&validate(&at_limit)));

        let over_limit = format!("{at_limit}a");
        assert_eq!(validate(&over_limit), Validation::Invalid(Rejection::TooLong));
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // Each emoji is one char but two UTF-16 units
        let base = "https://example.com/";
        let emoji_budget = (MAX_URL_LENGTH - base.len()) / 2;
        let at_limit = format!("{base}{}", "\u{1F600}".repeat(emoji_budget));
        assert!(accepted(&validate(&at_limit)));

        let over_limit = format!("{at_limit}\u{1F600}");
        assert!(over_limit.chars().count() < MAX_URL_LENGTH);
        assert_eq!(validate(&over_limit), Validation::Invalid(Rejection::TooLong));

        let doubled = format!("https://a/{}", "\u{1F600}".repeat(1100));
        assert_eq!(validate(&doubled), Validation::Invalid(Rejection::TooLong));
    }

    #[test]
    fn test_suspicious_patterns() {
        let cases = [
            "https://example.com/?q=<script>",
            "https://example.com/?q=<SCRIPT>alert(1)",
            "https://example.com/?next=JavaScript:alert(1)",
            "https://example.com/?img=data:text/html;base64,AAAA",
            "https://example.com/?v=vbscript:msgbox",
            "https://example.com/?onload=x",
            "https://example.com/?q=\\x3cscript",
            "https://example.com/file%00.txt",
            "https://example.com/#onerror=go",
        ];
        for case in cases {
            assert_eq!(
                validate(case),
                Validation::Invalid(Rejection::Suspicious),
                "expected suspicious: {case}"
            );
        }
    }

    #[test]
    fn test_plain_parameters_pass_screen() {
        assert!(accepted(&validate("https://example.com/search?q=rust&page=2")));
        assert!(accepted(&validate("https://example.com/api/smmsg?token=abc123")));
    }

    #[test]
    fn test_allow_list_disabled_by_default() {
        let validator = UrlValidator::from_config(&ValidationConfig::default());
        assert!(!validator.restricts_domains());
        assert!(accepted(&validator.validate(Some("https://anything.test/"))));
    }

    #[test]
    fn test_allow_list_enforced_when_enabled() {
        let validator = UrlValidator::with_allowed_domains(&["fiasse.org", "localhost"]);
        assert!(accepted(&validator.validate(Some("https://fiasse.org/"))));
        assert!(accepted(&validator.validate(Some("https://api.fiasse.org/x"))));
        assert!(accepted(&validator.validate(Some("https://localhost:7071/api/smmsg"))));
        assert_eq!(
            validator.validate(Some("https://evilfiasse.org/")),
            Validation::Invalid(Rejection::DomainNotAllowed)
        );
        assert_eq!(
            validator.validate(Some("https://example.com/")),
            Validation::Invalid(Rejection::DomainNotAllowed)
        );
    }

    #[test]
    fn test_host_allowed_normalizes_entries() {
        let validator = UrlValidator::with_allowed_domains(&[" .Fiasse.ORG "]);
        assert!(accepted(&validator.validate(Some("https://www.fiasse.org/"))));
    }
}
