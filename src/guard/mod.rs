//! URL guard module
//!
//! Screens the request URL before anything about it reaches a log:
//! - `validator`: accept/reject with an operator-facing reason
//! - `sanitizer`: safe-to-log rendition with sensitive parameters redacted

pub mod sanitizer;
pub mod validator;

pub use sanitizer::sanitize_url;
pub use validator::UrlValidator;

/// Why a URL was rejected.
///
/// `Missing` and `Malformed` are malformed input, `TooLong` is a size
/// violation, the rest are policy violations. The `Display` text is meant for
/// the operator log only; callers receive a generic error body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("URL is required and must be a string")]
    Missing,

    #[error("URL exceeds maximum length")]
    TooLong,

    #[error("Malformed URL")]
    Malformed,

    #[error("Invalid protocol. Only HTTPS is allowed")]
    Protocol,

    #[error("Domain not allowed")]
    DomainNotAllowed,

    #[error("URL contains suspicious content")]
    Suspicious,
}

impl Rejection {
    pub const fn kind(&self) -> RejectionKind {
        match self {
            Self::Missing | Self::Malformed => RejectionKind::MalformedInput,
            Self::TooLong => RejectionKind::Size,
            Self::Protocol | Self::DomainNotAllowed | Self::Suspicious => RejectionKind::Policy,
        }
    }
}

/// Broad class of a [`Rejection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// Absent, empty or unparseable
    MalformedInput,
    /// Disallowed scheme, host or content
    Policy,
    /// Over the length cap
    Size,
}

/// Outcome of validating a candidate URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Accepted; carries the normalized serialization of the parsed URL
    Valid(String),
    Invalid(Rejection),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            Rejection::Missing.to_string(),
            "URL is required and must be a string"
        );
        assert_eq!(Rejection::TooLong.to_string(), "URL exceeds maximum length");
        assert_eq!(Rejection::Malformed.to_string(), "Malformed URL");
        assert_eq!(
            Rejection::Protocol.to_string(),
            "Invalid protocol. Only HTTPS is allowed"
        );
        assert_eq!(Rejection::DomainNotAllowed.to_string(), "Domain not allowed");
        assert_eq!(
            Rejection::Suspicious.to_string(),
            "URL contains suspicious content"
        );
    }

    #[test]
    fn test_rejection_kinds() {
        let cases = [
            (Rejection::Missing, RejectionKind::MalformedInput),
            (Rejection::Malformed, RejectionKind::MalformedInput),
            (Rejection::TooLong, RejectionKind::Size),
            (Rejection::Protocol, RejectionKind::Policy),
            (Rejection::DomainNotAllowed, RejectionKind::Policy),
            (Rejection::Suspicious, RejectionKind::Policy),
        ];
        for (rejection, kind) in cases {
            assert_eq!(rejection.kind(), kind, "{rejection:?}");
        }
    }
}
