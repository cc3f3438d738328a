//! `smmsg` function body
//!
//! Validates the request URL, then either rejects it with a generic error or
//! logs its sanitized form and answers with the fixed payload.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::guard::{sanitize_url, RejectionKind, UrlValidator, Validation};
use crate::http;

/// Body of every successful invocation
pub const SUCCESS_BODY: &str = "Relentlessly Practical. Relentlessly Securable.";

/// Message returned to the caller on any rejection
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request URL";

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Result of one invocation: what to send and what to log
pub struct Invocation {
    pub response: Response<Full<Bytes>>,
    /// Never contains the raw URL
    pub log_line: String,
    /// Set when the URL was rejected
    pub rejected: Option<RejectionKind>,
}

pub fn handle_invocation(url: Option<&str>, validator: &UrlValidator) -> Invocation {
    match validator.validate(url) {
        Validation::Invalid(rejection) => Invocation {
            response: http::build_json_response(
                StatusCode::BAD_REQUEST,
                &ErrorBody {
                    error: INVALID_REQUEST_MESSAGE,
                },
            ),
            log_line: format!("Invalid URL received: {rejection}"),
            rejected: Some(rejection.kind()),
        },
        Validation::Valid(_) => {
            // Sanitize what the caller sent, not the normalized form
            let sanitized = sanitize_url(url);
            Invocation {
                response: http::build_text_response(StatusCode::OK, SUCCESS_BODY),
                log_line: format!("Http function processed request for url \"{sanitized}\""),
                rejected: None,
            }
        }
    }
}
