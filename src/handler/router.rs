//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: health probes, route and method
//! eligibility, request URL reconstruction, then the function itself.

use crate::config::{AppState, FunctionConfig};
use crate::guard::{sanitize_url, RejectionKind};
use crate::handler::function::handle_invocation;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HOST, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::net::SocketAddr;
use std::time::Instant;

/// Methods the trigger accepts
pub const ALLOWED_METHODS: &str = "GET, POST";

/// Main entry point for HTTP request handling
///
/// The body is never read, so any body type is accepted.
pub fn handle_request<B>(
    req: &Request<B>,
    state: &AppState,
    remote_addr: SocketAddr,
) -> Response<Full<Bytes>> {
    let started = Instant::now();
    let path = req.uri().path();

    // 1. Health check endpoints
    let health = &state.config.routes.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return http::build_health_response("ok");
    }

    // 2. Only the function route exists
    if path != state.function_route {
        return http::build_404_response();
    }

    // 3. Routing eligibility; the method plays no further part
    if !matches!(*req.method(), Method::GET | Method::POST) {
        logger::log_warning(&format!("Method not allowed: {}", req.method()));
        return http::build_405_response(ALLOWED_METHODS);
    }

    // 4. Invoke
    let url = request_url(req, &state.config.function);
    let invocation = handle_invocation(url.as_deref(), &state.validator);
    let function = &state.config.function.name;
    match invocation.rejected {
        Some(RejectionKind::Policy) => {
            logger::log_policy_violation(function, &invocation.log_line);
        }
        _ => logger::log_invocation(function, &invocation.log_line),
    }

    if state.config.logging.access_log {
        let entry = access_entry(req, url.as_deref(), &invocation.response, remote_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    invocation.response
}

/// Access log entry carrying only the sanitized URL and referer
fn access_entry<B>(
    req: &Request<B>,
    url: Option<&str>,
    response: &Response<Full<Bytes>>,
    remote_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        sanitize_url(url),
    );
    entry.http_version = http_version(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = body_len(response);
    entry.referer = header_str(req, REFERER).map(|r| sanitize_url(Some(r)));
    entry.user_agent = header_str(req, USER_AGENT).map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

/// Reconstruct the absolute URL the caller addressed
///
/// Absolute-form targets are taken as-is. Otherwise the URL is assembled from
/// the scheme, the `Host` header and the path-and-query. `None` when there is
/// no usable `Host`.
pub fn request_url<B>(req: &Request<B>, function: &FunctionConfig) -> Option<String> {
    let uri = req.uri();
    if uri.scheme().is_some() {
        return Some(uri.to_string());
    }

    let host = header_str(req, HOST).filter(|h| !h.is_empty())?;
    let scheme = forwarded_proto(req, function).unwrap_or(function.public_scheme.as_str());
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());

    Some(format!("{scheme}://{host}{path_and_query}"))
}

/// First `X-Forwarded-Proto` value, when trusted
fn forwarded_proto<'a, B>(req: &'a Request<B>, function: &FunctionConfig) -> Option<&'a str> {
    if !function.trust_forwarded_proto {
        return None;
    }
    header_str(req, "x-forwarded-proto")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn header_str<B, K>(req: &Request<B>, name: K) -> Option<&str>
where
    K: hyper::header::AsHeaderName,
{
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

const fn http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

fn body_len(response: &Response<Full<Bytes>>) -> usize {
    response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}
