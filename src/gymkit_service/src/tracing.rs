use std::time::Duration;

use ::tracing::{Level, Span};
use axum::body::Body;
use axum::http::{Request, Response};
use uuid::Uuid;

/// Each request gets its own span carrying a fresh request id, so every log
/// line produced while handling it can be correlated.
pub fn make_span_with_request_id(request: &Request<Body>) -> Span {
    let request_id = Uuid::new_v4();
    ::tracing::span!(
        Level::INFO,
        "request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    )
}

pub fn on_request(_request: &Request<Body>, _span: &Span) {
    ::tracing::event!(Level::INFO, "request received");
}

pub fn on_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    ::tracing::event!(
        Level::INFO,
        status = %response.status(),
        latency_ms = %latency.as_millis(),
        "response sent"
    );
}
