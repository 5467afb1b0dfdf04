//! Response handling and transformation.
//!
//! # Responsibilities
//! - Build the sidecar's own error responses with generic bodies
//! - Strip framing headers from relayed upstream responses
//!
//! # Design Decisions
//! - Error bodies never carry detail; detail goes to the log
//! - hyper recomputes framing for relayed bodies

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Response, StatusCode};

/// Headers describing the upstream hop's body framing.
pub const FRAMING_HEADERS: [header::HeaderName; 2] =
    [header::CONTENT_LENGTH, header::TRANSFER_ENCODING];

/// Plain-text error response with a fixed message.
pub fn plain_error(status: StatusCode, message: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(format!("{}\n", message)));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
}

pub fn not_found() -> Response<Body> {
    plain_error(StatusCode::NOT_FOUND, "Not found")
}

pub fn internal_error() -> Response<Body> {
    plain_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

pub fn service_unavailable() -> Response<Body> {
    plain_error(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable")
}

/// Remove every framing header so the body is re-framed on the way out.
pub fn strip_framing_headers(headers: &mut HeaderMap) {
    for name in FRAMING_HEADERS.iter() {
        headers.remove(name);
    }
}
