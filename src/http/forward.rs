//! Upstream forwarding.
//!
//! # Responsibilities
//! - Build the upstream target from the fixed base and the inbound path + query
//! - Issue exactly one upstream request per inbound request
//! - Bound the whole exchange (connect, handshake, head, body) by one deadline
//! - Relay status, headers and a streamed body back to the caller
//!
//! # Design Decisions
//! - A fresh client per request over a TLS config built once at startup
//! - No retries, no pooling across requests
//! - Request and response bodies are streamed, never buffered

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::BoxError;
use hyper::body::Bytes;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use rustls::ClientConfig;
use tokio::time::Instant;

use crate::http::body::DeadlineBody;
use crate::http::response::{self, strip_framing_headers};

/// HTTP client used for a single upstream exchange.
pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Error type for a failed forward attempt.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("invalid upstream target {target:?}")]
    InvalidTarget {
        target: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },
    #[error("failed to build upstream request")]
    Build(#[from] axum::http::Error),
    #[error("upstream request failed")]
    Upstream(#[from] hyper_util::client::legacy::Error),
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

impl ForwardError {
    /// Status returned to the caller for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::InvalidTarget { .. } | ForwardError::Build(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ForwardError::Upstream(_) | ForwardError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// The error with its full source chain, for logging.
    pub fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut source = self.source();
        while let Some(e) = source {
            detail.push_str(": ");
            detail.push_str(&e.to_string());
            source = e.source();
        }
        detail
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> axum::response::Response {
        match self.status() {
            StatusCode::INTERNAL_SERVER_ERROR => response::internal_error(),
            _ => response::service_unavailable(),
        }
    }
}

/// Forwards admitted requests to the single upstream endpoint.
#[derive(Debug, Clone)]
pub struct Forwarder {
    upstream: String,
    tls: Arc<ClientConfig>,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(upstream: &str, tls: Arc<ClientConfig>, timeout: Duration) -> Self {
        Self {
            upstream: upstream.trim_end_matches('/').to_string(),
            tls,
            timeout,
        }
    }

    /// Upstream base joined with the inbound path and query string.
    pub fn target_uri(&self, inbound: &Uri) -> Result<Uri, ForwardError> {
        let path_and_query = inbound
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let target = format!("{}{}", self.upstream, path_and_query);

        target
            .parse::<Uri>()
            .map_err(|source| ForwardError::InvalidTarget { target, source })
    }

    fn client(&self) -> UpstreamClient {
        let mut http = HttpConnector::new();
        http.enforce_http(false);

        let https = HttpsConnectorBuilder::new()
            .with_tls_config(ClientConfig::clone(&self.tls))
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(https)
    }

    /// Send the request upstream once and relay the response.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, ForwardError> {
        let deadline = Instant::now() + self.timeout;
        let (parts, body) = request.into_parts();
        let target = self.target_uri(&parts.uri)?;

        let mut outbound = Request::builder()
            .method(parts.method)
            .uri(target)
            .body(body)?;
        *outbound.headers_mut() = parts.headers;
        // Recomputed from the upstream authority.
        outbound.headers_mut().remove(header::HOST);

        let client = self.client();
        let response = tokio::time::timeout_at(deadline, client.request(outbound))
            .await
            .map_err(|_| ForwardError::Timeout(self.timeout))??;

        Ok(relay(response, deadline))
    }
}

/// Turn an upstream response into the caller's response.
pub fn relay<B>(response: Response<B>, deadline: Instant) -> Response<Body>
where
    B: hyper::body::Body<Data = Bytes> + Send + Unpin + 'static,
    B::Error: Into<BoxError>,
{
    let (mut parts, body) = response.into_parts();
    strip_framing_headers(&mut parts.headers);
    Response::from_parts(parts, Body::new(DeadlineBody::new(body, deadline)))
}
