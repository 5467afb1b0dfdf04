//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tls_sidecar::config::ProxyConfig;
use tls_sidecar::http::HttpServer;
use tls_sidecar::lifecycle::Shutdown;
use tls_sidecar::net::TrustPolicy;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A request as seen by a mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Read one HTTP/1.1 request with an optional Content-Length body.
pub async fn read_request<S>(stream: &mut S) -> Option<RecordedRequest>
where
    S: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        target,
        headers,
        body,
    })
}

async fn respond<S>(stream: &mut S, status: &str, headers: &[(&str, &str)], body: &[u8])
where
    S: AsyncWrite + Unpin,
{
    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        body.len()
    );
    for (k, v) in headers {
        response.push_str(&format!("{}: {}\r\n", k, v));
    }
    response.push_str("\r\n");

    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.write_all(body).await;
    let _ = stream.shutdown().await;
}

/// Mock upstream that records every request and answers via `f`.
///
/// `f` receives the recorded request and returns (status line, headers, body).
pub async fn start_recording_backend<F, Fut>(
    f: F,
) -> (SocketAddr, mpsc::UnboundedReceiver<RecordedRequest>)
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (&'static str, Vec<(&'static str, &'static str)>, Vec<u8>)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(request) = read_request(&mut socket).await {
                    let _ = tx.send(request.clone());
                    let (status, headers, body) = f(request).await;
                    respond(&mut socket, status, &headers, &body).await;
                }
            });
        }
    });

    (addr, rx)
}

/// Mock upstream that always answers 200 with a fixed body.
pub async fn start_mock_backend(
    response: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<RecordedRequest>) {
    start_recording_backend(move |_| async move {
        ("200 OK", Vec::new(), response.as_bytes().to_vec())
    })
    .await
}

/// Upstream that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// Address on which nothing is listening.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A self-signed certificate and its PKCS#8 key.
pub struct TestCert {
    pub pem: String,
    pub der: Vec<u8>,
    pub key_der: Vec<u8>,
}

pub fn self_signed_cert() -> TestCert {
    let cert = rcgen::generate_simple_self_signed(vec![
        "localhost".to_string(),
        "127.0.0.1".to_string(),
    ])
    .unwrap();

    TestCert {
        pem: cert.serialize_pem().unwrap(),
        der: cert.serialize_der().unwrap(),
        key_der: cert.serialize_private_key_der(),
    }
}

/// TLS upstream presenting `cert`, answering 200 with `response`.
pub async fn start_tls_backend(
    cert: &TestCert,
    response: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<RecordedRequest>) {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(
            vec![CertificateDer::from(cert.der.clone())],
            PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(cert.key_der.clone())),
        )
        .unwrap();
    let acceptor = tokio_rustls::TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let Ok(mut stream) = acceptor.accept(socket).await else {
                    return;
                };
                if let Some(request) = read_request(&mut stream).await {
                    let _ = tx.send(request);
                    respond(&mut stream, "200 OK", &[], response.as_bytes()).await;
                }
            });
        }
    });

    (addr, rx)
}

/// Config pointing at `upstream` with the given allow-lists.
pub fn proxy_config(upstream: &str, paths: &[&str], methods: &[&str]) -> ProxyConfig {
    ProxyConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        upstream_endpoint: upstream.to_string(),
        allowed_paths: paths.iter().map(|s| s.to_string()).collect(),
        allowed_methods: methods.iter().map(|s| s.to_string()).collect(),
        request_timeout: Duration::from_secs(2),
        ..ProxyConfig::default()
    }
}

/// A running sidecar bound to an ephemeral port.
pub struct RunningProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn start_proxy(config: ProxyConfig) -> RunningProxy {
    let trust = TrustPolicy::resolve(config.ca_cert_path.as_deref()).unwrap();
    let server = HttpServer::new(&config, &trust).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    RunningProxy {
        addr,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
