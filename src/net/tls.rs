//! Upstream TLS trust resolution.
//!
//! The CA bundle is read and parsed once at startup. A missing path means the
//! upstream certificate is not verified at all.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, WebPkiSupportedAlgorithms};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};

/// Error type for trust material and TLS client setup.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("failed to read CA bundle {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse CA bundle {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CA bundle {path:?} contains no usable certificates")]
    NoCertificates { path: PathBuf },
    #[error("failed to build TLS client config: {0}")]
    Config(#[from] rustls::Error),
}

/// How the upstream certificate is checked.
#[derive(Debug, Clone)]
pub enum TrustPolicy {
    /// Verify the upstream chain against these roots.
    Roots(Arc<RootCertStore>),
    /// Accept any upstream certificate.
    SkipVerification,
}

impl TrustPolicy {
    /// Resolve the trust policy for an optional CA bundle path.
    pub fn resolve(ca_cert_path: Option<&Path>) -> Result<Self, TlsError> {
        match ca_cert_path {
            None => {
                tracing::info!("CA_CERT_PATH not set, upstream certificates will not be verified");
                Ok(TrustPolicy::SkipVerification)
            }
            Some(path) => {
                let policy = Self::from_pem_file(path)?;
                if let TrustPolicy::Roots(roots) = &policy {
                    tracing::info!(
                        path = %path.display(),
                        certificates = roots.len(),
                        "Loaded upstream CA bundle"
                    );
                }
                Ok(policy)
            }
        }
    }

    /// Load every certificate from a PEM bundle into a root store.
    pub fn from_pem_file(path: &Path) -> Result<Self, TlsError> {
        let file = File::open(path).map_err(|source| TlsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut reader)
            .collect::<Result<_, _>>()
            .map_err(|source| TlsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut roots = RootCertStore::empty();
        let (added, ignored) = roots.add_parsable_certificates(certs);
        if ignored > 0 {
            tracing::warn!(
                path = %path.display(),
                ignored,
                "Skipped unparseable certificates in CA bundle"
            );
        }
        if added == 0 {
            return Err(TlsError::NoCertificates {
                path: path.to_path_buf(),
            });
        }

        Ok(TrustPolicy::Roots(Arc::new(roots)))
    }

    /// Build the client TLS config shared by every upstream connection.
    pub fn client_config(&self) -> Result<ClientConfig, TlsError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let builder = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()?;

        let config = match self {
            TrustPolicy::Roots(roots) => builder
                .with_root_certificates(Arc::clone(roots))
                .with_no_client_auth(),
            TrustPolicy::SkipVerification => builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoVerifier::new(&provider)))
                .with_no_client_auth(),
        };

        Ok(config)
    }
}

/// Accepts any certificate chain but still checks handshake signatures.
#[derive(Debug)]
pub struct NoVerifier {
    algorithms: WebPkiSupportedAlgorithms,
}

impl NoVerifier {
    pub fn new(provider: &CryptoProvider) -> Self {
        Self {
            algorithms: provider.signature_verification_algorithms,
        }
    }
}

impl ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}
