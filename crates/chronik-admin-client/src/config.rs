//! Connection settings for the admin API.

use crate::{credentials::Credentials, AdminClientError, Result};
use reqwest::{Certificate, ClientBuilder, Identity};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default admin API port on every node.
pub const DEFAULT_ADMIN_PORT: u16 = 9644;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything needed to reach the admin API of a cluster.
#[derive(Debug, Clone)]
pub struct AdminApiConfig {
    /// Admin node addresses, tried in order. Either `host:port` or full URLs.
    pub addresses: Vec<String>,

    pub credentials: Credentials,

    /// TLS settings. When set, bare addresses default to `https`.
    pub tls: Option<TlsConfig>,

    pub timeout: Duration,
}

impl Default for AdminApiConfig {
    fn default() -> Self {
        Self {
            addresses: vec![format!("http://localhost:{DEFAULT_ADMIN_PORT}")],
            credentials: Credentials::None,
            tls: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AdminApiConfig {
    pub fn new(addresses: Vec<String>) -> Self {
        Self {
            addresses,
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URLs with a scheme and no trailing slash.
    pub fn base_urls(&self) -> Vec<String> {
        let scheme = if self.tls.is_some() { "https" } else { "http" };
        self.addresses
            .iter()
            .map(|addr| addr.trim())
            .filter(|addr| !addr.is_empty())
            .map(|addr| {
                let addr = addr.trim_end_matches('/');
                if addr.contains("://") {
                    addr.to_string()
                } else {
                    format!("{scheme}://{addr}")
                }
            })
            .collect()
    }
}

/// TLS configuration (PEM files)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// CA bundle used to verify the admin nodes.
    pub ca_file: Option<PathBuf>,

    /// Client certificate, for mTLS.
    pub cert_file: Option<PathBuf>,

    /// Client key, for mTLS.
    pub key_file: Option<PathBuf>,

    /// Accept any server certificate.
    pub insecure_skip_verify: bool,
}

impl TlsConfig {
    pub(crate) fn apply(&self, mut builder: ClientBuilder) -> Result<ClientBuilder> {
        builder = builder.use_rustls_tls();

        if let Some(ca_file) = &self.ca_file {
            let pem = read_pem(ca_file)?;
            let cert = Certificate::from_pem(&pem).map_err(|e| {
                AdminClientError::Config(format!("invalid CA file {}: {e}", ca_file.display()))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        match (&self.cert_file, &self.key_file) {
            (Some(cert_file), Some(key_file)) => {
                let mut pem = read_pem(cert_file)?;
                pem.push(b'\n');
                pem.extend(read_pem(key_file)?);
                let identity = Identity::from_pem(&pem).map_err(|e| {
                    AdminClientError::Config(format!("invalid client certificate or key: {e}"))
                })?;
                builder = builder.identity(identity);
            }
            (None, None) => {}
            _ => {
                return Err(AdminClientError::Config(
                    "client certificate and key must be provided together".to_string(),
                ))
            }
        }

        if self.insecure_skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(builder)
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| AdminClientError::Config(format!("unable to read {}: {e}", path.display())))
}
