//! HTTP transport to the admin API.
//!
//! [`AdminTransport`] is the only thing the typed clients depend on. The
//! production implementation, [`HttpTransport`], holds one reqwest client and
//! a list of admin node URLs. It fails over to the next node only when the
//! connection could not be established, so a request is never delivered
//! twice.

use crate::{config::AdminApiConfig, credentials::Credentials, AdminClientError, HttpStatusError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// A single admin API request, independent of the node it is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRequest {
    pub method: Method,
    /// Path relative to the node's base URL, starting with `/`.
    pub path: String,
    /// JSON-encoded body.
    pub body: Option<Vec<u8>>,
}

impl AdminRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post_json<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Ok(Self {
            method: Method::POST,
            path: path.into(),
            body: Some(serde_json::to_vec(body)?),
        })
    }
}

/// The raw answer of an admin node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl AdminResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode a 200 response, or turn any other status into an error.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        if self.status != 200 {
            return Err(HttpStatusError::new(
                self.status,
                String::from_utf8_lossy(&self.body).into_owned(),
            )
            .into());
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Sends admin requests somewhere and returns exactly one response.
#[async_trait]
pub trait AdminTransport: Send + Sync {
    async fn send(&self, request: AdminRequest) -> Result<AdminResponse>;
}

/// reqwest-backed transport over a set of admin nodes.
pub struct HttpTransport {
    http: reqwest::Client,
    base_urls: Vec<String>,
    credentials: Credentials,
}

impl HttpTransport {
    /// Build a transport from connection settings.
    pub fn from_config(config: &AdminApiConfig) -> Result<Self> {
        let base_urls = config.base_urls();
        if base_urls.is_empty() {
            return Err(AdminClientError::Config(
                "no admin API addresses configured".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if let Some(tls) = &config.tls {
            builder = tls.apply(builder)?;
        }
        let http = builder
            .build()
            .map_err(|e| AdminClientError::Config(format!("unable to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_urls,
            credentials: config.credentials.clone(),
        })
    }

    pub fn base_urls(&self) -> &[String] {
        &self.base_urls
    }
}

#[async_trait]
impl AdminTransport for HttpTransport {
    async fn send(&self, request: AdminRequest) -> Result<AdminResponse> {
        let mut last_error = None;

        for base_url in &self.base_urls {
            let url = format!("{base_url}{}", request.path);
            debug!("{} {url}", request.method);

            let mut builder = self.http.request(request.method.clone(), &url);
            if let Some(body) = &request.body {
                builder = builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.clone());
            }
            builder = self.credentials.apply(builder);

            match builder.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response.bytes().await.map_err(AdminClientError::transport)?;
                    debug!(status, "{} {url} answered", request.method);
                    return Ok(AdminResponse::new(status, body.to_vec()));
                }
                // Nothing was delivered, so the next node is safe to try.
                Err(e) if e.is_connect() => {
                    warn!("Admin node {base_url} unreachable: {e}");
                    last_error = Some(e);
                }
                Err(e) => return Err(AdminClientError::transport(e)),
            }
        }

        Err(last_error.map(AdminClientError::transport).unwrap_or_else(|| {
            AdminClientError::Config("no admin API addresses configured".to_string())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ack {
        ok: bool,
    }

    #[test]
    fn test_post_json_encodes_body() {
        let request = AdminRequest::post_json("/v1/ping", &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
    }

    #[test]
    fn test_into_json_on_200() {
        let ack: Ack = AdminResponse::new(200, r#"{"ok":true}"#).into_json().unwrap();
        assert_eq!(ack, Ack { ok: true });
    }

    #[test]
    fn test_into_json_rejects_other_success_codes() {
        let err = AdminResponse::new(202, r#"{"ok":true}"#)
            .into_json::<Ack>()
            .unwrap_err();
        assert_eq!(err.status(), Some(202));
    }

    #[test]
    fn test_into_json_keeps_error_body() {
        let err = AdminResponse::new(400, r#"{"message":"bad pattern"}"#)
            .into_json::<Ack>()
            .unwrap_err();
        match err {
            AdminClientError::HttpStatus(e) => {
                assert_eq!(e.status, 400);
                assert_eq!(e.body, r#"{"message":"bad pattern"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_into_json_malformed_body_is_decode_error() {
        let err = AdminResponse::new(200, "not json").into_json::<Ack>().unwrap_err();
        assert!(matches!(err, AdminClientError::Decode(_)));
    }

    #[test]
    fn test_from_config_normalizes_addresses() {
        let config = AdminApiConfig::new(vec![
            "broker-0:9644".into(),
            "http://broker-1:9644/".into(),
        ]);
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(
            transport.base_urls(),
            ["http://broker-0:9644", "http://broker-1:9644"]
        );
    }

    #[test]
    fn test_from_config_requires_addresses() {
        let config = AdminApiConfig::new(vec![]);
        assert!(matches!(
            HttpTransport::from_config(&config),
            Err(AdminClientError::Config(_))
        ));
    }
}
