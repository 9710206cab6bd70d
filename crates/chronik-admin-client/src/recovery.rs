//! Cloud storage automated recovery.
//!
//! Recovery rebuilds topics from the object-storage backend. The cluster runs
//! it; this client only starts it and reads back its status.

use crate::transport::{AdminRequest, AdminTransport, HttpTransport};
use crate::{AdminApiConfig, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Admin endpoint for both starting and polling automated recovery.
pub const AUTOMATED_RECOVERY_PATH: &str = "/v1/cloud_storage/automated_recovery";

/// Body of a start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryRequest {
    /// Regex selecting the topics to restore. `.*` restores everything.
    pub topic_names_pattern: String,
}

/// Acknowledgement that the cluster accepted a start request.
///
/// `code` is whatever the cluster put there; it is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryStartResult {
    pub code: i64,
    pub message: String,
}

/// Point-in-time snapshot of automated recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryStatus {
    /// Server-defined state, e.g. `inactive` or `recovering_data`.
    pub state: String,

    /// Any other fields the cluster reports, kept as-is.
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// Starts and polls automated recovery through an [`AdminTransport`].
pub struct RecoveryClient<T = HttpTransport> {
    transport: T,
}

impl RecoveryClient<HttpTransport> {
    /// Connect to the admin nodes described by `config`.
    pub fn connect(config: &AdminApiConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::from_config(config)?))
    }
}

impl<T: AdminTransport> RecoveryClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Ask the cluster to start restoring topics matching `topic_names_pattern`.
    ///
    /// Sent once. A second start while recovery runs is rejected by the
    /// cluster with a 400, so retrying is left to the caller.
    pub async fn start_automated_recovery(
        &self,
        topic_names_pattern: &str,
    ) -> Result<RecoveryStartResult> {
        debug!("Starting automated recovery for pattern {topic_names_pattern:?}");
        let request = AdminRequest::post_json(
            AUTOMATED_RECOVERY_PATH,
            &RecoveryRequest {
                topic_names_pattern: topic_names_pattern.to_string(),
            },
        )?;
        self.transport.send(request).await?.into_json()
    }

    /// Fetch the current recovery status.
    pub async fn poll_automated_recovery_status(&self) -> Result<RecoveryStatus> {
        let request = AdminRequest::get(AUTOMATED_RECOVERY_PATH);
        self.transport.send(request).await?.into_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::AdminResponse;
    use crate::AdminClientError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records requests and answers each with the same canned response.
    struct CannedTransport {
        response: AdminResponse,
        requests: Mutex<Vec<AdminRequest>>,
    }

    impl CannedTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: AdminResponse::new(status, body),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded(&self) -> Vec<AdminRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AdminTransport for CannedTransport {
        async fn send(&self, request: AdminRequest) -> Result<AdminResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    #[tokio::test]
    async fn test_start_sends_pattern_verbatim() {
        let client = RecoveryClient::new(CannedTransport::new(
            200,
            r#"{"code":200,"message":"Automated recovery started"}"#,
        ));

        for pattern in [".*", "orders-.*", "^payments$", "a|b"] {
            client.start_automated_recovery(pattern).await.unwrap();
        }

        let recorded = client.transport().recorded();
        assert_eq!(recorded.len(), 4);
        for (request, pattern) in recorded.iter().zip([".*", "orders-.*", "^payments$", "a|b"]) {
            assert_eq!(request.method, reqwest::Method::POST);
            assert_eq!(request.path, AUTOMATED_RECOVERY_PATH);
            let body: serde_json::Value =
                serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
            assert_eq!(body, serde_json::json!({ "topic_names_pattern": pattern }));
        }
    }

    #[tokio::test]
    async fn test_start_returns_acknowledgement() {
        let client = RecoveryClient::new(CannedTransport::new(
            200,
            r#"{"code":200,"message":"Automated recovery started"}"#,
        ));

        let result = client.start_automated_recovery(".*").await.unwrap();
        assert_eq!(
            result,
            RecoveryStartResult {
                code: 200,
                message: "Automated recovery started".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_start_rejected_yields_no_result() {
        let client = RecoveryClient::new(CannedTransport::new(
            400,
            r#"{"message":"recovery already running","code":400}"#,
        ));

        let err = client.start_automated_recovery(".*").await.unwrap_err();
        let AdminClientError::HttpStatus(http) = err else {
            panic!("expected an HTTP status error");
        };
        assert_eq!(http.status, 400);
        assert_eq!(
            http.decode_generic_error_body().unwrap().message,
            "recovery already running"
        );
    }

    #[tokio::test]
    async fn test_poll_status_is_a_get() {
        let client = RecoveryClient::new(CannedTransport::new(200, r#"{"state":"inactive"}"#));

        let status = client.poll_automated_recovery_status().await.unwrap();
        assert_eq!(status.state, "inactive");
        assert!(status.details.is_empty());

        let recorded = client.transport().recorded();
        assert_eq!(recorded, vec![AdminRequest::get(AUTOMATED_RECOVERY_PATH)]);
    }

    #[tokio::test]
    async fn test_poll_status_keeps_extra_fields() {
        let client = RecoveryClient::new(CannedTransport::new(
            200,
            r#"{"state":"recovering_data","topic_download_counts":{"pending_downloads":3,"successful_downloads":7,"failed_downloads":0}}"#,
        ));

        let status = client.poll_automated_recovery_status().await.unwrap();
        assert_eq!(status.state, "recovering_data");
        assert_eq!(
            status.details["topic_download_counts"]["successful_downloads"],
            7
        );
    }

    #[tokio::test]
    async fn test_poll_status_missing_state_is_decode_error() {
        let client = RecoveryClient::new(CannedTransport::new(200, r#"{"status":"inactive"}"#));

        let err = client.poll_automated_recovery_status().await.unwrap_err();
        assert!(matches!(err, AdminClientError::Decode(_)));
    }
}
