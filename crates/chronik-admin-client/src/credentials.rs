//! Credentials attached to every admin API request.

use reqwest::RequestBuilder;
use std::fmt;

/// How requests authenticate against the admin API.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication header.
    #[default]
    None,
    /// HTTP basic authentication (SASL users on the admin listener).
    Basic { username: String, password: String },
    /// Bearer token.
    Bearer(String),
}

impl Credentials {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Credentials::Bearer(token.into())
    }

    /// Add the auth header, if any
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Credentials::None => request,
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::Bearer(token) => request.bearer_auth(token),
        }
    }
}

// Secrets never reach logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::None => f.write_str("None"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::Bearer(_) => f.debug_tuple("Bearer").field(&"***").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let basic = format!("{:?}", Credentials::basic("admin", "hunter2"));
        assert!(basic.contains("admin"));
        assert!(!basic.contains("hunter2"));

        let bearer = format!("{:?}", Credentials::bearer("tok-123"));
        assert!(!bearer.contains("tok-123"));
    }

    #[test]
    fn test_apply_sets_authorization_header() {
        let client = reqwest::Client::new();

        let request = Credentials::bearer("tok-123")
            .apply(client.get("http://localhost:9644/v1/status"))
            .build()
            .unwrap();
        assert_eq!(
            request.headers()["authorization"].to_str().unwrap(),
            "Bearer tok-123"
        );

        let request = Credentials::None
            .apply(client.get("http://localhost:9644/v1/status"))
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());
    }
}
