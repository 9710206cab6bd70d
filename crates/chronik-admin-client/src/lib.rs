//! Client for the Chronik Stream admin HTTP API.
//!
//! The crate is split along the same seam the CLI relies on:
//! - [`transport`] moves requests to a set of admin nodes and back
//! - [`recovery`] turns the automated-recovery endpoints into typed calls
//! - [`error`] classifies what went wrong so callers can match on it

pub mod config;
pub mod credentials;
pub mod error;
pub mod recovery;
pub mod transport;

pub use config::{AdminApiConfig, TlsConfig};
pub use credentials::Credentials;
pub use error::{AdminClientError, GenericErrorBody, HttpStatusError, Result};
pub use recovery::{
    RecoveryClient, RecoveryRequest, RecoveryStartResult, RecoveryStatus,
    AUTOMATED_RECOVERY_PATH,
};
pub use transport::{AdminRequest, AdminResponse, AdminTransport, HttpTransport};
