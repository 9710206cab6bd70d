//! Connection configuration for admin API commands.
//!
//! Settings come from three layers, later ones winning:
//! 1. a config file (`--config` or `CHRONIK_CONFIG`), YAML, TOML or JSON
//! 2. `CHRONIK_*` environment variables
//! 3. command-line flags

use anyhow::{bail, Context, Result};
use chronik_admin_client::{AdminApiConfig, Credentials, TlsConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CONFIG_ENV: &str = "CHRONIK_CONFIG";
pub const ADMIN_URL_ENV: &str = "CHRONIK_ADMIN_URL";
pub const API_TOKEN_ENV: &str = "CHRONIK_API_TOKEN";
pub const ADMIN_USER_ENV: &str = "CHRONIK_ADMIN_USER";
pub const ADMIN_PASSWORD_ENV: &str = "CHRONIK_ADMIN_PASSWORD";

/// Connection flags shared by every admin API command
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConnectionArgs {
    /// Config file (.yaml, .toml or .json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Admin API address; repeat or comma-separate for several nodes
    #[arg(short, long = "admin-url", value_delimiter = ',', global = true)]
    pub admin_urls: Vec<String>,

    /// API token
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    /// User for basic auth
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Password for basic auth (prompted if a user is set without one)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// CA certificate (PEM) used to verify admin nodes
    #[arg(long, global = true)]
    pub tls_ca: Option<PathBuf>,

    /// Client certificate (PEM)
    #[arg(long, global = true)]
    pub tls_cert: Option<PathBuf>,

    /// Client key (PEM)
    #[arg(long, global = true)]
    pub tls_key: Option<PathBuf>,

    /// Skip server certificate verification
    #[arg(long, global = true)]
    pub tls_insecure_skip_verify: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

/// Config file layout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub admin_api: ConnectionSettings,
}

/// One layer of connection settings. Unset fields defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionSettings {
    pub addresses: Vec<String>,
    pub token: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub tls: Option<TlsSettings>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TlsSettings {
    pub ca_file: Option<PathBuf>,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub insecure_skip_verify: bool,
}

impl TlsSettings {
    fn merge(self, over: TlsSettings) -> Self {
        Self {
            ca_file: over.ca_file.or(self.ca_file),
            cert_file: over.cert_file.or(self.cert_file),
            key_file: over.key_file.or(self.key_file),
            insecure_skip_verify: over.insecure_skip_verify || self.insecure_skip_verify,
        }
    }
}

impl From<TlsSettings> for TlsConfig {
    fn from(tls: TlsSettings) -> Self {
        TlsConfig {
            ca_file: tls.ca_file,
            cert_file: tls.cert_file,
            key_file: tls.key_file,
            insecure_skip_verify: tls.insecure_skip_verify,
        }
    }
}

impl ConnectionSettings {
    /// Read settings from `CHRONIK_*` variables through `var`.
    pub fn from_env(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            addresses: var(ADMIN_URL_ENV)
                .map(|urls| split_addresses(&urls))
                .unwrap_or_default(),
            token: var(API_TOKEN_ENV),
            user: var(ADMIN_USER_ENV),
            password: var(ADMIN_PASSWORD_ENV),
            ..Default::default()
        }
    }

    /// Overlay `over` on top of `self`.
    pub fn merge(self, over: ConnectionSettings) -> Self {
        let tls = match (self.tls, over.tls) {
            (Some(base), Some(over)) => Some(base.merge(over)),
            (base, over) => over.or(base),
        };

        Self {
            addresses: if over.addresses.is_empty() {
                self.addresses
            } else {
                over.addresses
            },
            token: over.token.or(self.token),
            user: over.user.or(self.user),
            password: over.password.or(self.password),
            tls,
            timeout_secs: over.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Build the client configuration, prompting for a password if needed.
    pub fn into_admin_config(
        self,
        prompt_password: impl FnOnce(&str) -> std::io::Result<String>,
    ) -> Result<AdminApiConfig> {
        let credentials = match (self.token, self.user) {
            (Some(_), Some(_)) => bail!("a token and a user cannot both be set"),
            (Some(token), None) => Credentials::bearer(token),
            (None, Some(user)) => {
                let password = match self.password {
                    Some(password) => password,
                    None => prompt_password(&format!("Password for {user}: "))
                        .context("unable to read password")?,
                };
                Credentials::basic(user, password)
            }
            (None, None) => Credentials::None,
        };

        let mut config = if self.addresses.is_empty() {
            AdminApiConfig::default()
        } else {
            AdminApiConfig::new(self.addresses)
        };
        config = config.with_credentials(credentials);
        if let Some(tls) = self.tls {
            config = config.with_tls(tls.into());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

impl ConnectionArgs {
    fn to_settings(&self) -> ConnectionSettings {
        let tls_requested = self.tls_ca.is_some()
            || self.tls_cert.is_some()
            || self.tls_key.is_some()
            || self.tls_insecure_skip_verify;

        ConnectionSettings {
            addresses: self
                .admin_urls
                .iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
            token: self.token.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            tls: tls_requested.then(|| TlsSettings {
                ca_file: self.tls_ca.clone(),
                cert_file: self.tls_cert.clone(),
                key_file: self.tls_key.clone(),
                insecure_skip_verify: self.tls_insecure_skip_verify,
            }),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Resolve the admin API configuration for this invocation.
pub fn load(args: &ConnectionArgs) -> Result<AdminApiConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let file = match path {
        Some(path) => load_file(&path)?.admin_api,
        None => ConnectionSettings::default(),
    };
    let env = ConnectionSettings::from_env(|key| std::env::var(key).ok());

    let settings = file.merge(env).merge(args.to_settings());
    debug!(addresses = ?settings.addresses, "Resolved admin API settings");

    settings.into_admin_config(|prompt| rpassword::prompt_password(prompt))
}

/// Parse a config file, picking the format from its extension.
pub fn load_file(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read {}", path.display()))?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        _ => bail!(
            "unsupported config file {}: expected .yaml, .toml or .json",
            path.display()
        ),
    };

    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn split_addresses(urls: &str) -> Vec<String> {
    urls.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}
