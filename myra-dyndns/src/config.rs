//! Environment configuration
//!
//! | Variable | Default |
//! |----------|---------|
//! | `MYRA_API_HOST` | `app.myracloud.com` |
//! | `MYRA_API_LANGUAGE` | `de` |
//! | `MYRA_DOMAIN` | required |
//! | `MYRA_SUBDOMAIN` | `media.<MYRA_DOMAIN>` |
//! | `MYRA_CREDENTIALS_DIR` | `/tmp` |
//! | `MYRA_CREDENTIALS_NAME` | `myra` (reads `myra.key` and `myra.secret`) |
//! | `MYRA_RECORD_TTL` | `300` |
//! | `MYRA_INSECURE_TLS` | `false` |
//!
//! Empty values count as unset.

use std::path::PathBuf;

use thiserror::Error;

pub const ENV_API_HOST: &str = "MYRA_API_HOST";
pub const ENV_API_LANGUAGE: &str = "MYRA_API_LANGUAGE";
pub const ENV_DOMAIN: &str = "MYRA_DOMAIN";
pub const ENV_SUBDOMAIN: &str = "MYRA_SUBDOMAIN";
pub const ENV_CREDENTIALS_DIR: &str = "MYRA_CREDENTIALS_DIR";
pub const ENV_CREDENTIALS_NAME: &str = "MYRA_CREDENTIALS_NAME";
pub const ENV_RECORD_TTL: &str = "MYRA_RECORD_TTL";
pub const ENV_INSECURE_TLS: &str = "MYRA_INSECURE_TLS";

const DEFAULT_LANGUAGE: &str = "de";
const DEFAULT_SUBDOMAIN_LABEL: &str = "media";
const DEFAULT_CREDENTIALS_DIR: &str = "/tmp";
const DEFAULT_CREDENTIALS_NAME: &str = "myra";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not set")]
    Missing { name: &'static str },

    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyndnsConfig {
    pub host: String,
    pub language: String,
    pub domain: String,
    /// Fully qualified name of the A/AAAA records to update.
    pub subdomain: String,
    pub credentials_dir: PathBuf,
    pub credentials_name: String,
    pub ttl: u32,
    pub insecure_tls: bool,
}

impl DyndnsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let domain = get(ENV_DOMAIN).ok_or(ConfigError::Missing { name: ENV_DOMAIN })?;
        let subdomain =
            get(ENV_SUBDOMAIN).unwrap_or_else(|| format!("{DEFAULT_SUBDOMAIN_LABEL}.{domain}"));

        let ttl = match get(ENV_RECORD_TTL) {
            Some(value) => value.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    name: ENV_RECORD_TTL,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => myra_api::DEFAULT_TTL,
        };

        let insecure_tls = match get(ENV_INSECURE_TLS) {
            Some(value) => parse_bool(ENV_INSECURE_TLS, &value)?,
            None => false,
        };

        Ok(Self {
            host: get(ENV_API_HOST).unwrap_or_else(|| myra_api::DEFAULT_API_HOST.to_string()),
            language: get(ENV_API_LANGUAGE).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            domain,
            subdomain,
            credentials_dir: get(ENV_CREDENTIALS_DIR)
                .map_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_DIR), PathBuf::from),
            credentials_name: get(ENV_CREDENTIALS_NAME)
                .unwrap_or_else(|| DEFAULT_CREDENTIALS_NAME.to_string()),
            ttl,
            insecure_tls,
        })
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
