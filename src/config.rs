//! Process configuration, read once at startup from the environment.

use crate::chat::SelectionPolicy;
use crate::error::{LogisError, Result};
use crate::llm::broker::DEFAULT_MODEL;
use crate::llm::gateways::mistral::{MistralConfig, DEFAULT_BASE_URL};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CATALOG_PATH: &str = "logements.json";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gateway: MistralConfig,
    pub model: String,
    pub catalog_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub selection_policy: SelectionPolicy,
    /// Idle time after which a visitor session is dropped.
    pub session_ttl: Duration,
}

impl AppConfig {
    /// Read the configuration from process environment variables.
    ///
    /// A missing `MISTRAL_API_KEY` is not an error; the provider rejects the request.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind = lookup("LOGIS_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse()
            .map_err(|_| LogisError::ConfigError(format!("invalid LOGIS_BIND address `{}`", bind)))?;

        let selection_policy = match lookup("LOGIS_RESET_ON_SELECT") {
            None => SelectionPolicy::default(),
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => SelectionPolicy::ResetConversation,
                "0" | "false" | "no" | "off" | "" => SelectionPolicy::KeepConversation,
                _ => {
                    return Err(LogisError::ConfigError(format!(
                        "invalid LOGIS_RESET_ON_SELECT value `{}`",
                        value
                    )))
                }
            },
        };

        let session_ttl = match lookup("LOGIS_SESSION_TTL_SECS") {
            None => Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(LogisError::ConfigError(format!(
                        "invalid LOGIS_SESSION_TTL_SECS value `{}`",
                        value
                    )))
                }
            },
        };

        Ok(Self {
            gateway: MistralConfig {
                api_key: lookup("MISTRAL_API_KEY").unwrap_or_default(),
                base_url: lookup("MISTRAL_API_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout: None,
            },
            model: lookup("LOGIS_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            catalog_path: lookup("LOGIS_CATALOG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
            bind_addr,
            selection_policy,
            session_ttl,
        })
    }
}
