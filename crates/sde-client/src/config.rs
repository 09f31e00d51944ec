use std::time::Duration;

use sde_core::Error;

pub const HOST_VAR: &str = "SDE_HOST";
pub const API_KEY_VAR: &str = "SDE_API_KEY";
pub const TIMEOUT_VAR: &str = "SDE_TIMEOUT_SECS";

/// Connection settings for an SD Elements instance.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the instance, e.g. `https://acme.sdelements.com`.
    pub host: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    #[must_use]
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read `SDE_HOST`, `SDE_API_KEY` and the optional `SDE_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or a value is malformed.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or a value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("{key} is not set")))
        };

        let host = required(HOST_VAR)?;
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(Error::Config(format!(
                "{HOST_VAR} must start with http:// or https://, got {host:?}"
            )));
        }
        let api_key = required(API_KEY_VAR)?;

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| Error::Config(format!("{TIMEOUT_VAR}: {e}")))?,
            None => Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            host,
            api_key,
            timeout,
        })
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
