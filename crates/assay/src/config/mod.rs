//! Configuration types for Assay.
//!
//! A [`Config`] seeds every request started with [`crate::given_with`]. It can be
//! built in code or loaded from YAML:
//!
//! ```yaml
//! request:
//!   base_uri: http://localhost
//!   port: 8080
//!   base_path: /api
//!   timeout_ms: 5000
//!   headers:
//!     x-tenant: acme
//! log:
//!   request: endpoint
//!   response: on_verification_failure
//!   sensitive_cookies: [session]
//! ```

mod log;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

pub use log::{LogConfig, RequestLogLevel, ResponseLogLevel};

use crate::error::RequestCreationError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub request: RequestDefaults,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, anyhow::Error> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.request.timeout_ms == Some(0) {
            anyhow::bail!("'request.timeout_ms' must be greater than zero");
        }

        if let Some(ref base_uri) = self.request.base_uri {
            let url = Url::parse(base_uri)
                .map_err(|e| anyhow::anyhow!("Invalid 'request.base_uri' '{}': {}", base_uri, e))?;
            if !matches!(url.scheme(), "http" | "https") {
                anyhow::bail!(
                    "Unsupported scheme '{}' in 'request.base_uri'. Currently supported: http, https",
                    url.scheme()
                );
            }
        }

        if self.request.base_path.is_some() && self.request.base_uri.is_none() {
            anyhow::bail!("'request.base_path' requires 'request.base_uri'");
        }

        Ok(())
    }
}

/// Defaults applied to each request before its own settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequestDefaults {
    /// Scheme and host that relative request URLs are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// Overrides the port of `base_uri`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Skip TLS certificate verification (for self-signed certs in dev/test)
    #[serde(default)]
    pub disable_ssl_certificate_validation: bool,
}

impl RequestDefaults {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Resolve a request URL against `base_uri`, `port` and `base_path`.
    ///
    /// Absolute URLs are returned unchanged.
    pub fn resolve_url(&self, url: &str) -> Result<String, RequestCreationError> {
        if url.contains("://") {
            return Ok(url.to_string());
        }

        let invalid = |reason: String| RequestCreationError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let base_uri = self
            .base_uri
            .as_deref()
            .ok_or_else(|| invalid("relative URL used without a base URI".to_string()))?;
        let mut base = Url::parse(base_uri).map_err(|e| invalid(e.to_string()))?;
        if let Some(port) = self.port {
            base.set_port(Some(port))
                .map_err(|_| invalid(format!("cannot set port {port} on '{base_uri}'")))?;
        }

        let mut resolved = base.as_str().trim_end_matches('/').to_string();
        for segment in [self.base_path.as_deref().unwrap_or(""), url] {
            let segment = segment.trim_matches('/');
            if !segment.is_empty() {
                resolved.push('/');
                resolved.push_str(segment);
            }
        }
        Ok(resolved)
    }
}
