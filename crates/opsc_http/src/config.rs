use std::fs;
use std::path::Path;

use opsc_core::error::AppError;
use serde::{Deserialize, Serialize};
use url::Url;

pub const ENV_API_URL: &str = "OPSC_API_URL";
pub const ENV_TIMEOUT_MS: &str = "OPSC_TIMEOUT_MS";
pub const ENV_LOG: &str = "OPSC_LOG";

/// Settings for talking to the console API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_ms: 5_000,
            log_filter: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, then the JSON file (when given), then `OPSC_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path).map_err(|e| {
            AppError::new("CONFIG_READ_FAILED", "Failed to read client config")
                .with_details(format!("path={}; err={e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            AppError::new("CONFIG_INVALID", "Client config is not valid JSON")
                .with_details(format!("path={}; err={e}", path.display()))
        })?;
        config.validated()
    }

    /// Apply overrides from `lookup` (the process environment in production).
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), AppError> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = raw.trim().parse().map_err(|_| {
                AppError::new("CONFIG_INVALID", format!("{ENV_TIMEOUT_MS} must be an integer"))
                    .with_details(format!("value={raw}"))
            })?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }
        *self = self.clone().validated()?;
        Ok(())
    }

    fn validated(mut self) -> Result<Self, AppError> {
        self.base_url = base_url_string(&normalize_base_url(&self.base_url)?);
        if self.timeout_ms == 0 {
            return Err(AppError::new(
                "CONFIG_INVALID",
                "timeout_ms must be greater than zero",
            ));
        }
        Ok(self)
    }
}

/// Parse an API base URL: `http(s)://host[:port][/prefix]`, no credentials, query or fragment.
pub fn normalize_base_url(raw: &str) -> Result<Url, AppError> {
    let invalid = |why: String| {
        AppError::new("CONFIG_INVALID_BASE_URL", "API base URL is not usable")
            .with_details(format!("base_url={raw}; {why}"))
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https".to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("host is missing".to_string()));
    }
    // Userinfo would let `http://api@evil` pass for `api`.
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid("credentials in URL are not allowed".to_string()));
    }
    if url.port() == Some(0) {
        return Err(invalid("port must be 1-65535".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(url)
}

/// Display form of a base URL: trailing slashes trimmed.
pub fn base_url_string(url: &Url) -> String {
    url.as_str().trim_end_matches('/').to_string()
}
