use std::time::Duration;

use opsc_core::domain::{AlertRule, EscalationPolicy, NotificationChannel, RuleInput};
use opsc_core::error::{AppError, ErrorKind};
use opsc_core::health::MetricSample;
use opsc_core::service::{AlertingService, MonitoringService};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::config::{base_url_string, normalize_base_url, ClientConfig};

/// Blocking REST client for the console API.
#[derive(Debug, Clone)]
pub struct HttpAlertingService {
    base: Url,
    agent: ureq::Agent,
}

/// Error body the API returns for rejected requests.
#[derive(Debug, Clone, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    field: Option<String>,
}

impl HttpAlertingService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let base = normalize_base_url(base_url)?;
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Ok(Self { base, agent })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    pub fn base_url(&self) -> String {
        base_url_string(&self.base)
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<String, AppError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::new("CONFIG_INVALID_BASE_URL", "API base URL cannot carry a path")
                    .with_details(format!("base_url={}", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, AppError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(method = "GET", %url, "api request");
        let resp = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .call();
        decode("GET", &url, resp)
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        method: &str,
        segments: &[&str],
        payload: &RuleInput,
    ) -> Result<T, AppError> {
        let url = self.endpoint(segments)?;
        let body = serde_json::to_value(payload).map_err(|e| {
            AppError::new("API_ENCODE_FAILED", "Failed to encode rule payload")
                .with_details(e.to_string())
        })?;
        tracing::debug!(method, %url, "api request");
        let resp = self
            .agent
            .request(method, &url)
            .set("Accept", "application/json")
            .send_json(body);
        decode(method, &url, resp)
    }
}

fn decode<T: DeserializeOwned>(
    method: &str,
    url: &str,
    resp: Result<ureq::Response, ureq::Error>,
) -> Result<T, AppError> {
    match resp {
        Ok(r) => r.into_json::<T>().map_err(|e| {
            AppError::new("API_DECODE_FAILED", "Failed to decode API response")
                .with_details(format!("{method} {url}; err={e}"))
        }),
        Err(ureq::Error::Status(status, r)) => {
            let body = r.into_string().unwrap_or_default();
            let err = status_error(status, &body);
            tracing::warn!(method, %url, status, code = %err.code, "api request rejected");
            Err(err)
        }
        Err(ureq::Error::Transport(t)) => {
            tracing::warn!(method, %url, err = %t, "api request failed");
            Err(AppError::transport(
                "TRANSPORT_REQUEST_FAILED",
                "Failed to reach the console API",
            )
            .with_details(format!("{method} {url}; err={t}")))
        }
    }
}

/// Map a non-2xx response onto the error taxonomy.
pub fn status_error(status: u16, body: &str) -> AppError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {status}"));

    let err = match status {
        400 | 422 => {
            let err = AppError::validation(
                parsed.code.unwrap_or_else(|| "VALIDATION_REJECTED".to_string()),
                message,
            );
            match parsed.field {
                Some(field) => err.with_field(field),
                None => err,
            }
        }
        404 => AppError::not_found(
            parsed.code.unwrap_or_else(|| "NOT_FOUND_RESOURCE".to_string()),
            message,
        ),
        _ => AppError::transport("TRANSPORT_HTTP_STATUS", message)
            .with_retryable(status >= 500 || status == 408 || status == 429),
    };
    err.with_details(format!("status={status}"))
}

impl AlertingService for HttpAlertingService {
    fn list_rules(&self) -> Result<Vec<AlertRule>, AppError> {
        self.get_json(&["api", "alert-rules"])
    }

    fn list_channels(&self) -> Result<Vec<NotificationChannel>, AppError> {
        self.get_json(&["api", "notification-channels"])
    }

    fn list_escalation_policies(&self) -> Result<Vec<EscalationPolicy>, AppError> {
        self.get_json(&["api", "escalation-policies"])
    }

    fn create_rule(&self, input: &RuleInput) -> Result<AlertRule, AppError> {
        let rule: AlertRule = self
            .send_json("POST", &["api", "alert-rules"], input)
            .map_err(|e| match e.kind {
                // A create targets no rule: 404 means the endpoint itself is missing.
                ErrorKind::NotFound => AppError {
                    kind: ErrorKind::Transport,
                    code: "TRANSPORT_HTTP_STATUS".to_string(),
                    retryable: false,
                    ..e
                },
                _ => e,
            })?;
        tracing::info!(rule_id = %rule.id, "alert rule created");
        Ok(rule)
    }

    fn update_rule(&self, rule_id: &str, input: &RuleInput) -> Result<AlertRule, AppError> {
        let rule: AlertRule = self
            .send_json("PUT", &["api", "alert-rules", rule_id], input)
            .map_err(|e| match e.kind {
                ErrorKind::NotFound => AppError {
                    code: "NOT_FOUND_RULE".to_string(),
                    ..e
                },
                _ => e,
            })?;
        tracing::info!(rule_id = %rule.id, "alert rule updated");
        Ok(rule)
    }
}

impl MonitoringService for HttpAlertingService {
    fn current_metrics(&self) -> Result<Vec<MetricSample>, AppError> {
        self.get_json(&["api", "metrics", "current"])
    }
}
