use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{ChannelId, Condition, Escalation};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuleSeverity {
    Info,
    #[default]
    Warning,
    Critical,
}

impl RuleSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSeverity::Info => "info",
            RuleSeverity::Warning => "warning",
            RuleSeverity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    Email,
    Slack,
    Sms,
    Webhook,
    /// Any type this console does not know yet; the channel stays selectable.
    #[serde(other)]
    Other,
}

/// Delivery target fetched from the server. The console only reads these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationChannel {
    pub id: ChannelId,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub target: String,
}

/// Persisted alert rule as returned by the alerting API.
///
/// Notes:
/// - `id`, `created_at` and `updated_at` are server-assigned; timestamps are RFC3339 UTC.
/// - `conditions` are ANDed and keep their authored order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub severity: RuleSeverity,
    pub enabled: bool,
    pub conditions: Vec<Condition>,
    pub channel_ids: BTreeSet<ChannelId>,
    #[serde(default)]
    pub escalation: Escalation,
    pub created_at: String,
    pub updated_at: String,
}

impl AlertRule {
    /// The user-authored part of the rule, in payload form.
    pub fn to_input(&self) -> RuleInput {
        RuleInput {
            name: self.name.clone(),
            description: self.description.clone(),
            severity: self.severity,
            enabled: self.enabled,
            conditions: self.conditions.clone(),
            channel_ids: self.channel_ids.clone(),
            escalation: self.escalation.clone(),
        }
    }
}

/// Create/update payload: an `AlertRule` without `id`, `createdAt` and `updatedAt`.
///
/// `escalation` serializes as `null`, `{ steps, repeat }` or `{ policyId, repeat }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleInput {
    pub name: String,
    pub description: String,
    pub severity: RuleSeverity,
    pub enabled: bool,
    pub conditions: Vec<Condition>,
    pub channel_ids: BTreeSet<ChannelId>,
    #[serde(default)]
    pub escalation: Escalation,
}

impl RuleInput {
    /// Hex SHA-256 of the canonical JSON payload. Equal payloads yield equal fingerprints.
    pub fn fingerprint(&self) -> Result<String, AppError> {
        let json = serde_json::to_string(self).map_err(|e| {
            AppError::new("RULE_FINGERPRINT_FAILED", "Failed to serialize rule payload")
                .with_details(e.to_string())
        })?;
        let digest = Sha256::digest(json.as_bytes());
        Ok(hex::encode(digest))
    }
}
