use crate::domain::{AlertRule, EscalationPolicy, NotificationChannel, RuleInput};
use crate::error::AppError;
use crate::health::MetricSample;

/// Alerting API the rule screen talks to.
///
/// Implementations report failures with the matching `ErrorKind`: `Validation` for rejected
/// payloads, `NotFound` when an update target is gone, `Transport` for everything else.
pub trait AlertingService {
    fn list_rules(&self) -> Result<Vec<AlertRule>, AppError>;
    fn list_channels(&self) -> Result<Vec<NotificationChannel>, AppError>;
    fn list_escalation_policies(&self) -> Result<Vec<EscalationPolicy>, AppError>;
    fn create_rule(&self, payload: &RuleInput) -> Result<AlertRule, AppError>;
    fn update_rule(&self, rule_id: &str, payload: &RuleInput) -> Result<AlertRule, AppError>;
}

/// Live indicator feed behind the health cards.
pub trait MonitoringService {
    fn current_metrics(&self) -> Result<Vec<MetricSample>, AppError>;
}
