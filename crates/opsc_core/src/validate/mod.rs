use serde::{Deserialize, Serialize};

use crate::domain::{Condition, Escalation, EscalationPolicy, RuleInput};
use crate::error::{AppError, ErrorKind};

/// Field-addressed defect found while checking a rule payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub kind: ErrorKind,
    pub code: String,
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn invalid(code: &str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            code: code.to_string(),
            field: field.into(),
            message: message.into(),
        }
    }

    fn dangling(code: &str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Referential,
            code: code.to_string(),
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn to_error(&self) -> AppError {
        AppError::new(self.code.clone(), self.message.clone())
            .with_kind(self.kind)
            .with_field(self.field.clone())
    }
}

pub fn validate_condition(index: usize, condition: &Condition) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if !condition.threshold.is_finite() {
        issues.push(ValidationIssue::invalid(
            "VALIDATION_THRESHOLD_NOT_FINITE",
            format!("conditions[{index}].threshold"),
            "Threshold must be a finite number",
        ));
    }
    if condition.window.duration_minutes == 0 {
        issues.push(ValidationIssue::invalid(
            "VALIDATION_WINDOW_DURATION_INVALID",
            format!("conditions[{index}].window.durationMinutes"),
            "Window duration must be at least one minute",
        ));
    }
    issues
}

/// Check the active escalation variant.
///
/// Policy references are resolved against `policies`, the list currently loaded from the server;
/// a reference to a policy missing from it is a referential error, never dropped.
pub fn validate_escalation(
    escalation: &Escalation,
    policies: &[EscalationPolicy],
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    match escalation {
        Escalation::None => {}
        Escalation::Inline { steps, .. } => {
            if steps.is_empty() {
                issues.push(ValidationIssue::invalid(
                    "VALIDATION_ESCALATION_STEPS_REQUIRED",
                    "escalation.steps",
                    "Inline escalation needs at least one step",
                ));
            }
            for (i, step) in steps.iter().enumerate() {
                if step.channel_ids.is_empty() {
                    issues.push(ValidationIssue::invalid(
                        "VALIDATION_ESCALATION_STEP_CHANNELS_REQUIRED",
                        format!("escalation.steps[{i}].channelIds"),
                        format!("Escalation step {} must notify at least one channel", i + 1),
                    ));
                }
            }
        }
        Escalation::PolicyRef { policy_id, .. } => {
            if !policies.iter().any(|p| &p.id == policy_id) {
                issues.push(ValidationIssue::dangling(
                    "REFERENTIAL_POLICY_MISSING",
                    "escalation.policyId",
                    format!("Escalation policy '{policy_id}' no longer exists"),
                ));
            }
        }
    }
    issues
}

/// All defects of a rule payload, in form order (name, conditions, channels, escalation).
pub fn validate_rule_input(input: &RuleInput, policies: &[EscalationPolicy]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if input.name.trim().is_empty() {
        issues.push(ValidationIssue::invalid(
            "VALIDATION_NAME_REQUIRED",
            "name",
            "Rule name is required",
        ));
    }

    if input.conditions.is_empty() {
        issues.push(ValidationIssue::invalid(
            "VALIDATION_CONDITIONS_REQUIRED",
            "conditions",
            "At least one condition is required",
        ));
    }
    for (i, condition) in input.conditions.iter().enumerate() {
        issues.extend(validate_condition(i, condition));
    }

    if input.channel_ids.is_empty() {
        issues.push(ValidationIssue::invalid(
            "VALIDATION_CHANNELS_REQUIRED",
            "channelIds",
            "Select at least one notification channel",
        ));
    }

    issues.extend(validate_escalation(&input.escalation, policies));
    issues
}

pub fn is_valid_rule_input(input: &RuleInput, policies: &[EscalationPolicy]) -> bool {
    validate_rule_input(input, policies).is_empty()
}
