use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::validate::ValidationIssue;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Normal,
    Warning,
    Critical,
}

impl SeverityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Normal => "normal",
            SeverityTier::Warning => "warning",
            SeverityTier::Critical => "critical",
        }
    }

    /// Card color used by the health view.
    pub fn color(&self) -> &'static str {
        match self {
            SeverityTier::Normal => "green",
            SeverityTier::Warning => "orange",
            SeverityTier::Critical => "red",
        }
    }

    /// Whether the card shows an alert badge.
    pub fn raises_alert(&self) -> bool {
        !matches!(self, SeverityTier::Normal)
    }
}

/// Tier for a live value. Both boundaries are inclusive: reaching a threshold counts.
///
/// `warning <= critical` is assumed, not checked; with inverted thresholds the critical check
/// simply wins first.
pub fn classify(value: f64, warning: f64, critical: f64) -> SeverityTier {
    if value >= critical {
        SeverityTier::Critical
    } else if value >= warning {
        SeverityTier::Warning
    } else {
        SeverityTier::Normal
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HealthThresholds {
    pub warning: f64,
    pub critical: f64,
}

impl HealthThresholds {
    pub fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }

    pub fn classify(&self, value: f64) -> SeverityTier {
        classify(value, self.warning, self.critical)
    }

    /// Authoring-time check for card thresholds.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for (field, v) in [("warning", self.warning), ("critical", self.critical)] {
            if !v.is_finite() {
                issues.push(ValidationIssue {
                    kind: ErrorKind::Validation,
                    code: "VALIDATION_THRESHOLD_NOT_FINITE".to_string(),
                    field: field.to_string(),
                    message: format!("{field} threshold must be a finite number"),
                });
            }
        }
        if issues.is_empty() && self.warning > self.critical {
            issues.push(ValidationIssue {
                kind: ErrorKind::Validation,
                code: "VALIDATION_THRESHOLD_ORDER".to_string(),
                field: "warning".to_string(),
                message: "Warning threshold must not exceed the critical threshold".to_string(),
            });
        }
        issues
    }
}
