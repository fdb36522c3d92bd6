mod condition;
mod escalation;
mod rule;

pub use condition::{AggregationKind, Comparator, Condition, ConditionWindow, MetricType};
pub use escalation::{Escalation, EscalationKind, EscalationPolicy, EscalationStep};
pub use rule::{AlertRule, ChannelType, NotificationChannel, RuleInput, RuleSeverity};

/// Channel ids are opaque server-assigned strings (`channel-email`, ...).
pub type ChannelId = String;
