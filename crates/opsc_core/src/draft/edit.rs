use crate::domain::{AggregationKind, ChannelId, Comparator, Condition, MetricType, RuleSeverity};

/// One user interaction on the rule form.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    SetName(String),
    SetDescription(String),
    SetSeverity(RuleSeverity),
    SetEnabled(bool),

    AddCondition(Condition),
    RemoveCondition(usize),
    SetMetric { index: usize, metric: MetricType },
    SetOperator { index: usize, operator: Comparator },
    SetThreshold { index: usize, threshold: f64 },
    SetWindowDuration { index: usize, minutes: u32 },
    SetAggregation { index: usize, aggregation: AggregationKind },

    /// Add the channel to the rule's channel set, or remove it if already selected.
    ToggleChannel(ChannelId),

    ClearEscalation,
    /// Switch to inline steps. Any policy reference is dropped.
    UseInlineEscalation,
    /// Switch to a policy reference. Any inline steps are dropped.
    UsePolicy { policy_id: String, repeat: bool },
    AddStep { delay_minutes: u32 },
    RemoveStep(usize),
    SetStepDelay { index: usize, delay_minutes: u32 },
    ToggleStepChannel { step: usize, channel_id: ChannelId },
    SetRepeat(bool),
}

impl DraftEdit {
    pub fn name(&self) -> &'static str {
        match self {
            DraftEdit::SetName(_) => "set_name",
            DraftEdit::SetDescription(_) => "set_description",
            DraftEdit::SetSeverity(_) => "set_severity",
            DraftEdit::SetEnabled(_) => "set_enabled",
            DraftEdit::AddCondition(_) => "add_condition",
            DraftEdit::RemoveCondition(_) => "remove_condition",
            DraftEdit::SetMetric { .. } => "set_metric",
            DraftEdit::SetOperator { .. } => "set_operator",
            DraftEdit::SetThreshold { .. } => "set_threshold",
            DraftEdit::SetWindowDuration { .. } => "set_window_duration",
            DraftEdit::SetAggregation { .. } => "set_aggregation",
            DraftEdit::ToggleChannel(_) => "toggle_channel",
            DraftEdit::ClearEscalation => "clear_escalation",
            DraftEdit::UseInlineEscalation => "use_inline_escalation",
            DraftEdit::UsePolicy { .. } => "use_policy",
            DraftEdit::AddStep { .. } => "add_step",
            DraftEdit::RemoveStep(_) => "remove_step",
            DraftEdit::SetStepDelay { .. } => "set_step_delay",
            DraftEdit::ToggleStepChannel { .. } => "toggle_step_channel",
            DraftEdit::SetRepeat(_) => "set_repeat",
        }
    }
}
