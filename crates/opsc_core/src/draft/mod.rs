use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::compose::{check_update_ack, compose, RuleStamps, SubmitRequest};
use crate::domain::{
    AlertRule, ChannelId, Condition, Escalation, EscalationPolicy, EscalationStep, RuleInput,
    RuleSeverity,
};
use crate::error::AppError;
use crate::validate::{validate_rule_input, ValidationIssue};

mod edit;

pub use edit::DraftEdit;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum DraftMode {
    Create,
    Edit { original_rule_id: String },
}

impl DraftMode {
    /// Past-tense verb for the confirmation message.
    pub fn verb(&self) -> &'static str {
        match self {
            DraftMode::Create => "created",
            DraftMode::Edit { .. } => "updated",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DraftPhase {
    Empty,
    Editing,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-visible message produced by a submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub field: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    /// No submission was in flight; nothing changed.
    Ignored,
    Succeeded,
    Failed,
}

/// What the screen must do after a submission completes.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub status: SubmitStatus,
    pub notice: Option<Notice>,
    pub rule: Option<AlertRule>,
    pub refresh_rule_list: bool,
    pub return_to_list: bool,
}

impl SubmitOutcome {
    fn ignored() -> Self {
        Self {
            status: SubmitStatus::Ignored,
            notice: None,
            rule: None,
            refresh_rule_list: false,
            return_to_list: false,
        }
    }
}

/// In-progress alert rule form.
///
/// Fields may sit in invalid intermediate states while the user types; validity is derived on
/// demand. All mutation goes through [`RuleDraft::apply`] and the submit transitions so the
/// phase machine (`Empty -> Editing -> Submitting -> Succeeded | Failed`) stays consistent. A
/// successful create resets straight to `Empty`; a successful update ends in `Succeeded`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDraft {
    mode: DraftMode,
    phase: DraftPhase,
    name: String,
    description: String,
    severity: RuleSeverity,
    enabled: bool,
    conditions: Vec<Condition>,
    channel_ids: BTreeSet<ChannelId>,
    escalation: Escalation,
    stamps: Option<RuleStamps>,
    baseline: Option<String>,
    last_error: Option<AppError>,
}

impl Default for RuleDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleDraft {
    /// Empty create-mode draft.
    pub fn new() -> Self {
        let mut draft = Self {
            mode: DraftMode::Create,
            phase: DraftPhase::Empty,
            name: String::new(),
            description: String::new(),
            severity: RuleSeverity::default(),
            enabled: true,
            conditions: Vec::new(),
            channel_ids: BTreeSet::new(),
            escalation: Escalation::None,
            stamps: None,
            baseline: None,
            last_error: None,
        };
        draft.baseline = draft.to_input().fingerprint().ok();
        draft
    }

    /// Edit-mode draft pre-filled from `rule`. Starts in `Editing` so an unchanged rule can be
    /// resubmitted as is.
    pub fn for_edit(rule: &AlertRule) -> Self {
        let mut draft = Self {
            mode: DraftMode::Edit {
                original_rule_id: rule.id.clone(),
            },
            phase: DraftPhase::Editing,
            name: rule.name.clone(),
            description: rule.description.clone(),
            severity: rule.severity,
            enabled: rule.enabled,
            conditions: rule.conditions.clone(),
            channel_ids: rule.channel_ids.clone(),
            escalation: rule.escalation.clone(),
            stamps: Some(RuleStamps {
                created_at: rule.created_at.clone(),
                updated_at: rule.updated_at.clone(),
            }),
            baseline: None,
            last_error: None,
        };
        draft.baseline = draft.to_input().fingerprint().ok();
        tracing::debug!(rule_id = %rule.id, "edit draft hydrated");
        draft
    }

    pub fn mode(&self) -> &DraftMode {
        &self.mode
    }

    pub fn phase(&self) -> DraftPhase {
        self.phase
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn severity(&self) -> RuleSeverity {
        self.severity
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn channel_ids(&self) -> &BTreeSet<ChannelId> {
        &self.channel_ids
    }

    pub fn escalation(&self) -> &Escalation {
        &self.escalation
    }

    pub fn stamps(&self) -> Option<&RuleStamps> {
        self.stamps.as_ref()
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    /// Current field values in payload form.
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

    pub fn issues(&self, policies: &[EscalationPolicy]) -> Vec<ValidationIssue> {
        validate_rule_input(&self.to_input(), policies)
    }

    pub fn is_valid(&self, policies: &[EscalationPolicy]) -> bool {
        self.issues(policies).is_empty()
    }

    /// Whether the submit affordance is enabled.
    pub fn can_submit(&self, policies: &[EscalationPolicy]) -> bool {
        matches!(self.phase, DraftPhase::Editing | DraftPhase::Failed) && self.is_valid(policies)
    }

    /// Whether the fields differ from what the draft was opened with.
    pub fn has_changes(&self) -> bool {
        match (self.to_input().fingerprint(), &self.baseline) {
            (Ok(current), Some(baseline)) => &current != baseline,
            _ => true,
        }
    }

    /// Apply one form edit.
    ///
    /// Rejected edits (locked draft, bad index, step edit without inline escalation) leave the
    /// draft and its phase untouched.
    pub fn apply(&mut self, edit: DraftEdit) -> Result<(), AppError> {
        if self.phase == DraftPhase::Submitting {
            return Err(AppError::validation(
                "DRAFT_LOCKED",
                "The rule is being saved; edits are disabled",
            ));
        }

        let kind = edit.name();
        self.apply_fields(edit).map_err(|e| {
            tracing::debug!(edit = kind, code = %e.code, "draft edit rejected");
            e
        })?;

        if self.phase != DraftPhase::Editing {
            tracing::debug!(from = ?self.phase, edit = kind, "draft entered editing");
            self.phase = DraftPhase::Editing;
            self.last_error = None;
        }
        Ok(())
    }

    fn apply_fields(&mut self, edit: DraftEdit) -> Result<(), AppError> {
        match edit {
            DraftEdit::SetName(name) => self.name = name,
            DraftEdit::SetDescription(description) => self.description = description,
            DraftEdit::SetSeverity(severity) => self.severity = severity,
            DraftEdit::SetEnabled(enabled) => self.enabled = enabled,

            DraftEdit::AddCondition(condition) => self.conditions.push(condition),
            DraftEdit::RemoveCondition(index) => {
                check_index("conditions", index, self.conditions.len())?;
                self.conditions.remove(index);
            }
            DraftEdit::SetMetric { index, metric } => self.condition_mut(index)?.metric = metric,
            DraftEdit::SetOperator { index, operator } => {
                self.condition_mut(index)?.operator = operator
            }
            DraftEdit::SetThreshold { index, threshold } => {
                self.condition_mut(index)?.threshold = threshold
            }
            DraftEdit::SetWindowDuration { index, minutes } => {
                self.condition_mut(index)?.window.duration_minutes = minutes
            }
            DraftEdit::SetAggregation { index, aggregation } => {
                self.condition_mut(index)?.window.aggregation = aggregation
            }

            DraftEdit::ToggleChannel(channel_id) => toggle(&mut self.channel_ids, channel_id),

            DraftEdit::ClearEscalation => self.escalation = Escalation::None,
            DraftEdit::UseInlineEscalation => {
                if !matches!(self.escalation, Escalation::Inline { .. }) {
                    self.escalation = Escalation::Inline {
                        steps: Vec::new(),
                        repeat: self.escalation.repeat(),
                    };
                }
            }
            DraftEdit::UsePolicy { policy_id, repeat } => {
                // Replaces the whole variant: inline steps are gone, not hidden.
                self.escalation = Escalation::PolicyRef { policy_id, repeat };
            }
            DraftEdit::AddStep { delay_minutes } => {
                self.inline_steps_mut()?.push(EscalationStep::new(delay_minutes))
            }
            DraftEdit::RemoveStep(index) => {
                let steps = self.inline_steps_mut()?;
                check_index("escalation.steps", index, steps.len())?;
                steps.remove(index);
            }
            DraftEdit::SetStepDelay {
                index,
                delay_minutes,
            } => {
                let steps = self.inline_steps_mut()?;
                check_index("escalation.steps", index, steps.len())?;
                steps[index].delay_minutes = delay_minutes;
            }
            DraftEdit::ToggleStepChannel { step, channel_id } => {
                let steps = self.inline_steps_mut()?;
                check_index("escalation.steps", step, steps.len())?;
                toggle(&mut steps[step].channel_ids, channel_id);
            }
            DraftEdit::SetRepeat(value) => match &mut self.escalation {
                Escalation::None => {
                    return Err(AppError::validation(
                        "DRAFT_NO_ESCALATION",
                        "Choose an escalation before setting repeat",
                    )
                    .with_field("escalation.repeat"))
                }
                Escalation::Inline { repeat, .. } | Escalation::PolicyRef { repeat, .. } => {
                    *repeat = value
                }
            },
        }
        Ok(())
    }

    fn condition_mut(&mut self, index: usize) -> Result<&mut Condition, AppError> {
        check_index("conditions", index, self.conditions.len())?;
        Ok(&mut self.conditions[index])
    }

    fn inline_steps_mut(&mut self) -> Result<&mut Vec<EscalationStep>, AppError> {
        match &mut self.escalation {
            Escalation::Inline { steps, .. } => Ok(steps),
            _ => Err(AppError::validation(
                "DRAFT_ESCALATION_NOT_INLINE",
                "Escalation steps can only be edited on an inline escalation",
            )
            .with_field("escalation.steps")),
        }
    }

    /// Move to `Submitting` and hand back the request to send.
    ///
    /// Returns `None` while the submit affordance is disabled: the draft is invalid or a
    /// submission is already in flight. A disabled submit is not an error.
    pub fn begin_submit(&mut self, policies: &[EscalationPolicy]) -> Option<SubmitRequest> {
        if !self.can_submit(policies) {
            tracing::debug!(phase = ?self.phase, "submit disabled");
            return None;
        }
        let request = compose(self, policies).ok()?;
        self.phase = DraftPhase::Submitting;
        self.last_error = None;
        tracing::info!(mode = self.mode.verb(), name = %self.name, "submitting alert rule");
        Some(request)
    }

    /// Fold the collaborator's answer into the draft.
    pub fn complete_submit(&mut self, result: Result<AlertRule, AppError>) -> SubmitOutcome {
        if self.phase != DraftPhase::Submitting {
            tracing::debug!(phase = ?self.phase, "completion without submission in flight");
            return SubmitOutcome::ignored();
        }

        let result = result.and_then(|rule| match &self.mode {
            DraftMode::Create => Ok(rule),
            DraftMode::Edit { original_rule_id } => {
                check_update_ack(original_rule_id, self.stamps.as_ref(), &rule)?;
                Ok(rule)
            }
        });

        match result {
            Ok(rule) => {
                let editing = matches!(self.mode, DraftMode::Edit { .. });
                let message = format!("Alert rule \"{}\" {}", rule.name, self.mode.verb());
                tracing::info!(rule_id = %rule.id, mode = self.mode.verb(), "alert rule saved");
                *self = RuleDraft::new();
                if editing {
                    self.phase = DraftPhase::Succeeded;
                }
                SubmitOutcome {
                    status: SubmitStatus::Succeeded,
                    notice: Some(Notice {
                        level: NoticeLevel::Success,
                        message,
                        field: None,
                    }),
                    rule: Some(rule),
                    refresh_rule_list: true,
                    return_to_list: editing,
                }
            }
            Err(e) => {
                tracing::warn!(code = %e.code, kind = e.kind.as_str(), "alert rule submission failed");
                let notice = Notice {
                    level: NoticeLevel::Error,
                    message: e.message.clone(),
                    field: e.field.clone(),
                };
                let terminal =
                    matches!(self.mode, DraftMode::Edit { .. }) && !e.kind.keeps_draft();
                if terminal {
                    // The edit target is gone server-side: drop the session.
                    *self = RuleDraft::new();
                }
                self.phase = DraftPhase::Failed;
                self.last_error = Some(e);
                SubmitOutcome {
                    status: SubmitStatus::Failed,
                    notice: Some(notice),
                    rule: None,
                    refresh_rule_list: terminal,
                    return_to_list: terminal,
                }
            }
        }
    }

    /// Discard the draft. No collaborator is involved.
    pub fn cancel(&mut self) {
        tracing::debug!(mode = self.mode.verb(), "draft cancelled");
        *self = RuleDraft::new();
    }
}

fn check_index(field: &str, index: usize, len: usize) -> Result<(), AppError> {
    if index >= len {
        return Err(AppError::validation(
            "DRAFT_INDEX_OUT_OF_RANGE",
            format!("No entry {index} in {field}"),
        )
        .with_field(field.to_string())
        .with_details(format!("index={index}; len={len}")));
    }
    Ok(())
}

fn toggle(set: &mut BTreeSet<ChannelId>, channel_id: ChannelId) {
    if !set.remove(&channel_id) {
        set.insert(channel_id);
    }
}
