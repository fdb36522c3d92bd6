use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{AlertRule, EscalationPolicy, RuleInput};
use crate::draft::{DraftMode, RuleDraft};
use crate::error::AppError;
use crate::service::AlertingService;
use crate::validate::validate_rule_input;

/// Server timestamps of the rule an edit draft was opened from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleStamps {
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum SubmitMode {
    Create,
    Update { rule_id: String },
}

/// A validated payload together with the call it must go through.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub mode: SubmitMode,
    pub payload: RuleInput,
}

impl SubmitRequest {
    /// Create mode calls `create_rule`; edit mode calls `update_rule` with the original id.
    pub fn send(&self, service: &dyn AlertingService) -> Result<AlertRule, AppError> {
        match &self.mode {
            SubmitMode::Create => service.create_rule(&self.payload),
            SubmitMode::Update { rule_id } => service.update_rule(rule_id, &self.payload),
        }
    }
}

/// Project a draft into its create/update request.
///
/// Pure: the draft is only read. The first validation issue is returned as the error, so a
/// dangling policy reference comes back as a referential error with its field set.
pub fn compose(draft: &RuleDraft, policies: &[EscalationPolicy]) -> Result<SubmitRequest, AppError> {
    let payload = draft.to_input();
    if let Some(issue) = validate_rule_input(&payload, policies).into_iter().next() {
        return Err(issue.to_error());
    }

    let mode = match draft.mode() {
        DraftMode::Create => SubmitMode::Create,
        DraftMode::Edit { original_rule_id } => SubmitMode::Update {
            rule_id: original_rule_id.clone(),
        },
    };
    Ok(SubmitRequest { mode, payload })
}

/// Check the record returned by an update against the rule that was edited.
///
/// A different id is an error. Timestamp oddities (changed `createdAt`, `updatedAt` not moving
/// forward) are logged but accepted since the server owns those values.
pub fn check_update_ack(
    expected_id: &str,
    original: Option<&RuleStamps>,
    returned: &AlertRule,
) -> Result<(), AppError> {
    if returned.id != expected_id {
        return Err(AppError::new(
            "UPDATE_ACK_ID_MISMATCH",
            "The server answered the update with a different rule",
        )
        .with_details(format!("expected={expected_id}; got={}", returned.id)));
    }

    let Some(original) = original else {
        return Ok(());
    };
    if returned.created_at != original.created_at {
        tracing::warn!(
            rule_id = %returned.id,
            before = %original.created_at,
            after = %returned.created_at,
            "update changed createdAt"
        );
    }
    match (
        OffsetDateTime::parse(&original.updated_at, &Rfc3339),
        OffsetDateTime::parse(&returned.updated_at, &Rfc3339),
    ) {
        (Ok(before), Ok(after)) if after <= before => {
            tracing::warn!(rule_id = %returned.id, "update did not advance updatedAt");
        }
        (Ok(_), Ok(_)) => {}
        _ => {
            tracing::warn!(
                rule_id = %returned.id,
                updated_at = %returned.updated_at,
                "unparseable updatedAt on update acknowledgement"
            );
        }
    }
    Ok(())
}
