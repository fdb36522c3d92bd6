use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ChannelId;

/// One escalation stage: after `delay_minutes`, notify every channel in `channel_ids`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EscalationStep {
    pub delay_minutes: u32,
    pub channel_ids: BTreeSet<ChannelId>,
}

impl EscalationStep {
    pub fn new(delay_minutes: u32) -> Self {
        Self {
            delay_minutes,
            channel_ids: BTreeSet::new(),
        }
    }

    pub fn with_channel(mut self, channel_id: impl Into<ChannelId>) -> Self {
        self.channel_ids.insert(channel_id.into());
        self
    }
}

/// Named, reusable escalation owned by the server. Read-only for the console.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EscalationPolicy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub repeat: bool,
    pub steps: Vec<EscalationStep>,
}

/// Escalation attached to a rule. Exactly one strategy is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<EscalationWire>", into = "Option<EscalationWire>")]
pub enum Escalation {
    #[default]
    None,
    /// Steps authored directly on the rule; order is trigger order.
    Inline {
        steps: Vec<EscalationStep>,
        repeat: bool,
    },
    /// Reference to a named policy. `repeat` overrides the policy's own flag for this rule.
    PolicyRef { policy_id: String, repeat: bool },
}

impl Escalation {
    pub fn kind(&self) -> EscalationKind {
        match self {
            Escalation::None => EscalationKind::None,
            Escalation::Inline { .. } => EscalationKind::Inline,
            Escalation::PolicyRef { .. } => EscalationKind::PolicyRef,
        }
    }

    pub fn repeat(&self) -> bool {
        match self {
            Escalation::None => false,
            Escalation::Inline { repeat, .. } | Escalation::PolicyRef { repeat, .. } => *repeat,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Escalation::None)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EscalationKind {
    None,
    Inline,
    PolicyRef,
}

/// Wire shape: `null`, `{ steps, repeat }` or `{ policyId, repeat }`.
///
/// The policy variant is tried first so a payload carrying `policyId` is never read as inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
#[doc(hidden)]
pub enum EscalationWire {
    #[serde(rename_all = "camelCase")]
    PolicyRef { policy_id: String, repeat: bool },
    Inline {
        steps: Vec<EscalationStep>,
        repeat: bool,
    },
}

impl From<Option<EscalationWire>> for Escalation {
    fn from(wire: Option<EscalationWire>) -> Self {
        match wire {
            None => Escalation::None,
            Some(EscalationWire::Inline { steps, repeat }) => Escalation::Inline { steps, repeat },
            Some(EscalationWire::PolicyRef { policy_id, repeat }) => {
                Escalation::PolicyRef { policy_id, repeat }
            }
        }
    }
}

impl From<Escalation> for Option<EscalationWire> {
    fn from(escalation: Escalation) -> Self {
        match escalation {
            Escalation::None => None,
            Escalation::Inline { steps, repeat } => Some(EscalationWire::Inline { steps, repeat }),
            Escalation::PolicyRef { policy_id, repeat } => {
                Some(EscalationWire::PolicyRef { policy_id, repeat })
            }
        }
    }
}
