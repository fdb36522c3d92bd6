use opsc_core::demo::demo_dataset;
use opsc_core::domain::{
    AggregationKind, Comparator, Condition, Escalation, EscalationKind, MetricType,
};
use opsc_core::draft::{DraftEdit, DraftMode, DraftPhase, RuleDraft};

fn valid_create_draft() -> RuleDraft {
    let mut draft = RuleDraft::new();
    draft.apply(DraftEdit::SetName("Disk full".to_string())).unwrap();
    draft
        .apply(DraftEdit::AddCondition(Condition::new(
            MetricType::Disk,
            Comparator::Gte,
            95.0,
        )))
        .unwrap();
    draft
        .apply(DraftEdit::ToggleChannel("channel-email".to_string()))
        .unwrap();
    draft
}

#[test]
fn new_draft_is_empty_and_cannot_submit() {
    let draft = RuleDraft::new();
    assert_eq!(draft.phase(), DraftPhase::Empty);
    assert_eq!(draft.mode(), &DraftMode::Create);
    assert!(!draft.can_submit(&[]));
    assert!(!draft.has_changes());
}

#[test]
fn first_edit_moves_to_editing() {
    let mut draft = RuleDraft::new();
    draft.apply(DraftEdit::SetEnabled(false)).unwrap();
    assert_eq!(draft.phase(), DraftPhase::Editing);
    assert!(draft.has_changes());
}

#[test]
fn missing_name_conditions_or_channels_disable_submit() {
    let full = valid_create_draft();
    assert!(full.can_submit(&[]));

    let mut no_name = full.clone();
    no_name.apply(DraftEdit::SetName(String::new())).unwrap();
    assert!(!no_name.is_valid(&[]));
    assert!(!no_name.can_submit(&[]));

    let mut no_conditions = full.clone();
    no_conditions.apply(DraftEdit::RemoveCondition(0)).unwrap();
    assert!(!no_conditions.can_submit(&[]));

    let mut no_channels = full.clone();
    no_channels
        .apply(DraftEdit::ToggleChannel("channel-email".to_string()))
        .unwrap();
    assert!(no_channels.channel_ids().is_empty());
    assert!(!no_channels.can_submit(&[]));
}

#[test]
fn condition_edits_reach_the_indexed_condition() {
    let mut draft = valid_create_draft();
    draft
        .apply(DraftEdit::AddCondition(Condition::new(
            MetricType::Cpu,
            Comparator::Gt,
            50.0,
        )))
        .unwrap();
    draft
        .apply(DraftEdit::SetThreshold {
            index: 1,
            threshold: 75.5,
        })
        .unwrap();
    draft
        .apply(DraftEdit::SetWindowDuration {
            index: 1,
            minutes: 15,
        })
        .unwrap();
    draft
        .apply(DraftEdit::SetAggregation {
            index: 1,
            aggregation: AggregationKind::Max,
        })
        .unwrap();
    draft
        .apply(DraftEdit::SetOperator {
            index: 1,
            operator: Comparator::Lte,
        })
        .unwrap();
    draft
        .apply(DraftEdit::SetMetric {
            index: 1,
            metric: MetricType::Latency,
        })
        .unwrap();

    assert_eq!(draft.conditions()[0].threshold, 95.0);
    assert_eq!(
        draft.conditions()[1],
        Condition::new(MetricType::Latency, Comparator::Lte, 75.5)
            .with_window(15, AggregationKind::Max)
    );
}

#[test]
fn invalid_threshold_or_window_blocks_submit() {
    let mut draft = valid_create_draft();
    draft
        .apply(DraftEdit::SetThreshold {
            index: 0,
            threshold: f64::INFINITY,
        })
        .unwrap();
    assert!(!draft.can_submit(&[]));

    draft
        .apply(DraftEdit::SetThreshold {
            index: 0,
            threshold: 90.0,
        })
        .unwrap();
    draft
        .apply(DraftEdit::SetWindowDuration { index: 0, minutes: 0 })
        .unwrap();
    let issues = draft.issues(&[]);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].field, "conditions[0].window.durationMinutes");
}

#[test]
fn out_of_range_edit_is_rejected_without_side_effects() {
    let mut draft = RuleDraft::new();
    let err = draft
        .apply(DraftEdit::SetThreshold {
            index: 3,
            threshold: 1.0,
        })
        .unwrap_err();
    assert_eq!(err.code, "DRAFT_INDEX_OUT_OF_RANGE");
    assert_eq!(err.field.as_deref(), Some("conditions"));
    assert_eq!(draft.phase(), DraftPhase::Empty);
}

#[test]
fn channel_toggle_is_an_idempotent_membership_flip() {
    let mut draft = RuleDraft::new();
    let toggle = DraftEdit::ToggleChannel("channel-sms".to_string());
    draft.apply(toggle.clone()).unwrap();
    assert!(draft.channel_ids().contains("channel-sms"));
    draft.apply(toggle.clone()).unwrap();
    assert!(draft.channel_ids().is_empty());
    draft.apply(toggle).unwrap();
    assert_eq!(draft.channel_ids().len(), 1);
}

#[test]
fn rule_and_step_channel_sets_are_independent() {
    let mut draft = valid_create_draft();
    draft.apply(DraftEdit::UseInlineEscalation).unwrap();
    draft.apply(DraftEdit::AddStep { delay_minutes: 0 }).unwrap();
    draft.apply(DraftEdit::AddStep { delay_minutes: 10 }).unwrap();
    draft
        .apply(DraftEdit::ToggleStepChannel {
            step: 0,
            channel_id: "channel-sms".to_string(),
        })
        .unwrap();
    draft
        .apply(DraftEdit::ToggleStepChannel {
            step: 1,
            channel_id: "channel-email".to_string(),
        })
        .unwrap();
    // Toggling the rule-level email channel off must not touch step 1.
    draft
        .apply(DraftEdit::ToggleChannel("channel-email".to_string()))
        .unwrap();

    assert!(draft.channel_ids().is_empty());
    let Escalation::Inline { steps, .. } = draft.escalation() else {
        panic!("expected inline escalation");
    };
    assert_eq!(
        steps[0].channel_ids.iter().collect::<Vec<_>>(),
        vec!["channel-sms"]
    );
    assert_eq!(
        steps[1].channel_ids.iter().collect::<Vec<_>>(),
        vec!["channel-email"]
    );
}

#[test]
fn step_order_is_kept_as_entered() {
    let mut draft = RuleDraft::new();
    draft.apply(DraftEdit::UseInlineEscalation).unwrap();
    for delay in [30, 0, 15] {
        draft
            .apply(DraftEdit::AddStep {
                delay_minutes: delay,
            })
            .unwrap();
    }
    draft
        .apply(DraftEdit::SetStepDelay {
            index: 1,
            delay_minutes: 45,
        })
        .unwrap();
    let Escalation::Inline { steps, .. } = draft.escalation() else {
        panic!("expected inline escalation");
    };
    let delays: Vec<u32> = steps.iter().map(|s| s.delay_minutes).collect();
    assert_eq!(delays, vec![30, 45, 15]);
}

#[test]
fn step_edits_require_inline_escalation() {
    let mut draft = RuleDraft::new();
    let err = draft
        .apply(DraftEdit::AddStep { delay_minutes: 5 })
        .unwrap_err();
    assert_eq!(err.code, "DRAFT_ESCALATION_NOT_INLINE");

    draft
        .apply(DraftEdit::UsePolicy {
            policy_id: "policy-critical".to_string(),
            repeat: false,
        })
        .unwrap();
    assert!(draft.apply(DraftEdit::RemoveStep(0)).is_err());
    assert_eq!(draft.escalation().kind(), EscalationKind::PolicyRef);
}

#[test]
fn selecting_a_policy_drops_inline_steps() {
    let mut draft = valid_create_draft();
    draft.apply(DraftEdit::UseInlineEscalation).unwrap();
    draft.apply(DraftEdit::AddStep { delay_minutes: 10 }).unwrap();
    draft
        .apply(DraftEdit::ToggleStepChannel {
            step: 0,
            channel_id: "channel-sms".to_string(),
        })
        .unwrap();

    draft
        .apply(DraftEdit::UsePolicy {
            policy_id: "policy-critical".to_string(),
            repeat: true,
        })
        .unwrap();
    assert_eq!(
        draft.escalation(),
        &Escalation::PolicyRef {
            policy_id: "policy-critical".to_string(),
            repeat: true
        }
    );

    // Going back to inline starts from scratch: the old step did not survive in hiding.
    draft.apply(DraftEdit::UseInlineEscalation).unwrap();
    assert_eq!(
        draft.escalation(),
        &Escalation::Inline {
            steps: vec![],
            repeat: true
        }
    );
}

#[test]
fn repeat_needs_an_escalation() {
    let mut draft = RuleDraft::new();
    assert!(draft.apply(DraftEdit::SetRepeat(true)).is_err());
    draft.apply(DraftEdit::UseInlineEscalation).unwrap();
    draft.apply(DraftEdit::SetRepeat(true)).unwrap();
    assert!(draft.escalation().repeat());
    draft.apply(DraftEdit::ClearEscalation).unwrap();
    assert!(draft.escalation().is_none());
}

#[test]
fn edit_draft_is_hydrated_and_immediately_submittable() {
    let demo = demo_dataset().unwrap();
    let rule = &demo.rules[0];
    let draft = RuleDraft::for_edit(rule);

    assert_eq!(draft.phase(), DraftPhase::Editing);
    assert_eq!(
        draft.mode(),
        &DraftMode::Edit {
            original_rule_id: "rule-cpu-critical".to_string()
        }
    );
    assert_eq!(draft.to_input(), rule.to_input());
    assert!(!draft.has_changes());
    assert!(draft.can_submit(&demo.policies));
}

#[test]
fn reverting_an_edit_clears_has_changes() {
    let demo = demo_dataset().unwrap();
    let mut draft = RuleDraft::for_edit(&demo.rules[0]);
    draft
        .apply(DraftEdit::SetThreshold {
            index: 0,
            threshold: 90.0,
        })
        .unwrap();
    assert!(draft.has_changes());
    draft
        .apply(DraftEdit::SetThreshold {
            index: 0,
            threshold: 85.0,
        })
        .unwrap();
    assert!(!draft.has_changes());
}

#[test]
fn cancel_discards_everything() {
    let demo = demo_dataset().unwrap();
    let mut draft = RuleDraft::for_edit(&demo.rules[0]);
    draft.apply(DraftEdit::SetName("changed".to_string())).unwrap();
    draft.cancel();
    assert_eq!(draft, RuleDraft::new());
}
