use pretty_assertions::assert_eq;

use opsc_core::compose::{compose, SubmitMode};
use opsc_core::demo::demo_dataset;
use opsc_core::domain::{AlertRule, ChannelType, Escalation, NotificationChannel, RuleInput};
use opsc_core::draft::{DraftEdit, RuleDraft};
use opsc_core::screen::RuleScreen;

fn server_echo(id: &str, payload: &RuleInput) -> AlertRule {
    // What a conforming server hands back: the payload plus server-owned fields.
    let mut json = serde_json::to_value(payload).unwrap();
    let obj = json.as_object_mut().unwrap();
    obj.insert("id".to_string(), serde_json::json!(id));
    obj.insert("createdAt".to_string(), serde_json::json!("2026-03-01T00:00:00Z"));
    obj.insert("updatedAt".to_string(), serde_json::json!("2026-03-01T00:00:00Z"));
    serde_json::from_value(json).unwrap()
}

#[test]
fn every_demo_rule_survives_compose_and_rehydrate() {
    let demo = demo_dataset().unwrap();
    for rule in &demo.rules {
        let draft = RuleDraft::for_edit(rule);
        let request = compose(&draft, &demo.policies).expect("valid demo rule");
        assert_eq!(
            request.mode,
            SubmitMode::Update {
                rule_id: rule.id.clone()
            }
        );

        let stored = server_echo(&rule.id, &request.payload);
        let rehydrated = RuleDraft::for_edit(&stored);
        assert_eq!(rehydrated.conditions(), rule.conditions.as_slice());
        assert_eq!(rehydrated.channel_ids(), &rule.channel_ids);
        assert_eq!(rehydrated.escalation(), &rule.escalation);
        assert_eq!(rehydrated.escalation().kind(), rule.escalation.kind());
    }
}

#[test]
fn composing_does_not_mutate_the_draft() {
    let demo = demo_dataset().unwrap();
    let mut draft = RuleDraft::for_edit(&demo.rules[1]);
    draft
        .apply(DraftEdit::SetDescription("tuned".to_string()))
        .unwrap();
    let before = draft.clone();
    let _ = compose(&draft, &demo.policies).unwrap();
    assert_eq!(draft, before);
}

#[test]
fn composing_an_invalid_draft_reports_the_first_issue() {
    let draft = RuleDraft::new();
    let err = compose(&draft, &[]).unwrap_err();
    assert_eq!(err.code, "VALIDATION_NAME_REQUIRED");
    assert_eq!(err.field.as_deref(), Some("name"));
}

#[test]
fn null_escalation_round_trips_as_none() {
    let demo = demo_dataset().unwrap();
    let rule = demo
        .rules
        .iter()
        .find(|r| r.id == "rule-latency-info")
        .unwrap();
    assert_eq!(rule.escalation, Escalation::None);

    let json = serde_json::to_value(rule.to_input()).unwrap();
    assert!(json["escalation"].is_null());
}

#[test]
fn missing_escalation_field_reads_as_none() {
    let rule: AlertRule = serde_json::from_str(
        r#"{
          "id": "r1", "name": "n", "severity": "info", "enabled": true,
          "conditions": [{ "metric": "cpu", "operator": "gt", "threshold": 1,
                           "window": { "durationMinutes": 1, "aggregation": "avg" } }],
          "channelIds": ["c"],
          "createdAt": "2026-01-01T00:00:00Z", "updatedAt": "2026-01-01T00:00:00Z"
        }"#,
    )
    .unwrap();
    assert_eq!(rule.escalation, Escalation::None);
    assert_eq!(rule.description, "");
}

#[test]
fn fingerprint_tracks_payload_content() {
    let demo = demo_dataset().unwrap();
    let a = demo.rules[0].to_input();
    let mut b = a.clone();
    assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    b.enabled = !b.enabled;
    assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    assert_eq!(a.fingerprint().unwrap().len(), 64);
}

#[test]
fn unknown_channel_type_does_not_reject_the_channel_list() {
    let channels: Vec<NotificationChannel> = serde_json::from_str(
        r#"[
          { "id": "channel-email", "name": "Ops mailbox", "type": "email", "target": "ops@example.com" },
          { "id": "channel-pager", "name": "Pager", "type": "pagerduty", "target": "svc-42" }
        ]"#,
    )
    .unwrap();
    assert_eq!(channels[0].channel_type, ChannelType::Email);
    assert_eq!(channels[1].channel_type, ChannelType::Other);

    // The new channel can still be picked for a rule.
    let mut screen = RuleScreen::new();
    let ticket = screen.begin_channels_refresh();
    screen.complete_channels_refresh(ticket, Ok(channels));
    assert_eq!(screen.channels().len(), 2);
    screen.open_create();
    screen
        .edit(DraftEdit::ToggleChannel("channel-pager".to_string()))
        .unwrap();
    assert!(screen.draft().channel_ids().contains("channel-pager"));
}
