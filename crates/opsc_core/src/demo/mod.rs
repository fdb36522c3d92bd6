use serde::Deserialize;

use crate::domain::{AlertRule, EscalationPolicy, NotificationChannel};
use crate::error::AppError;
use crate::health::MetricSample;

/// Reference data and rules served by the demo alerting backend.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DemoDataset {
    pub channels: Vec<NotificationChannel>,
    pub policies: Vec<EscalationPolicy>,
    pub rules: Vec<AlertRule>,
    pub metrics: Vec<MetricSample>,
}

fn demo_json() -> &'static str {
    // Wire-format fixture: parsing it exercises the same decoding path as API responses.
    r##"{
  "channels": [
    { "id": "channel-email", "name": "Ops mailbox", "type": "email", "target": "ops@example.com" },
    { "id": "channel-sms", "name": "On-call SMS", "type": "sms", "target": "+15550100" },
    { "id": "channel-slack", "name": "#ops-alerts", "type": "slack", "target": "https://hooks.example.com/ops" }
  ],
  "policies": [
    {
      "id": "policy-critical",
      "name": "Critical paging",
      "description": "Page on-call, then the whole team",
      "repeat": true,
      "steps": [
        { "delayMinutes": 0, "channelIds": ["channel-sms"] },
        { "delayMinutes": 15, "channelIds": ["channel-email", "channel-slack"] }
      ]
    },
    {
      "id": "policy-business-hours",
      "name": "Business hours",
      "description": "Mail first, chat after half an hour",
      "repeat": false,
      "steps": [
        { "delayMinutes": 0, "channelIds": ["channel-email"] },
        { "delayMinutes": 30, "channelIds": ["channel-slack"] }
      ]
    }
  ],
  "rules": [
    {
      "id": "rule-cpu-critical",
      "name": "CPU critique",
      "description": "Sustained CPU saturation",
      "severity": "critical",
      "enabled": true,
      "conditions": [
        { "metric": "cpu", "operator": "gt", "threshold": 85, "window": { "durationMinutes": 5, "aggregation": "avg" } }
      ],
      "channelIds": ["channel-email"],
      "escalation": {
        "steps": [ { "delayMinutes": 10, "channelIds": ["channel-sms"] } ],
        "repeat": false
      },
      "createdAt": "2026-01-05T09:00:00Z",
      "updatedAt": "2026-01-05T09:00:00Z"
    },
    {
      "id": "rule-memory-warning",
      "name": "Memory pressure",
      "description": "",
      "severity": "warning",
      "enabled": true,
      "conditions": [
        { "metric": "memory", "operator": "gte", "threshold": 80, "window": { "durationMinutes": 10, "aggregation": "max" } },
        { "metric": "disk", "operator": "gte", "threshold": 70, "window": { "durationMinutes": 10, "aggregation": "avg" } }
      ],
      "channelIds": ["channel-slack", "channel-email"],
      "escalation": { "policyId": "policy-business-hours", "repeat": true },
      "createdAt": "2026-01-06T10:30:00Z",
      "updatedAt": "2026-01-08T16:45:00Z"
    },
    {
      "id": "rule-latency-info",
      "name": "Latency drift",
      "description": "Informational only",
      "severity": "info",
      "enabled": false,
      "conditions": [
        { "metric": "latency", "operator": "gt", "threshold": 250.5, "window": { "durationMinutes": 15, "aggregation": "avg" } }
      ],
      "channelIds": ["channel-slack"],
      "escalation": null,
      "createdAt": "2026-01-07T08:00:00Z",
      "updatedAt": "2026-01-07T08:00:00Z"
    }
  ],
  "metrics": [
    { "metric": "cpu", "value": 84, "observedAt": "2026-01-10T12:00:00Z" },
    { "metric": "memory", "value": 91.5, "observedAt": "2026-01-10T12:00:00Z" },
    { "metric": "disk", "value": 42, "observedAt": "2026-01-10T12:00:00Z" }
  ]
}"##
}

pub fn demo_dataset() -> Result<DemoDataset, AppError> {
    serde_json::from_str(demo_json()).map_err(|e| {
        AppError::new("DEMO_FIXTURE_INVALID", "Failed to decode demo dataset")
            .with_details(e.to_string())
    })
}
