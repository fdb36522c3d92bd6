use serde::{Deserialize, Serialize};

use crate::domain::MetricType;
use crate::error::AppError;
use crate::sequence::{Completion, Latest, RequestTicket};
use crate::service::MonitoringService;
use crate::severity::{HealthThresholds, SeverityTier};

/// One live reading from the monitoring feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub metric: MetricType,
    pub value: f64,
    pub observed_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Indicator {
    pub metric: MetricType,
    pub thresholds: HealthThresholds,
}

/// Render-ready card. `value`/`tier` are `None` until a reading for the metric arrives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthCard {
    pub metric: MetricType,
    pub label: String,
    pub value: Option<f64>,
    pub tier: Option<SeverityTier>,
    pub color: String,
    pub alert: bool,
}

/// Monitoring screen state: configured indicators plus the latest readings.
#[derive(Debug)]
pub struct HealthBoard {
    indicators: Vec<Indicator>,
    samples: Latest<Vec<MetricSample>>,
}

impl HealthBoard {
    pub fn new(indicators: Vec<Indicator>) -> Result<Self, AppError> {
        for ind in &indicators {
            if let Some(issue) = ind.thresholds.validate().into_iter().next() {
                return Err(issue
                    .to_error()
                    .with_details(format!("metric={}", ind.metric.as_str())));
            }
        }
        Ok(Self {
            indicators,
            samples: Latest::new(),
        })
    }

    pub fn begin_refresh(&mut self) -> RequestTicket {
        self.samples.begin()
    }

    pub fn complete_refresh(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<MetricSample>, AppError>,
    ) -> Completion {
        self.samples.complete(ticket, result)
    }

    /// Issue and complete one fetch in place.
    pub fn refresh(&mut self, service: &dyn MonitoringService) -> Completion {
        let ticket = self.begin_refresh();
        let result = service.current_metrics();
        self.complete_refresh(ticket, result)
    }

    pub fn error(&self) -> Option<&AppError> {
        self.samples.error()
    }

    pub fn cards(&self) -> Vec<HealthCard> {
        let samples = self.samples.value().map(Vec::as_slice).unwrap_or(&[]);
        self.indicators
            .iter()
            .map(|ind| {
                // Feed order is arrival order; the last reading for a metric is the freshest.
                let value = samples
                    .iter()
                    .rev()
                    .find(|s| s.metric == ind.metric)
                    .map(|s| s.value);
                let tier = value.map(|v| ind.thresholds.classify(v));
                HealthCard {
                    metric: ind.metric,
                    label: ind.metric.label().to_string(),
                    value,
                    tier,
                    color: tier.map(|t| t.color()).unwrap_or("grey").to_string(),
                    alert: tier.map(|t| t.raises_alert()).unwrap_or(false),
                }
            })
            .collect()
    }
}
