use serde::{Deserialize, Serialize};

/// Metrics a rule condition can watch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Cpu,
    Memory,
    Disk,
    Network,
    Latency,
    ErrorRate,
}

impl MetricType {
    pub const ALL: [MetricType; 6] = [
        MetricType::Cpu,
        MetricType::Memory,
        MetricType::Disk,
        MetricType::Network,
        MetricType::Latency,
        MetricType::ErrorRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Cpu => "cpu",
            MetricType::Memory => "memory",
            MetricType::Disk => "disk",
            MetricType::Network => "network",
            MetricType::Latency => "latency",
            MetricType::ErrorRate => "error_rate",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }

    /// Human label used on health cards.
    pub fn label(&self) -> &'static str {
        match self {
            MetricType::Cpu => "CPU",
            MetricType::Memory => "Memory",
            MetricType::Disk => "Disk",
            MetricType::Network => "Network",
            MetricType::Latency => "Latency",
            MetricType::ErrorRate => "Error rate",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Gt => "gt",
            Comparator::Gte => "gte",
            Comparator::Lt => "lt",
            Comparator::Lte => "lte",
            Comparator::Eq => "eq",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Eq => "==",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    Avg,
    Min,
    Max,
    Sum,
    Count,
}

impl AggregationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationKind::Avg => "avg",
            AggregationKind::Min => "min",
            AggregationKind::Max => "max",
            AggregationKind::Sum => "sum",
            AggregationKind::Count => "count",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionWindow {
    pub duration_minutes: u32,
    pub aggregation: AggregationKind,
}

/// One threshold rule over one metric. A rule fires only when all of its conditions hold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub metric: MetricType,
    pub operator: Comparator,
    pub threshold: f64,
    pub window: ConditionWindow,
}

impl Condition {
    pub fn new(metric: MetricType, operator: Comparator, threshold: f64) -> Self {
        Self {
            metric,
            operator,
            threshold,
            window: ConditionWindow {
                duration_minutes: 5,
                aggregation: AggregationKind::Avg,
            },
        }
    }

    pub fn with_window(mut self, duration_minutes: u32, aggregation: AggregationKind) -> Self {
        self.window = ConditionWindow {
            duration_minutes,
            aggregation,
        };
        self
    }

    /// Compact text such as `avg(cpu) > 85 over 5m`, used in list rows and logs.
    pub fn summary(&self) -> String {
        format!(
            "{}({}) {} {} over {}m",
            self.window.aggregation.as_str(),
            self.metric.as_str(),
            self.operator.symbol(),
            self.threshold,
            self.window.duration_minutes
        )
    }
}
