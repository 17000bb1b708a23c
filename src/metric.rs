//! Closed set of comparison metrics with typed accessors
//!
//! Metric names arriving from configuration or the command line are parsed
//! into [`ComparisonMetric`] at the boundary; unknown names are rejected
//! there instead of silently yielding missing data further down.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors for metric name parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricError {
    #[error("Unknown metric '{name}' (expected one of: {expected})")]
    UnknownMetric { name: String, expected: String },
}

/// Performance metric an algorithm comparison is run on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMetric {
    /// Cumulative episode reward
    TotalReward,
    /// Fraction of successful episodes (0-1)
    SuccessRate,
    /// Mean decision time in milliseconds
    DecisionTime,
    /// Fraction of successful handovers (0-1)
    HandoverSuccessRate,
    /// Mean handover latency in milliseconds
    AverageLatency,
    /// Mean policy confidence (0-1)
    ConfidenceLevel,
    /// Performance stability score, 1 / (1 + std of rewards)
    Stability,
}

impl ComparisonMetric {
    pub const ALL: [ComparisonMetric; 7] = [
        ComparisonMetric::TotalReward,
        ComparisonMetric::SuccessRate,
        ComparisonMetric::DecisionTime,
        ComparisonMetric::HandoverSuccessRate,
        ComparisonMetric::AverageLatency,
        ComparisonMetric::ConfidenceLevel,
        ComparisonMetric::Stability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonMetric::TotalReward => "total_reward",
            ComparisonMetric::SuccessRate => "success_rate",
            ComparisonMetric::DecisionTime => "decision_time",
            ComparisonMetric::HandoverSuccessRate => "handover_success_rate",
            ComparisonMetric::AverageLatency => "average_latency",
            ComparisonMetric::ConfidenceLevel => "confidence_level",
            ComparisonMetric::Stability => "stability",
        }
    }

    /// Whether larger values indicate a better algorithm
    pub fn higher_is_better(&self) -> bool {
        !matches!(
            self,
            ComparisonMetric::DecisionTime | ComparisonMetric::AverageLatency
        )
    }

    /// Read this metric from one episode record
    pub fn extract(&self, record: &EpisodeRecord) -> Option<f64> {
        match self {
            ComparisonMetric::TotalReward => record.total_reward,
            ComparisonMetric::SuccessRate => record.success_rate,
            ComparisonMetric::DecisionTime => record.decision_time_ms,
            ComparisonMetric::HandoverSuccessRate => record.handover_success_rate,
            ComparisonMetric::AverageLatency => record.average_latency_ms,
            ComparisonMetric::ConfidenceLevel => record.confidence_level,
            ComparisonMetric::Stability => record.stability,
        }
    }
}

impl fmt::Display for ComparisonMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonMetric {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComparisonMetric::ALL
            .iter()
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| MetricError::UnknownMetric {
                name: s.to_string(),
                expected: ComparisonMetric::ALL
                    .iter()
                    .map(ComparisonMetric::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Measurements from one evaluation episode of an algorithm
///
/// Every field is optional so a run may record only the metrics it
/// tracked; unknown keys are rejected on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EpisodeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_reward: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_time_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handover_success_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_latency_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
}

impl EpisodeRecord {
    /// Record carrying a single metric value
    pub fn with_metric(metric: ComparisonMetric, value: f64) -> Self {
        let mut record = EpisodeRecord::default();
        let slot = match metric {
            ComparisonMetric::TotalReward => &mut record.total_reward,
            ComparisonMetric::SuccessRate => &mut record.success_rate,
            ComparisonMetric::DecisionTime => &mut record.decision_time_ms,
            ComparisonMetric::HandoverSuccessRate => &mut record.handover_success_rate,
            ComparisonMetric::AverageLatency => &mut record.average_latency_ms,
            ComparisonMetric::ConfidenceLevel => &mut record.confidence_level,
            ComparisonMetric::Stability => &mut record.stability,
        };
        *slot = Some(value);
        record
    }
}
