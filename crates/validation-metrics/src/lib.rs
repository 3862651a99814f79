//! Validation Metrics Module
//!
//! Scores historical prediction accuracy and confidence calibration, and
//! tracks metric snapshots over time to detect degradation.

pub mod engine;
pub mod tracker;

pub use engine::{MetricsEngine, ThresholdConfig, ValidationMetrics};
pub use tracker::{
    MetricField, MetricsRecord, MetricsTracker, DEFAULT_DEGRADATION_THRESHOLD,
    DEFAULT_TREND_WINDOW,
};
