use std::collections::VecDeque;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::ValidationMetrics;

/// Default degradation threshold when the caller has no opinion.
pub const DEFAULT_DEGRADATION_THRESHOLD: f64 = 0.05;
/// Default window for trend queries.
pub const DEFAULT_TREND_WINDOW: usize = 5;

/// One tracked snapshot, flattened so exports are a plain array of
/// primitive-field records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub recorded_at: DateTime<Utc>,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub false_positive_rate: f64,
    pub false_negative_rate: f64,
    pub confidence_calibration: f64,
}

impl MetricsRecord {
    fn from_metrics(metrics: &ValidationMetrics) -> Self {
        Self {
            recorded_at: Utc::now(),
            accuracy: metrics.accuracy,
            precision: metrics.precision,
            recall: metrics.recall,
            f1_score: metrics.f1_score,
            false_positive_rate: metrics.false_positive_rate,
            false_negative_rate: metrics.false_negative_rate,
            confidence_calibration: metrics.confidence_calibration,
        }
    }

    pub fn value(&self, field: MetricField) -> f64 {
        match field {
            MetricField::Accuracy => self.accuracy,
            MetricField::Precision => self.precision,
            MetricField::Recall => self.recall,
            MetricField::F1Score => self.f1_score,
            MetricField::FalsePositiveRate => self.false_positive_rate,
            MetricField::FalseNegativeRate => self.false_negative_rate,
            MetricField::ConfidenceCalibration => self.confidence_calibration,
        }
    }
}

/// Selects one metric for trend/degradation queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Accuracy,
    Precision,
    Recall,
    F1Score,
    FalsePositiveRate,
    FalseNegativeRate,
    ConfidenceCalibration,
}

/// Capacity-bounded ring buffer of metric snapshots.
///
/// Single-writer: the tracker is not internally synchronized. Share one
/// instance across threads behind an external mutex, or shard one
/// tracker per worker and merge exports periodically.
pub struct MetricsTracker {
    capacity: usize,
    history: VecDeque<MetricsRecord>,
}

impl MetricsTracker {
    /// A tracker holding at most `capacity` snapshots; the oldest is
    /// evicted once the capacity is reached. Capacity 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            history: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Append a snapshot, stamped with the current time.
    pub fn record(&mut self, metrics: &ValidationMetrics) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(MetricsRecord::from_metrics(metrics));
    }

    /// Full history, oldest first.
    pub fn records(&self) -> Vec<MetricsRecord> {
        self.history.iter().cloned().collect()
    }

    /// Last `window` values of one field, oldest first.
    pub fn get_trend(&self, field: MetricField, window: usize) -> Vec<f64> {
        let skip = self.history.len().saturating_sub(window);
        self.history
            .iter()
            .skip(skip)
            .map(|record| record.value(field))
            .collect()
    }

    /// Mean of the last `window` values; 0.0 with no history.
    pub fn get_average(&self, field: MetricField, window: usize) -> f64 {
        let values = self.get_trend(field, window);
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    /// Whether the field dropped by more than `threshold` between the
    /// older and newer halves of the last `window` values.
    pub fn is_degrading(&self, field: MetricField, threshold: f64, window: usize) -> bool {
        let values = self.get_trend(field, window);
        if values.len() < 2 {
            return false;
        }

        let mid = values.len() / 2;
        let older = &values[..mid];
        let newer = &values[mid..];
        let mean = |xs: &[f64]| xs.iter().sum::<f64>() / xs.len() as f64;

        mean(older) - mean(newer) > threshold
    }

    /// Write the full history as a JSON array of flat records.
    pub fn export_metrics(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("creating metrics export at {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.records())
            .with_context(|| format!("writing metrics export to {}", path.display()))?;

        tracing::debug!(
            snapshots = self.history.len(),
            path = %path.display(),
            "metrics history exported"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(accuracy: f64) -> ValidationMetrics {
        ValidationMetrics {
            accuracy,
            precision: accuracy,
            recall: accuracy,
            f1_score: accuracy,
            false_positive_rate: 1.0 - accuracy,
            false_negative_rate: 1.0 - accuracy,
            confidence_calibration: accuracy,
        }
    }

    #[test]
    fn ring_buffer_evicts_oldest_at_capacity() {
        let mut tracker = MetricsTracker::new(3);
        for accuracy in [0.1, 0.2, 0.3, 0.4] {
            tracker.record(&snapshot(accuracy));
        }

        assert_eq!(tracker.len(), 3);
        let trend = tracker.get_trend(MetricField::Accuracy, 10);
        assert_eq!(trend, vec![0.2, 0.3, 0.4]);
    }

    #[test]
    fn trend_returns_last_window_oldest_first() {
        let mut tracker = MetricsTracker::new(10);
        for accuracy in [0.5, 0.6, 0.7, 0.8] {
            tracker.record(&snapshot(accuracy));
        }

        assert_eq!(
            tracker.get_trend(MetricField::Accuracy, 2),
            vec![0.7, 0.8]
        );
        let average = tracker.get_average(MetricField::Accuracy, 2);
        assert!((average - 0.75).abs() < 1e-12);
    }

    #[test]
    fn average_of_empty_history_is_zero() {
        let tracker = MetricsTracker::new(5);
        assert_eq!(tracker.get_average(MetricField::F1Score, 5), 0.0);
        assert!(tracker.is_empty());
    }

    #[test]
    fn improving_trend_is_not_degrading() {
        let mut tracker = MetricsTracker::new(10);
        for accuracy in [0.5, 0.6, 0.7, 0.8, 0.9] {
            tracker.record(&snapshot(accuracy));
        }

        assert!(!tracker.is_degrading(
            MetricField::Accuracy,
            DEFAULT_DEGRADATION_THRESHOLD,
            DEFAULT_TREND_WINDOW
        ));
    }

    #[test]
    fn sharp_drop_is_degrading() {
        let mut tracker = MetricsTracker::new(10);
        for accuracy in [0.9, 0.9, 0.6, 0.55, 0.5] {
            tracker.record(&snapshot(accuracy));
        }

        assert!(tracker.is_degrading(
            MetricField::Accuracy,
            DEFAULT_DEGRADATION_THRESHOLD,
            DEFAULT_TREND_WINDOW
        ));
    }

    #[test]
    fn single_snapshot_cannot_degrade() {
        let mut tracker = MetricsTracker::new(10);
        tracker.record(&snapshot(0.2));
        assert!(!tracker.is_degrading(MetricField::Accuracy, 0.05, 5));
    }

    #[test]
    fn export_round_trips_every_field() {
        let mut tracker = MetricsTracker::new(10);
        for accuracy in [0.62, 0.71, 0.85] {
            tracker.record(&snapshot(accuracy));
        }

        let path = std::env::temp_dir().join("validation-metrics-export-test.json");
        tracker.export_metrics(&path).unwrap();

        let file = File::open(&path).unwrap();
        let reloaded: Vec<MetricsRecord> = serde_json::from_reader(file).unwrap();
        std::fs::remove_file(&path).ok();

        let original = tracker.records();
        assert_eq!(reloaded.len(), original.len());
        for (a, b) in original.iter().zip(&reloaded) {
            for field in [
                MetricField::Accuracy,
                MetricField::Precision,
                MetricField::Recall,
                MetricField::F1Score,
                MetricField::FalsePositiveRate,
                MetricField::FalseNegativeRate,
                MetricField::ConfidenceCalibration,
            ] {
                assert!((a.value(field) - b.value(field)).abs() < 1e-12);
            }
        }
    }
}
