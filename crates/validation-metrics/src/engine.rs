use claim_core::ClaimError;
use serde::{Deserialize, Serialize};

/// Snapshot of classifier performance over one batch of outcomes.
///
/// All fields are in [0, 1] and derived purely from one
/// (predictions, actuals, confidences) triple of equal length.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub false_positive_rate: f64,
    pub false_negative_rate: f64,
    /// 1 - mean calibration error across non-empty confidence bins.
    pub confidence_calibration: f64,
}

/// Pass/fail bars applied to a metrics snapshot.
///
/// `min_confidence` and `min_model_agreement` are carried for callers
/// wiring the same config into the protection layer; the threshold gate
/// here only evaluates the five classification bars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub min_accuracy: f64,
    pub min_precision: f64,
    pub min_recall: f64,
    pub max_fpr: f64,
    pub max_fnr: f64,
    pub min_confidence: f64,
    pub min_model_agreement: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_accuracy: 0.80,
            min_precision: 0.75,
            min_recall: 0.75,
            max_fpr: 0.20,
            max_fnr: 0.20,
            min_confidence: 0.70,
            min_model_agreement: 0.60,
        }
    }
}

/// Confidence bucket edges for calibration scoring. The last bin is
/// closed so a confidence of exactly 1.0 is counted.
const CALIBRATION_BIN_EDGES: [f64; 4] = [0.5, 0.7, 0.8, 0.9];
const CALIBRATION_BIN_COUNT: usize = 5;

fn calibration_bin(confidence: f64) -> usize {
    CALIBRATION_BIN_EDGES
        .iter()
        .position(|edge| confidence < *edge)
        .unwrap_or(CALIBRATION_BIN_COUNT - 1)
}

/// Stateless metric computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsEngine;

impl MetricsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute classification metrics and a calibration score.
    ///
    /// Errors with `ClaimError::LengthMismatch` when the three sequences
    /// differ in length; this is the only raising path in the core.
    /// Empty (equal-length) inputs yield an all-zero snapshot.
    pub fn calculate_metrics(
        &self,
        predictions: &[bool],
        actuals: &[bool],
        confidences: &[f64],
    ) -> Result<ValidationMetrics, ClaimError> {
        if predictions.len() != actuals.len() || predictions.len() != confidences.len() {
            return Err(ClaimError::LengthMismatch {
                predictions: predictions.len(),
                actuals: actuals.len(),
                confidences: confidences.len(),
            });
        }

        let total = predictions.len();
        if total == 0 {
            return Ok(ValidationMetrics::default());
        }

        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut tn = 0usize;
        let mut fn_ = 0usize;
        for (predicted, actual) in predictions.iter().zip(actuals) {
            match (predicted, actual) {
                (true, true) => tp += 1,
                (true, false) => fp += 1,
                (false, false) => tn += 1,
                (false, true) => fn_ += 1,
            }
        }

        let accuracy = (tp + tn) as f64 / total as f64;
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        let false_positive_rate = ratio(fp, fp + tn);
        let false_negative_rate = ratio(fn_, fn_ + tp);

        let confidence_calibration =
            calibration_score(predictions, actuals, confidences);

        Ok(ValidationMetrics {
            accuracy,
            precision,
            recall,
            f1_score,
            false_positive_rate,
            false_negative_rate,
            confidence_calibration,
        })
    }

    /// AND of the five classification bars.
    pub fn meets_thresholds(&self, metrics: &ValidationMetrics, config: &ThresholdConfig) -> bool {
        metrics.accuracy >= config.min_accuracy
            && metrics.precision >= config.min_precision
            && metrics.recall >= config.min_recall
            && metrics.false_positive_rate <= config.max_fpr
            && metrics.false_negative_rate <= config.max_fnr
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Bin predictions by stated confidence, compare each bin's accuracy to
/// its mean confidence, and average the absolute gaps.
fn calibration_score(predictions: &[bool], actuals: &[bool], confidences: &[f64]) -> f64 {
    let mut bin_correct = [0usize; CALIBRATION_BIN_COUNT];
    let mut bin_total = [0usize; CALIBRATION_BIN_COUNT];
    let mut bin_confidence = [0.0f64; CALIBRATION_BIN_COUNT];

    for ((predicted, actual), confidence) in predictions.iter().zip(actuals).zip(confidences) {
        let bin = calibration_bin(*confidence);
        bin_total[bin] += 1;
        bin_confidence[bin] += confidence;
        if predicted == actual {
            bin_correct[bin] += 1;
        }
    }

    let mut gap_sum = 0.0;
    let mut populated = 0usize;
    for bin in 0..CALIBRATION_BIN_COUNT {
        if bin_total[bin] == 0 {
            continue;
        }
        let bin_accuracy = bin_correct[bin] as f64 / bin_total[bin] as f64;
        let mean_confidence = bin_confidence[bin] / bin_total[bin] as f64;
        gap_sum += (bin_accuracy - mean_confidence).abs();
        populated += 1;
    }

    if populated == 0 {
        return 0.0;
    }
    (1.0 - gap_sum / populated as f64).clamp(0.0, 1.0)
}
