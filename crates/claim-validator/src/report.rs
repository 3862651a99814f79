use chrono::{DateTime, Utc};
use claim_core::Severity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::SeverityThresholds;

/// The three validation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationType {
    Mathematical,
    Logical,
    Critical,
}

impl ValidationType {
    pub const ALL: [ValidationType; 3] = [
        ValidationType::Mathematical,
        ValidationType::Logical,
        ValidationType::Critical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ValidationType::Mathematical => "mathematical",
            ValidationType::Logical => "logical",
            ValidationType::Critical => "critical",
        }
    }
}

/// Result of one validation layer for one claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub validation_type: ValidationType,
    pub passed: bool,
    /// Always in [0, 1].
    pub confidence: f64,
    /// Derived solely from confidence and validation type.
    pub severity: Severity,
    pub message: String,
    /// Opaque per-check evidence.
    pub details: Map<String, Value>,
    /// Which verifier produced this outcome (heuristic or model-backed).
    pub model_used: String,
}

/// Map an outcome's confidence to a severity band.
///
/// Critical-type checks get stricter bands; for any type, lower
/// confidence never yields a milder severity.
pub fn severity_for(
    validation_type: ValidationType,
    confidence: f64,
    thresholds: &SeverityThresholds,
) -> Severity {
    if validation_type == ValidationType::Critical {
        if confidence < thresholds.critical_type_critical_below {
            return Severity::Critical;
        }
        if confidence < thresholds.critical_type_high_below {
            return Severity::High;
        }
    }

    if confidence < thresholds.high_below {
        Severity::High
    } else if confidence < thresholds.medium_below {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Aggregate of 1-3 validation outcomes for one claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub claim: String,
    pub outcomes: Vec<ValidationOutcome>,
    /// AND of the outcomes' `passed` flags.
    pub overall_passed: bool,
    /// Arithmetic mean of outcome confidences, 0.0 when no outcomes ran.
    pub confidence_score: f64,
    /// Worst severity across outcomes.
    pub risk_level: Severity,
    /// Never empty: remediation per failing check, or a proceed note.
    pub recommendations: Vec<String>,
    pub validated_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn from_outcomes(claim: &str, outcomes: Vec<ValidationOutcome>) -> Self {
        let overall_passed = outcomes.iter().all(|o| o.passed);

        let confidence_score = if outcomes.is_empty() {
            0.0
        } else {
            outcomes.iter().map(|o| o.confidence).sum::<f64>() / outcomes.len() as f64
        };

        let risk_level = outcomes
            .iter()
            .map(|o| o.severity)
            .max()
            .unwrap_or(Severity::Low);

        let mut recommendations: Vec<String> = outcomes
            .iter()
            .filter(|o| !o.passed)
            .map(|o| remediation_for(o.validation_type).to_string())
            .collect();
        if recommendations.is_empty() {
            recommendations
                .push("All requested checks passed; proceed with confidence".to_string());
        }

        Self {
            claim: claim.to_string(),
            outcomes,
            overall_passed,
            confidence_score,
            risk_level,
            recommendations,
            validated_at: Utc::now(),
        }
    }
}

fn remediation_for(validation_type: ValidationType) -> &'static str {
    match validation_type {
        ValidationType::Mathematical => {
            "Review calculations and verify numeric consistency before publication"
        }
        ValidationType::Logical => {
            "Address logical fallacies and strengthen the reasoning chain"
        }
        ValidationType::Critical => {
            "Obtain expert review and verify external sources before release"
        }
    }
}
