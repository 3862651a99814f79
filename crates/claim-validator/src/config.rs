use serde::{Deserialize, Serialize};

/// Tunable thresholds for the validator.
///
/// All bars that decide pass/fail or severity live here instead of being
/// scattered as literals, so they can be tested and tuned without code
/// changes. `version` identifies the threshold table in audit output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    pub version: u32,
    pub severity: SeverityThresholds,
    pub critical_review: CriticalReviewConfig,
    /// Confidence reported when a claim contains no calculations to verify.
    pub no_calculation_confidence: f64,
    /// Confidence reported by the placeholder calculation verifier for
    /// expressions it recognizes but cannot parse.
    pub placeholder_calculation_confidence: f64,
    /// Confidence reported for a parsed calculation that does not hold.
    pub failed_calculation_confidence: f64,
    /// Logical consistency score required to pass.
    pub consistency_pass_bar: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            version: 1,
            severity: SeverityThresholds::default(),
            critical_review: CriticalReviewConfig::default(),
            no_calculation_confidence: 0.95,
            placeholder_calculation_confidence: 0.90,
            failed_calculation_confidence: 0.35,
            consistency_pass_bar: 0.80,
        }
    }
}

/// Confidence cut points that map an outcome's confidence to a severity band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityThresholds {
    /// Below this, a critical-type outcome is `critical`.
    pub critical_type_critical_below: f64,
    /// Below this, a critical-type outcome is at least `high`.
    pub critical_type_high_below: f64,
    /// Below this, any outcome is at least `high`.
    pub high_below: f64,
    /// Below this, any outcome is at least `medium`.
    pub medium_below: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical_type_critical_below: 0.70,
            critical_type_high_below: 0.85,
            high_below: 0.60,
            medium_below: 0.75,
        }
    }
}

/// Stubbed inputs to the critical (compliance/expert) check.
///
/// The decision policy behind source verification and expert scoring is
/// owned by external review systems; until those are wired in, the values
/// are injected here rather than hardcoded, so deployments can tune them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalReviewConfig {
    /// Whether external sources are considered verified.
    pub sources_verified: bool,
    /// Heuristic expert-review score assigned to non-empty claims.
    pub expert_score: f64,
    /// Expert score required (strictly greater) to pass.
    pub expert_pass_bar: f64,
}

impl Default for CriticalReviewConfig {
    fn default() -> Self {
        Self {
            sources_verified: true,
            expert_score: 0.88,
            expert_pass_bar: 0.85,
        }
    }
}
