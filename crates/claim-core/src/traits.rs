use serde_json::{Map, Value};

use crate::ClaimContext;

/// Result of one verification capability run against a claim.
#[derive(Debug, Clone)]
pub struct VerifierOutcome {
    pub passed: bool,
    /// Always clamped to [0, 1].
    pub confidence: f64,
    /// Opaque per-check evidence, surfaced in the validation report.
    pub details: Map<String, Value>,
}

impl VerifierOutcome {
    pub fn new(passed: bool, confidence: f64) -> Self {
        Self {
            passed,
            confidence: confidence.clamp(0.0, 1.0),
            details: Map::new(),
        }
    }

    /// Builder-style detail insert.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Verification capability behind one validation layer.
///
/// The default implementations in `claim-validator` are deterministic
/// heuristics; a model-backed verifier (symbolic solver, separate LLM
/// call) can be substituted here without changing the orchestration.
/// A verifier that cannot reach a verdict should return
/// `passed = false, confidence = 0.0` rather than panic.
pub trait ClaimVerifier: Send + Sync {
    /// Label reported as `model_used` in the outcome.
    fn name(&self) -> &str;

    fn verify(&self, claim: &str, context: &ClaimContext) -> VerifierOutcome;
}
