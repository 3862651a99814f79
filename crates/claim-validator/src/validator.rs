use claim_core::{ClaimContext, ClaimVerifier};

use crate::checks::{CriticalVerifier, LogicalVerifier, MathematicalVerifier};
use crate::config::ValidatorConfig;
use crate::report::{severity_for, ValidationOutcome, ValidationReport, ValidationType};

/// Orchestrates the three validation layers over one claim.
///
/// Construct one per worker; instances hold no mutable state and are
/// safe to share behind a reference. Verifiers are injected so a
/// model-backed implementation can replace any heuristic without
/// touching this orchestration.
pub struct ClaimValidator {
    config: ValidatorConfig,
    mathematical: Box<dyn ClaimVerifier>,
    logical: Box<dyn ClaimVerifier>,
    critical: Box<dyn ClaimVerifier>,
}

impl Default for ClaimValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimValidator {
    /// Validator with default thresholds and heuristic verifiers.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        let mathematical = Box::new(MathematicalVerifier::new(&config));
        let logical = Box::new(LogicalVerifier::new(&config));
        let critical = Box::new(CriticalVerifier::new(&config));
        Self {
            config,
            mathematical,
            logical,
            critical,
        }
    }

    /// Swap in alternative verification backends.
    pub fn with_verifiers(
        config: ValidatorConfig,
        mathematical: Box<dyn ClaimVerifier>,
        logical: Box<dyn ClaimVerifier>,
        critical: Box<dyn ClaimVerifier>,
    ) -> Self {
        Self {
            config,
            mathematical,
            logical,
            critical,
        }
    }

    /// Run the requested checks against a claim.
    ///
    /// An empty `validation_types` slice requests all three layers. A
    /// failing check is data in the report, never an error: one bad
    /// claim cannot abort a batch.
    pub fn validate(
        &self,
        claim: &str,
        context: &ClaimContext,
        validation_types: &[ValidationType],
    ) -> ValidationReport {
        let outcomes: Vec<ValidationOutcome> = ValidationType::ALL
            .into_iter()
            .filter(|t| validation_types.is_empty() || validation_types.contains(t))
            .map(|t| self.run_check(t, claim, context))
            .collect();

        let report = ValidationReport::from_outcomes(claim, outcomes);
        tracing::debug!(
            overall_passed = report.overall_passed,
            confidence = report.confidence_score,
            risk_level = report.risk_level.label(),
            "claim validated"
        );
        report
    }

    fn run_check(
        &self,
        validation_type: ValidationType,
        claim: &str,
        context: &ClaimContext,
    ) -> ValidationOutcome {
        let verifier: &dyn ClaimVerifier = match validation_type {
            ValidationType::Mathematical => self.mathematical.as_ref(),
            ValidationType::Logical => self.logical.as_ref(),
            ValidationType::Critical => self.critical.as_ref(),
        };

        let result = verifier.verify(claim, context);
        let severity = severity_for(validation_type, result.confidence, &self.config.severity);

        let message = if result.passed {
            format!("{} check passed", validation_type.label())
        } else {
            format!(
                "{} check failed (confidence {:.2})",
                validation_type.label(),
                result.confidence
            )
        };

        ValidationOutcome {
            validation_type,
            passed: result.passed,
            confidence: result.confidence,
            severity,
            message,
            details: result.details,
            model_used: verifier.name().to_string(),
        }
    }
}
