//! Heuristic verifier implementations.
//!
//! Each verifier is a deterministic stand-in for a real verification
//! backend (symbolic solver, review model). They share no state and can
//! be replaced individually through the `ClaimVerifier` trait.

use claim_core::{ClaimContext, ClaimVerifier, VerifierOutcome};
use regex::Regex;
use serde_json::json;

use crate::config::{CriticalReviewConfig, ValidatorConfig};

const REASONING_CONNECTIVES: &[&str] = &["because", "therefore", "thus", "hence", "since"];

const FALLACY_MARKERS: &[(&str, &str)] = &[
    ("everyone knows", "appeal to popularity"),
    ("obviously", "bare assertion"),
    ("guaranteed", "certainty overreach"),
    ("without any doubt", "certainty overreach"),
    ("cannot fail", "certainty overreach"),
    ("always works", "overgeneralization"),
];

const CONTRADICTION_PAIRS: &[(&str, &str)] = &[
    ("increase", "decrease"),
    ("rise", "fall"),
    ("growth", "decline"),
    ("improve", "worsen"),
];

const FORECAST_MARKERS: &[&str] = &["forecast", "predict", "estimate", "project"];

const COMPLIANCE_DENYLIST: &[&str] = &[
    "guaranteed return",
    "risk-free",
    "cannot lose",
    "sure thing",
    "insider",
];

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Extracts numeric content from the claim and verifies any calculation
/// it can parse. Currently parses "N% of $M equals $K"; anything else
/// that looks like arithmetic goes through a placeholder verifier.
pub struct MathematicalVerifier {
    number_re: Regex,
    percent_of_re: Regex,
    calc_marker_re: Regex,
    no_calculation_confidence: f64,
    placeholder_confidence: f64,
    failed_confidence: f64,
}

impl MathematicalVerifier {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            // Plain, thousands-separated, decimal, and scientific forms.
            number_re: Regex::new(r"-?\d+(?:,\d{3})*(?:\.\d+)?(?:[eE][+-]?\d+)?")
                .expect("static regex"),
            percent_of_re: Regex::new(
                r"(?i)(\d+(?:\.\d+)?)\s*%\s*of\s*\$?\s*(\d+(?:,\d{3})*(?:\.\d+)?)\s*(?:equals|is|=)\s*\$?\s*(\d+(?:,\d{3})*(?:\.\d+)?)",
            )
            .expect("static regex"),
            calc_marker_re: Regex::new(r"(?i)[+*/=×÷]|equals|plus|minus|times|sum of|total of")
                .expect("static regex"),
            no_calculation_confidence: config.no_calculation_confidence,
            placeholder_confidence: config.placeholder_calculation_confidence,
            failed_confidence: config.failed_calculation_confidence,
        }
    }

    fn extract_numbers(&self, claim: &str) -> Vec<f64> {
        self.number_re
            .find_iter(claim)
            .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
            .collect()
    }

    /// Verify "N% of M equals K" within a relative tolerance.
    fn check_percent_of(&self, claim: &str) -> Option<bool> {
        let caps = self.percent_of_re.captures(claim)?;
        let percent: f64 = caps[1].parse().ok()?;
        let base: f64 = caps[2].replace(',', "").parse().ok()?;
        let stated: f64 = caps[3].replace(',', "").parse().ok()?;

        let expected = percent / 100.0 * base;
        let tolerance = expected.abs().max(1.0) * 0.01;
        Some((expected - stated).abs() <= tolerance)
    }

    fn units_consistent(&self, claim: &str) -> bool {
        let mut seen: Option<char> = None;
        for symbol in claim.chars().filter(|c| CURRENCY_SYMBOLS.contains(c)) {
            match seen {
                None => seen = Some(symbol),
                Some(first) if first != symbol => return false,
                Some(_) => {}
            }
        }
        true
    }
}

impl ClaimVerifier for MathematicalVerifier {
    fn name(&self) -> &str {
        "heuristic-math-v1"
    }

    fn verify(&self, claim: &str, _context: &ClaimContext) -> VerifierOutcome {
        if claim.trim().is_empty() {
            return VerifierOutcome::new(false, 0.0).with_detail("reason", "empty claim");
        }

        let numbers = self.extract_numbers(claim);
        let units_consistent = self.units_consistent(claim);

        let (calculations_present, verified, confidence) =
            if let Some(holds) = self.check_percent_of(claim) {
                let confidence = if holds {
                    self.placeholder_confidence
                } else {
                    self.failed_confidence
                };
                (true, holds, confidence)
            } else if self.calc_marker_re.is_match(claim) {
                // Placeholder hook: a symbolic verifier would run here.
                (true, true, self.placeholder_confidence)
            } else {
                (false, true, self.no_calculation_confidence)
            };

        VerifierOutcome::new(verified && units_consistent, confidence)
            .with_detail("numbers_found", numbers.len())
            .with_detail("numbers", json!(numbers))
            .with_detail("calculations_present", calculations_present)
            .with_detail("calculations_verified", verified)
            .with_detail("units_consistent", units_consistent)
    }
}

/// Checks reasoning structure, fallacy markers, contradictions, and an
/// overall consistency score.
pub struct LogicalVerifier {
    consistency_pass_bar: f64,
}

impl LogicalVerifier {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            consistency_pass_bar: config.consistency_pass_bar,
        }
    }

    fn detect_fallacies(text: &str) -> Vec<&'static str> {
        FALLACY_MARKERS
            .iter()
            .filter(|(marker, _)| text.contains(marker))
            .map(|(_, label)| *label)
            .collect()
    }

    fn detect_contradictions(text: &str) -> Vec<String> {
        CONTRADICTION_PAIRS
            .iter()
            .filter(|(a, b)| text.contains(a) && text.contains(b))
            .map(|(a, b)| format!("{a}/{b}"))
            .collect()
    }
}

impl ClaimVerifier for LogicalVerifier {
    fn name(&self) -> &str {
        "heuristic-logic-v1"
    }

    fn verify(&self, claim: &str, _context: &ClaimContext) -> VerifierOutcome {
        if claim.trim().is_empty() {
            return VerifierOutcome::new(false, 0.0)
                .with_detail("reason", "empty claim")
                .with_detail("has_structure", false);
        }

        let text = claim.to_lowercase();

        let has_structure = REASONING_CONNECTIVES.iter().any(|c| text.contains(c));
        let fallacies = Self::detect_fallacies(&text);
        let contradictions = Self::detect_contradictions(&text);

        let consistency_score = (1.0
            - 0.15 * fallacies.len() as f64
            - 0.25 * contradictions.len() as f64)
            .clamp(0.0, 1.0);

        let passed = has_structure
            && fallacies.is_empty()
            && contradictions.is_empty()
            && consistency_score > self.consistency_pass_bar;

        let confidence = if passed {
            consistency_score
        } else {
            consistency_score * 0.5
        };

        VerifierOutcome::new(passed, confidence)
            .with_detail("has_structure", has_structure)
            .with_detail("fallacies", json!(fallacies))
            .with_detail("contradictions", json!(contradictions))
            .with_detail("consistency_score", consistency_score)
    }
}

/// Compliance and expert-review heuristic.
///
/// Source verification and the expert score are injected stubs (see
/// `CriticalReviewConfig`); only the compliance deny-list and risk
/// categorization look at the claim text itself.
pub struct CriticalVerifier {
    review: CriticalReviewConfig,
}

impl CriticalVerifier {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            review: config.critical_review.clone(),
        }
    }

    fn risk_category(text: &str) -> &'static str {
        if FORECAST_MARKERS.iter().any(|m| text.contains(m)) {
            "high"
        } else {
            "medium"
        }
    }
}

impl ClaimVerifier for CriticalVerifier {
    fn name(&self) -> &str {
        "heuristic-critical-v1"
    }

    fn verify(&self, claim: &str, _context: &ClaimContext) -> VerifierOutcome {
        if claim.trim().is_empty() {
            return VerifierOutcome::new(false, 0.0).with_detail("reason", "empty claim");
        }

        let text = claim.to_lowercase();

        let flags: Vec<&str> = COMPLIANCE_DENYLIST
            .iter()
            .filter(|phrase| text.contains(*phrase))
            .copied()
            .collect();
        let compliance_passed = flags.is_empty();

        let sources_verified = self.review.sources_verified;
        let expert_score = self.review.expert_score;

        let passed =
            sources_verified && compliance_passed && expert_score > self.review.expert_pass_bar;

        VerifierOutcome::new(passed, expert_score)
            .with_detail("risk_category", Self::risk_category(&text))
            .with_detail("sources_verified", sources_verified)
            .with_detail("compliance_passed", compliance_passed)
            .with_detail("compliance_flags", json!(flags))
            .with_detail("expert_score", expert_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim_core::ClaimContext;
    use serde_json::{Map, Value};

    fn ctx() -> ClaimContext {
        ClaimContext::new()
    }

    fn detail_bool(details: &Map<String, Value>, key: &str) -> bool {
        matches!(details.get(key), Some(Value::Bool(true)))
    }

    #[test]
    fn math_verifies_percent_of_claim() {
        let verifier = MathematicalVerifier::new(&ValidatorConfig::default());
        let outcome = verifier.verify("10% of $100 equals $10", &ctx());

        assert!(outcome.passed);
        assert!(outcome.confidence > 0.8);
        assert!(detail_bool(&outcome.details, "calculations_verified"));
    }

    #[test]
    fn math_rejects_wrong_arithmetic() {
        let verifier = MathematicalVerifier::new(&ValidatorConfig::default());
        let outcome = verifier.verify("10% of $100 equals $25", &ctx());

        assert!(!outcome.passed);
        assert!(outcome.confidence < 0.5);
    }

    #[test]
    fn math_defaults_high_confidence_without_calculations() {
        let verifier = MathematicalVerifier::new(&ValidatorConfig::default());
        let outcome = verifier.verify("Revenue was $500 in Q3", &ctx());

        assert!(outcome.passed);
        assert_eq!(outcome.confidence, 0.95);
    }

    #[test]
    fn math_extracts_scientific_notation() {
        let verifier = MathematicalVerifier::new(&ValidatorConfig::default());
        let outcome = verifier.verify("Market cap near 1.2e9 this year", &ctx());

        assert_eq!(outcome.details["numbers_found"], 1);
    }

    #[test]
    fn math_flags_mixed_currencies() {
        let verifier = MathematicalVerifier::new(&ValidatorConfig::default());
        let outcome = verifier.verify("Revenue of $100 against costs of €80", &ctx());

        assert!(!outcome.passed);
        assert!(!detail_bool(&outcome.details, "units_consistent"));
    }

    #[test]
    fn math_fails_closed_on_empty_claim() {
        let verifier = MathematicalVerifier::new(&ValidatorConfig::default());
        let outcome = verifier.verify("  ", &ctx());

        assert!(!outcome.passed);
        assert_eq!(outcome.confidence, 0.0);
    }

    #[test]
    fn logic_requires_reasoning_connective() {
        let verifier = LogicalVerifier::new(&ValidatorConfig::default());
        let outcome = verifier.verify("Revenue will double next year", &ctx());

        assert!(!outcome.passed);
        assert!(!detail_bool(&outcome.details, "has_structure"));
        // Failed check halves the consistency score.
        assert!((outcome.confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn logic_passes_structured_clean_claim() {
        let verifier = LogicalVerifier::new(&ValidatorConfig::default());
        let outcome = verifier.verify(
            "Margins expanded because input costs dropped, therefore profit grew",
            &ctx(),
        );

        assert!(outcome.passed);
        assert_eq!(outcome.confidence, 1.0);
    }

    #[test]
    fn logic_detects_fallacy_markers() {
        let verifier = LogicalVerifier::new(&ValidatorConfig::default());
        let outcome = verifier.verify(
            "Everyone knows this stock is guaranteed to rise because demand is up",
            &ctx(),
        );

        assert!(!outcome.passed);
        let fallacies = outcome.details["fallacies"].as_array().unwrap();
        assert_eq!(fallacies.len(), 2);
    }

    #[test]
    fn logic_detects_contradictions() {
        let verifier = LogicalVerifier::new(&ValidatorConfig::default());
        let outcome = verifier.verify(
            "Sales will increase next quarter because sales will decrease",
            &ctx(),
        );

        assert!(!outcome.passed);
        assert!(!outcome.details["contradictions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn critical_categorizes_forecast_language_as_high() {
        let verifier = CriticalVerifier::new(&ValidatorConfig::default());
        let outcome = verifier.verify("We forecast 12% growth", &ctx());

        assert_eq!(outcome.details["risk_category"], "high");
        assert!(outcome.passed);
        assert_eq!(outcome.confidence, 0.88);
    }

    #[test]
    fn critical_fails_on_compliance_denylist() {
        let verifier = CriticalVerifier::new(&ValidatorConfig::default());
        let outcome = verifier.verify("A guaranteed return of 20% annually", &ctx());

        assert!(!outcome.passed);
        assert!(!detail_bool(&outcome.details, "compliance_passed"));
    }

    #[test]
    fn critical_fails_when_expert_score_below_bar() {
        let mut config = ValidatorConfig::default();
        config.critical_review.expert_score = 0.80;

        let verifier = CriticalVerifier::new(&config);
        let outcome = verifier.verify("Revenue grew 5% last quarter", &ctx());

        assert!(!outcome.passed);
        assert_eq!(outcome.confidence, 0.80);
    }
}
