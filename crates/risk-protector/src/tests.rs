#[cfg(test)]
mod risk_protector_tests {
    use crate::config::ProtectorConfig;
    use crate::models::{RiskCategory, RiskLevel};
    use crate::protector::RiskProtector;
    use claim_core::ClaimContext;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn outputs(pairs: &[(&str, f64)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(name, conf)| (name.to_string(), json!({ "confidence": conf })))
            .collect()
    }

    #[test]
    fn forecast_with_financial_terms_routes_to_financial_forecast() {
        let protector = RiskProtector::new();
        let assessment = protector.assess_risk(
            &json!("We forecast revenue of $2B next year"),
            &ClaimContext::new(),
        );

        assert_eq!(assessment.risk_category, RiskCategory::FinancialForecast);
        assert_eq!(assessment.risk_score, 0.80);
        assert_eq!(assessment.risk_level, RiskLevel::High);
    }

    #[test]
    fn plain_text_routes_to_general_analysis() {
        let protector = RiskProtector::new();
        let assessment =
            protector.assess_risk(&json!("The team shipped a new feature"), &ClaimContext::new());

        assert_eq!(assessment.risk_category, RiskCategory::GeneralAnalysis);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
    }

    #[test]
    fn compliance_terms_route_to_regulatory_category() {
        let protector = RiskProtector::new();
        let assessment = protector.assess_risk(
            &json!("The disclosure may breach compliance requirements"),
            &ClaimContext::new(),
        );

        assert_eq!(assessment.risk_category, RiskCategory::RegulatoryCompliance);
        assert_eq!(assessment.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn risk_score_is_clamped_after_bonuses() {
        let protector = RiskProtector::new();
        let context = ClaimContext::new()
            .with("uncertainty_high", true)
            .with("historical_volatility", 0.9);

        // Regulatory base 0.90 plus 0.10 plus 0.05 would exceed 1.0.
        let assessment = protector.assess_risk(
            &json!("regulatory compliance exposure in the next audit"),
            &context,
        );

        assert_eq!(assessment.risk_score, 1.0);
        assert_eq!(assessment.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn context_cutoffs_become_named_factors() {
        let protector = RiskProtector::new();
        let context = ClaimContext::new()
            .with("data_quality", 0.5)
            .with("sample_size", 40)
            .with("time_horizon", 500);

        let assessment = protector.assess_risk(&json!("general note"), &context);
        let text = assessment.factors.join("; ");

        assert!(text.contains("Data quality"));
        assert!(text.contains("Small sample size"));
        assert!(text.contains("Long prediction horizon"));
        assert!(!assessment.mitigation_strategies.is_empty());
    }

    #[test]
    fn single_model_has_full_agreement_and_zero_variance() {
        let protector = RiskProtector::new();
        let score =
            protector.calculate_confidence(&json!(1.0), &outputs(&[("validator", 0.82)]));

        assert_eq!(score.agreement_level, 1.0);
        assert_eq!(score.variance, 0.0);
        assert!((score.overall_confidence - 0.82).abs() < 1e-12);
        assert!(score.reliable);
    }

    #[test]
    fn empty_model_set_defaults_to_midpoint() {
        let protector = RiskProtector::new();
        let score = protector.calculate_confidence(&json!(1.0), &HashMap::new());

        assert_eq!(score.overall_confidence, 0.5);
        assert_eq!(score.agreement_level, 1.0);
        assert!(!score.reliable);
    }

    #[test]
    fn disagreeing_models_are_unreliable() {
        let protector = RiskProtector::new();
        let score = protector
            .calculate_confidence(&json!(1.0), &outputs(&[("m1", 0.95), ("m2", 0.05)]));

        assert!(score.variance > 0.2);
        assert!(score.agreement_level < 0.7);
        assert!(!score.reliable);
    }

    #[test]
    fn missing_confidence_falls_back_to_default() {
        let protector = RiskProtector::new();
        let mut model_outputs = HashMap::new();
        model_outputs.insert("bare".to_string(), json!(0.9));
        model_outputs.insert("labelled".to_string(), json!({ "confidence": 0.8 }));
        model_outputs.insert("invalid".to_string(), json!({ "confidence": "high" }));

        let score = protector.calculate_confidence(&json!(1.0), &model_outputs);

        assert_eq!(score.model_scores["bare"], 0.9);
        assert_eq!(score.model_scores["labelled"], 0.8);
        assert_eq!(score.model_scores["invalid"], 0.7);
    }

    #[test]
    fn numeric_prediction_is_scaled_by_the_factor() {
        let protector = RiskProtector::new();
        let context = ClaimContext::new();

        let mut risk = protector.assess_risk(&json!("note"), &context);
        risk.risk_level = RiskLevel::High;
        let mut confidence =
            protector.calculate_confidence(&json!(100.0), &outputs(&[("m1", 0.9)]));
        confidence.overall_confidence = 0.9;
        confidence.agreement_level = 0.9;

        let (adjusted, factor, explanation, _) =
            protector.adjust_prediction(&json!(100.0), &risk, &confidence, &context);

        assert!((factor - 0.6075).abs() < 1e-12);
        assert!((adjusted.as_f64().unwrap() - 60.75).abs() < 1e-9);
        assert!(explanation.contains("61% of original magnitude"));
    }

    #[test]
    fn map_prediction_scales_numeric_fields_and_adds_disclaimer() {
        let protector = RiskProtector::new();
        let context = ClaimContext::new();
        let prediction = json!({
            "target_price": 200.0,
            "upside": 0.25,
            "ticker": "ACME",
        });

        let result = protector.protect(&prediction, &context, &outputs(&[("m1", 0.9)]));

        let adjusted = result.adjusted_prediction.as_object().unwrap();
        let factor = result.adjustment_factor;
        assert!((adjusted["target_price"].as_f64().unwrap() - 200.0 * factor).abs() < 1e-9);
        assert!((adjusted["upside"].as_f64().unwrap() - 0.25 * factor).abs() < 1e-9);
        assert_eq!(adjusted["ticker"], "ACME");
        assert!(adjusted["disclaimer"].as_str().unwrap().len() > 10);
    }

    #[test]
    fn non_numeric_prediction_is_wrapped() {
        let protector = RiskProtector::new();
        let result = protector.protect(
            &json!("hold through the quarter"),
            &ClaimContext::new(),
            &outputs(&[("m1", 0.85)]),
        );

        let wrapped = result.adjusted_prediction.as_object().unwrap();
        assert_eq!(wrapped["value"], "hold through the quarter");
        assert!(wrapped.contains_key("adjustment_factor"));
        assert!(wrapped.contains_key("disclaimer"));
    }

    #[test]
    fn unreliable_confidence_suppresses_display() {
        let protector = RiskProtector::new();
        let result = protector.protect(
            &json!(100.0),
            &ClaimContext::new(),
            &outputs(&[("m1", 0.95), ("m2", 0.05)]),
        );

        assert!(!result.should_display);
    }

    #[test]
    fn agreeing_confident_models_display() {
        let protector = RiskProtector::new();
        let result = protector.protect(
            &json!("the analysis looks solid"),
            &ClaimContext::new(),
            &outputs(&[("m1", 0.88), ("m2", 0.84)]),
        );

        assert!(result.should_display);
        assert!(result.confidence_score.reliable);
    }

    #[test]
    fn critical_risk_with_low_confidence_is_suppressed() {
        let mut config = ProtectorConfig::default();
        // Let a 0.55-confidence score count as reliable so the critical
        // gate is what suppresses it.
        config.confidence_threshold = 0.50;

        let protector = RiskProtector::with_config(config);
        let result = protector.protect(
            &json!("regulatory compliance breach expected in the audit"),
            &ClaimContext::new(),
            &outputs(&[("m1", 0.56), ("m2", 0.54)]),
        );

        assert_eq!(result.risk_assessment.risk_level, RiskLevel::Critical);
        assert!(result.confidence_score.reliable);
        assert!(!result.should_display);
    }

    #[test]
    fn validator_confidence_feeds_the_protector_as_a_model() {
        let validator = claim_validator::ClaimValidator::new();
        let context = ClaimContext::new();

        let report = validator.validate(
            "10% of $100 equals $10, therefore the discount is correct",
            &context,
            &[],
        );

        let mut model_outputs = outputs(&[("analyst_model", 0.85)]);
        model_outputs.insert(
            "claim_validator".to_string(),
            json!({ "confidence": report.confidence_score }),
        );

        let protector = RiskProtector::new();
        let result = protector.protect(&json!(42.0), &context, &model_outputs);

        assert_eq!(result.confidence_score.model_scores.len(), 2);
        assert!(result.confidence_score.model_scores["claim_validator"] > 0.0);
        assert!(result.adjustment_factor <= 1.0);
    }

    #[test]
    fn adjusted_prediction_serializes_to_json() {
        let protector = RiskProtector::new();
        let result = protector.protect(
            &json!({ "target_price": 120.0 }),
            &ClaimContext::new().with("uncertainty_high", true),
            &outputs(&[("validator", 0.9), ("analyst", 0.86)]),
        );

        let serialized = serde_json::to_string(&result).unwrap();
        let round_trip: crate::models::AdjustedPrediction =
            serde_json::from_str(&serialized).unwrap();
        assert_eq!(round_trip.adjustment_factor, result.adjustment_factor);
    }
}
