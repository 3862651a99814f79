use serde_json::{json, Map, Value};
use std::collections::HashMap;

use claim_core::ClaimContext;

use crate::config::ProtectorConfig;
use crate::models::{
    AdjustedPrediction, ConfidenceScore, RiskAssessment, RiskCategory, RiskLevel,
};

const FORECAST_TERMS: &[&str] = &[
    "forecast", "predict", "project", "estimate", "expected", "will reach", "will grow",
    "by next",
];

const FINANCIAL_TERMS: &[&str] = &[
    "revenue", "earnings", "profit", "income", "cash flow", "eps", "margin", "sales",
];

const MARKET_TERMS: &[&str] = &[
    "price", "market", "stock", "shares", "trading", "bull", "bear", "rally",
];

const VALUATION_TERMS: &[&str] = &[
    "valuation", "market cap", "intrinsic value", "fair value", "worth", "dcf",
];

const COMPLIANCE_TERMS: &[&str] = &[
    "compliance", "regulatory", "regulation", "sec filing", "disclosure", "audit",
];

const COMPETITIVE_TERMS: &[&str] = &["competitor", "competition", "market share", "rival"];

/// Protection pipeline for one prediction.
///
/// The three sub-operations (`assess_risk`, `calculate_confidence`,
/// `adjust_prediction`) are independently callable; `protect` composes
/// them in order. Instances hold only configuration and are safe to
/// share across workers.
pub struct RiskProtector {
    config: ProtectorConfig,
}

impl Default for RiskProtector {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskProtector {
    pub fn new() -> Self {
        Self::with_config(ProtectorConfig::default())
    }

    pub fn with_config(config: ProtectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProtectorConfig {
        &self.config
    }

    /// Run the full pipeline: risk assessment, confidence aggregation,
    /// conservative adjustment.
    pub fn protect(
        &self,
        prediction: &Value,
        context: &ClaimContext,
        model_outputs: &HashMap<String, Value>,
    ) -> AdjustedPrediction {
        let risk_assessment = self.assess_risk(prediction, context);
        let confidence_score = self.calculate_confidence(prediction, model_outputs);
        let (adjusted, factor, explanation, should_display) =
            self.adjust_prediction(prediction, &risk_assessment, &confidence_score, context);

        tracing::debug!(
            risk_level = risk_assessment.risk_level.label(),
            category = risk_assessment.risk_category.label(),
            adjustment_factor = factor,
            should_display,
            "prediction protected"
        );

        AdjustedPrediction {
            original_prediction: prediction.clone(),
            adjusted_prediction: adjusted,
            adjustment_factor: factor,
            confidence_score,
            risk_assessment,
            explanation,
            should_display,
        }
    }

    /// Categorize the prediction and score its risk from the category
    /// base score plus context bonuses.
    pub fn assess_risk(&self, prediction: &Value, context: &ClaimContext) -> RiskAssessment {
        let text = stringify(prediction).to_lowercase();
        let category = categorize(&text);

        let mut score = self.config.base_risk.for_category(category);

        let mut factors = vec!["Forward-looking prediction carries inherent uncertainty".to_string()];

        if context.uncertainty_high() {
            score += self.config.uncertainty_bonus;
            factors.push("Caller flagged elevated uncertainty".to_string());
        }
        if let Some(volatility) = context.historical_volatility() {
            if volatility > self.config.volatility_cutoff {
                score += self.config.volatility_bonus;
                factors.push(format!(
                    "Historical volatility {volatility:.2} above {:.2}",
                    self.config.volatility_cutoff
                ));
            }
        }
        if let Some(quality) = context.data_quality() {
            if quality < self.config.data_quality_floor {
                factors.push(format!(
                    "Data quality {quality:.2} below {:.2}",
                    self.config.data_quality_floor
                ));
            }
        }
        if let Some(n) = context.sample_size() {
            if n < self.config.small_sample_floor {
                factors.push(format!(
                    "Small sample size ({n:.0} observations)"
                ));
            }
        }
        if let Some(days) = context.time_horizon_days() {
            if days > self.config.long_horizon_days {
                factors.push(format!("Long prediction horizon ({days:.0} days)"));
            }
        }

        let score = score.clamp(0.0, 1.0);
        let level = self.config.risk_bands.level_for(score);

        RiskAssessment {
            risk_level: level,
            risk_category: category,
            risk_score: score,
            factors,
            mitigation_strategies: mitigations(category, level),
        }
    }

    /// Aggregate the named model confidences into one score.
    ///
    /// A model output may be a record with a `confidence` field or a bare
    /// numeric; anything else falls back to the configured default.
    pub fn calculate_confidence(
        &self,
        prediction: &Value,
        model_outputs: &HashMap<String, Value>,
    ) -> ConfidenceScore {
        let model_scores: HashMap<String, f64> = model_outputs
            .iter()
            .map(|(name, output)| (name.clone(), self.extract_confidence(output)))
            .collect();

        let n = model_scores.len();
        let overall_confidence = if n == 0 {
            0.5
        } else {
            model_scores.values().sum::<f64>() / n as f64
        };

        let (agreement_level, variance) = if n < 2 {
            (1.0, 0.0)
        } else {
            let mean = overall_confidence;
            let mad = model_scores
                .values()
                .map(|c| (c - mean).abs())
                .sum::<f64>()
                / n as f64;
            let variance = model_scores
                .values()
                .map(|c| (c - mean).powi(2))
                .sum::<f64>()
                / n as f64;
            (1.0 - (2.0 * mad).min(1.0), variance)
        };

        let reliable = overall_confidence >= self.config.confidence_threshold
            && agreement_level >= self.config.min_agreement
            && variance < self.config.max_variance;

        tracing::debug!(
            models = n,
            overall = overall_confidence,
            agreement = agreement_level,
            variance,
            prediction_kind = value_kind(prediction),
            "confidence aggregated"
        );

        ConfidenceScore {
            overall_confidence,
            model_scores,
            agreement_level,
            variance,
            reliable,
        }
    }

    /// Scale and annotate the prediction, and decide whether it may be
    /// shown at all.
    pub fn adjust_prediction(
        &self,
        prediction: &Value,
        risk: &RiskAssessment,
        confidence: &ConfidenceScore,
        context: &ClaimContext,
    ) -> (Value, f64, String, bool) {
        let factor = (self.config.risk_weights.for_level(risk.risk_level)
            * confidence.overall_confidence
            * confidence.agreement_level)
            .clamp(0.0, 1.0);

        let disclaimer = disclaimer_for(risk.risk_level);
        let adjusted = apply_factor(prediction, factor, disclaimer);

        let mut parts = vec![
            format!(
                "Risk: {} (score {:.2})",
                risk.risk_level.label(),
                risk.risk_score
            ),
            format!(
                "Confidence: {:.2} (agreement {:.2})",
                confidence.overall_confidence, confidence.agreement_level
            ),
        ];
        if factor < self.config.adjustment_note_floor {
            parts.push(format!(
                "Prediction scaled to {:.0}% of original magnitude",
                factor * 100.0
            ));
        }
        if context.uncertainty_high() {
            parts.push("Caller context flags elevated uncertainty".to_string());
        }
        if let Some(mitigation) = risk.mitigation_strategies.first() {
            parts.push(format!("Mitigation: {mitigation}"));
        }
        let explanation = parts.join(" | ");

        let suppressed = (risk.risk_level == RiskLevel::Critical
            && confidence.overall_confidence < self.config.display_min_confidence)
            || !confidence.reliable
            || confidence.variance > self.config.display_variance_cap;

        (adjusted, factor, explanation, !suppressed)
    }

    fn extract_confidence(&self, output: &Value) -> f64 {
        let raw = match output {
            Value::Number(n) => n.as_f64(),
            Value::Object(map) => map.get("confidence").and_then(Value::as_f64),
            _ => None,
        };
        raw.unwrap_or(self.config.default_model_confidence)
            .clamp(0.0, 1.0)
    }
}

/// Keyword routing of the stringified prediction into a risk category.
fn categorize(text: &str) -> RiskCategory {
    let has_any = |terms: &[&str]| terms.iter().any(|t| text.contains(t));

    if has_any(FORECAST_TERMS) && has_any(FINANCIAL_TERMS) {
        RiskCategory::FinancialForecast
    } else if has_any(MARKET_TERMS) {
        RiskCategory::MarketPrediction
    } else if has_any(VALUATION_TERMS) {
        RiskCategory::CompanyValuation
    } else if has_any(COMPLIANCE_TERMS) {
        RiskCategory::RegulatoryCompliance
    } else if has_any(COMPETITIVE_TERMS) {
        RiskCategory::CompetitiveAnalysis
    } else {
        RiskCategory::GeneralAnalysis
    }
}

fn stringify(prediction: &Value) -> String {
    match prediction {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Numeric predictions are scaled directly; maps get every top-level
/// numeric field scaled plus a disclaimer; anything else is wrapped.
fn apply_factor(prediction: &Value, factor: f64, disclaimer: &str) -> Value {
    match prediction {
        Value::Number(n) => match n.as_f64() {
            Some(x) => json!(x * factor),
            None => prediction.clone(),
        },
        Value::Object(fields) => {
            let mut adjusted: Map<String, Value> = fields
                .iter()
                .map(|(key, value)| match value.as_f64() {
                    Some(x) => (key.clone(), json!(x * factor)),
                    None => (key.clone(), value.clone()),
                })
                .collect();
            adjusted.insert("disclaimer".to_string(), json!(disclaimer));
            Value::Object(adjusted)
        }
        other => json!({
            "value": other,
            "adjustment_factor": factor,
            "disclaimer": disclaimer,
        }),
    }
}

fn disclaimer_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => {
            "High-risk automated prediction. Do not act without independent professional review."
        }
        RiskLevel::High => {
            "This prediction carries significant uncertainty and has been conservatively adjusted."
        }
        RiskLevel::Moderate => {
            "This prediction has been adjusted for model confidence; treat it as an estimate."
        }
        _ => "Automated prediction; actual outcomes may vary.",
    }
}

fn mitigations(category: RiskCategory, level: RiskLevel) -> Vec<String> {
    let category_strategy = match category {
        RiskCategory::FinancialForecast => {
            "Present the forecast as a range rather than a point estimate"
        }
        RiskCategory::MarketPrediction => "Pair the prediction with scenario analysis",
        RiskCategory::CompanyValuation => "Cross-check the valuation against multiple methods",
        RiskCategory::RegulatoryCompliance => "Route through compliance review before release",
        RiskCategory::CompetitiveAnalysis => {
            "Corroborate competitor data with independent sources"
        }
        RiskCategory::GeneralAnalysis => "Attach supporting evidence to the analysis",
    };

    let level_strategy = match level {
        RiskLevel::Critical => "Require human sign-off before display",
        RiskLevel::High => "Display only with prominent uncertainty disclosure",
        RiskLevel::Moderate => "Monitor the outcome and recalibrate",
        _ => "Standard monitoring is sufficient",
    };

    vec![category_strategy.to_string(), level_strategy.to_string()]
}
