use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Risk band for one prediction, least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Minimal,
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "minimal",
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// Prediction domain, decided by keyword scan of the stringified prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    FinancialForecast,
    MarketPrediction,
    CompanyValuation,
    RegulatoryCompliance,
    CompetitiveAnalysis,
    GeneralAnalysis,
}

impl RiskCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::FinancialForecast => "financial_forecast",
            RiskCategory::MarketPrediction => "market_prediction",
            RiskCategory::CompanyValuation => "company_valuation",
            RiskCategory::RegulatoryCompliance => "regulatory_compliance",
            RiskCategory::CompetitiveAnalysis => "competitive_analysis",
            RiskCategory::GeneralAnalysis => "general_analysis",
        }
    }
}

/// Risk classification of one prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub risk_category: RiskCategory,
    /// Base score plus context bonuses, clamped to [0, 1].
    pub risk_score: f64,
    /// Human-readable drivers of the score.
    pub factors: Vec<String>,
    pub mitigation_strategies: Vec<String>,
}

/// Multi-model agreement summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceScore {
    /// Mean of the per-model confidences; 0.5 when no models reported.
    pub overall_confidence: f64,
    pub model_scores: HashMap<String, f64>,
    /// 1.0 with fewer than two models, else 1 - min(2 * MAD, 1).
    pub agreement_level: f64,
    /// Population variance of the confidences; 0.0 with fewer than two models.
    pub variance: f64,
    pub reliable: bool,
}

/// Final, display-ready prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustedPrediction {
    pub original_prediction: Value,
    /// Same shape as the original with numeric fields scaled and a
    /// disclaimer appended (non-numeric scalars are wrapped in a map).
    pub adjusted_prediction: Value,
    /// risk weight x overall confidence x agreement, in [0, 1].
    pub adjustment_factor: f64,
    pub confidence_score: ConfidenceScore,
    pub risk_assessment: RiskAssessment,
    /// Pipe-joined summary of risk, confidence, adjustment, mitigation.
    pub explanation: String,
    pub should_display: bool,
}
