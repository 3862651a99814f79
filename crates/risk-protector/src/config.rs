use serde::{Deserialize, Serialize};

use crate::models::{RiskCategory, RiskLevel};

/// Versioned table of every tunable the protector uses.
///
/// Injected at construction so risk posture can be changed and tested
/// without code edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectorConfig {
    pub version: u32,
    pub base_risk: BaseRiskScores,
    pub risk_bands: RiskBands,
    pub risk_weights: RiskWeights,
    /// Minimum overall confidence for a reliable score.
    pub confidence_threshold: f64,
    /// Minimum agreement level for a reliable score.
    pub min_agreement: f64,
    /// Variance at or above this makes the score unreliable.
    pub max_variance: f64,
    /// Confidence assumed for a model output with no usable confidence.
    pub default_model_confidence: f64,
    /// Risk added when the caller flags `uncertainty_high`.
    pub uncertainty_bonus: f64,
    /// Risk added when historical volatility exceeds `volatility_cutoff`.
    pub volatility_bonus: f64,
    pub volatility_cutoff: f64,
    /// Data quality below this becomes a named risk factor.
    pub data_quality_floor: f64,
    /// Sample sizes below this become a named risk factor.
    pub small_sample_floor: f64,
    /// Horizons longer than this many days become a named risk factor.
    pub long_horizon_days: f64,
    /// Critical-risk predictions below this confidence are suppressed.
    pub display_min_confidence: f64,
    /// Variance above this suppresses display outright.
    pub display_variance_cap: f64,
    /// Adjustment percentages are only mentioned below this factor.
    pub adjustment_note_floor: f64,
}

impl Default for ProtectorConfig {
    fn default() -> Self {
        Self {
            version: 1,
            base_risk: BaseRiskScores::default(),
            risk_bands: RiskBands::default(),
            risk_weights: RiskWeights::default(),
            confidence_threshold: 0.70,
            min_agreement: 0.60,
            max_variance: 0.20,
            default_model_confidence: 0.70,
            uncertainty_bonus: 0.10,
            volatility_bonus: 0.05,
            volatility_cutoff: 0.50,
            data_quality_floor: 0.80,
            small_sample_floor: 100.0,
            long_horizon_days: 365.0,
            display_min_confidence: 0.60,
            display_variance_cap: 0.30,
            adjustment_note_floor: 0.90,
        }
    }
}

/// Base risk score per prediction category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseRiskScores {
    pub financial_forecast: f64,
    pub market_prediction: f64,
    pub company_valuation: f64,
    pub regulatory_compliance: f64,
    pub competitive_analysis: f64,
    pub general_analysis: f64,
}

impl BaseRiskScores {
    pub fn for_category(&self, category: RiskCategory) -> f64 {
        match category {
            RiskCategory::FinancialForecast => self.financial_forecast,
            RiskCategory::MarketPrediction => self.market_prediction,
            RiskCategory::CompanyValuation => self.company_valuation,
            RiskCategory::RegulatoryCompliance => self.regulatory_compliance,
            RiskCategory::CompetitiveAnalysis => self.competitive_analysis,
            RiskCategory::GeneralAnalysis => self.general_analysis,
        }
    }
}

impl Default for BaseRiskScores {
    fn default() -> Self {
        Self {
            financial_forecast: 0.80,
            market_prediction: 0.85,
            company_valuation: 0.75,
            regulatory_compliance: 0.90,
            competitive_analysis: 0.60,
            general_analysis: 0.40,
        }
    }
}

/// Score cut points for the five risk bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBands {
    pub critical_at: f64,
    pub high_at: f64,
    pub moderate_at: f64,
    pub low_at: f64,
}

impl RiskBands {
    pub fn level_for(&self, score: f64) -> RiskLevel {
        if score >= self.critical_at {
            RiskLevel::Critical
        } else if score >= self.high_at {
            RiskLevel::High
        } else if score >= self.moderate_at {
            RiskLevel::Moderate
        } else if score >= self.low_at {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            critical_at: 0.85,
            high_at: 0.70,
            moderate_at: 0.50,
            low_at: 0.30,
        }
    }
}

/// Multiplicative discount applied per risk level when adjusting a
/// prediction. Non-increasing in risk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskWeights {
    pub critical: f64,
    pub high: f64,
    pub moderate: f64,
    pub low: f64,
    pub minimal: f64,
}

impl RiskWeights {
    pub fn for_level(&self, level: RiskLevel) -> f64 {
        match level {
            RiskLevel::Critical => self.critical,
            RiskLevel::High => self.high,
            RiskLevel::Moderate => self.moderate,
            RiskLevel::Low => self.low,
            RiskLevel::Minimal => self.minimal,
        }
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            critical: 0.60,
            high: 0.75,
            moderate: 0.90,
            low: 0.95,
            minimal: 1.00,
        }
    }
}
