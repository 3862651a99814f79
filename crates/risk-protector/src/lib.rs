//! Risk Protector Module
//!
//! Risk-and-confidence protection layer for machine-generated financial
//! predictions. Categorizes prediction risk, aggregates confidence across
//! independent model outputs, and conservatively rescales/annotates
//! predictions before they reach end users.

pub mod config;
pub mod models;
pub mod protector;
#[cfg(test)]
mod tests;

pub use config::{BaseRiskScores, ProtectorConfig, RiskBands, RiskWeights};
pub use models::{
    AdjustedPrediction, ConfidenceScore, RiskAssessment, RiskCategory, RiskLevel,
};
pub use protector::RiskProtector;
