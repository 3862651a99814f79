//! Claim Validator Module
//!
//! Multi-layer validation of machine-generated financial claims.
//! Runs mathematical, logical, and critical (compliance/expert-review)
//! checks and folds them into a single report with an aggregate
//! confidence, risk level, and recommendations.

pub mod checks;
pub mod config;
pub mod report;
pub mod validator;

pub use checks::{CriticalVerifier, LogicalVerifier, MathematicalVerifier};
pub use config::{CriticalReviewConfig, SeverityThresholds, ValidatorConfig};
pub use report::{ValidationOutcome, ValidationReport, ValidationType};
pub use validator::ClaimValidator;
