use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Qualitative band derived from a numeric confidence for one validation type.
///
/// Ordered from least to most severe so outcomes can be folded with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Side information accompanying a claim or prediction.
///
/// A string-keyed map of JSON primitives. A handful of keys are recognized
/// by the risk scorer (`uncertainty_high`, `historical_volatility`,
/// `data_quality`, `sample_size`, `time_horizon`); anything else passes
/// through untouched for the caller's own heuristics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimContext(Map<String, Value>);

impl ClaimContext {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True only if the key holds JSON `true`.
    pub fn bool_flag(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(true)))
    }

    /// Numeric value for the key, if present and actually numeric.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn uncertainty_high(&self) -> bool {
        self.bool_flag("uncertainty_high")
    }

    pub fn historical_volatility(&self) -> Option<f64> {
        self.number("historical_volatility")
    }

    pub fn data_quality(&self) -> Option<f64> {
        self.number("data_quality")
    }

    pub fn sample_size(&self) -> Option<f64> {
        self.number("sample_size")
    }

    /// Prediction horizon in days.
    pub fn time_horizon_days(&self) -> Option<f64> {
        self.number("time_horizon")
    }
}
