use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Predicted risk class for a unit on a given date.
///
/// The prediction files spell these `ALTO` and `BAJO`; both are kept as the
/// serialized and displayed form.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "ALTO")]
    High,
    #[serde(rename = "BAJO")]
    Low,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "ALTO",
            RiskLevel::Low => "BAJO",
        }
    }

    pub fn is_high(&self) -> bool {
        *self == RiskLevel::High
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    /// Case and surrounding whitespace are ignored; any other token is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALTO" => Ok(RiskLevel::High),
            "BAJO" => Ok(RiskLevel::Low),
            _ => Err(s.to_string()),
        }
    }
}

/// A single validated prediction row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub date: NaiveDate,
    /// The date exactly as written in the source file.
    pub date_display: String,
    pub rainfall_mm: f64,
    pub risk_level: RiskLevel,
    /// Probability of high risk, nominally in [0, 1] but not clamped.
    pub risk_probability: f64,
    pub unit_id: String,
}

impl Observation {
    /// Probability expressed as a percentage, as shown on charts and reports.
    pub fn probability_percent(&self) -> f64 {
        self.risk_probability * 100.0
    }
}
