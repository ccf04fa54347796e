//! View model structs returned by the report functions.
//!
//! All structs derive `Serialize` so adapters can hand them to chart
//! renderers or print them as JSON without reshaping.

use chrono::NaiveDateTime;
use rrd_core::observation::RiskLevel;
use serde::Serialize;
use std::{fmt, str::FromStr};

/// The highest-probability observation for the selected date.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Headline {
    pub unit_id: String,
    pub probability: f64,
    /// Display date of the winning row.
    pub date: String,
}

/// One row of the prioritized worklist. Values are unrounded.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriorityEntry {
    pub unit_id: String,
    pub probability: f64,
    pub rainfall_mm: f64,
    pub risk_level: RiskLevel,
}

/// Count of high-risk observations for one unit within the trailing period.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChronicEntry {
    pub unit_id: String,
    pub count: usize,
    /// Share of the period's high-risk total, rounded to one decimal.
    pub percentage: f64,
}

/// One point of the rainfall/probability scatter.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CorrelationPoint {
    pub rainfall_mm: f64,
    pub probability_percent: f64,
    pub risk_level: RiskLevel,
    pub unit_id: String,
}

/// Trailing window offered by the historical-period selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HistoricalPeriod {
    OneMonth,
    #[default]
    ThreeMonths,
    SixMonths,
    TwelveMonths,
}

impl HistoricalPeriod {
    pub const ALL: [HistoricalPeriod; 4] = [
        HistoricalPeriod::OneMonth,
        HistoricalPeriod::ThreeMonths,
        HistoricalPeriod::SixMonths,
        HistoricalPeriod::TwelveMonths,
    ];

    pub fn months(&self) -> u32 {
        match self {
            HistoricalPeriod::OneMonth => 1,
            HistoricalPeriod::ThreeMonths => 3,
            HistoricalPeriod::SixMonths => 6,
            HistoricalPeriod::TwelveMonths => 12,
        }
    }
}

/// A month count the period selector does not offer.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodError(pub String);

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported historical period {:?} (expected one of 1, 3, 6, 12 months)",
            self.0
        )
    }
}

impl std::error::Error for PeriodError {}

impl TryFrom<u32> for HistoricalPeriod {
    type Error = PeriodError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        HistoricalPeriod::ALL
            .into_iter()
            .find(|p| p.months() == months)
            .ok_or_else(|| PeriodError(months.to_string()))
    }
}

impl FromStr for HistoricalPeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let months: u32 = s.trim().parse().map_err(|_| PeriodError(s.to_string()))?;
        HistoricalPeriod::try_from(months)
    }
}

/// Every view of the dashboard for one (selection, period, reference) state.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSnapshot {
    pub selected_date: Option<String>,
    pub period_months: u32,
    pub reference: NaiveDateTime,
    pub total_observations: usize,
    pub headline: Option<Headline>,
    pub priority: Vec<PriorityEntry>,
    pub chronic: Vec<ChronicEntry>,
    pub correlation: Vec<CorrelationPoint>,
}
