//! Validation and coercion of raw records into [`Observation`]s.
//!
//! Rows with a missing date or unit, an unparseable date, or an unknown risk
//! token are dropped. Unparseable rainfall or probability values default to
//! zero and the row is kept. Every such event is recorded as a
//! [`Diagnostic`] and logged; none of them abort the batch.

use crate::observation::{Observation, RiskLevel};
use crate::record::RawRecord;
use rrd_utils::{dates::parse_display_date, decimal::parse_decimal};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    MissingDateOrUnit,
    InvalidRainfall(String),
    InvalidProbability(String),
    UnknownRiskToken(String),
    InvalidDate(String),
}

impl DiagnosticKind {
    /// Whether the row carrying this diagnostic was dropped.
    pub fn rejects_row(&self) -> bool {
        !matches!(
            self,
            DiagnosticKind::InvalidRainfall(_) | DiagnosticKind::InvalidProbability(_)
        )
    }
}

/// A per-row warning. `row` is the 1-based data row number (header excluded).
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub row: usize,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::MissingDateOrUnit => {
                write!(f, "row {}: ignored, missing date or unit", self.row)
            }
            DiagnosticKind::InvalidRainfall(raw) => {
                write!(f, "row {}: non-numeric rainfall {:?}, using 0", self.row, raw)
            }
            DiagnosticKind::InvalidProbability(raw) => {
                write!(f, "row {}: non-numeric probability {:?}, using 0", self.row, raw)
            }
            DiagnosticKind::UnknownRiskToken(raw) => {
                write!(f, "row {}: ignored, unknown risk token {:?}", self.row, raw)
            }
            DiagnosticKind::InvalidDate(raw) => {
                write!(f, "row {}: ignored, invalid date {:?}", self.row, raw)
            }
        }
    }
}

/// Result of normalizing a batch of raw records.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub observations: Vec<Observation>,
    pub diagnostics: Vec<Diagnostic>,
    total: usize,
}

impl NormalizeOutcome {
    /// Number of rows that became observations.
    pub fn accepted(&self) -> usize {
        self.observations.len()
    }

    /// Number of rows attempted.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn rejected(&self) -> usize {
        self.total - self.accepted()
    }
}

/// Normalize raw records in input order.
pub fn normalize(records: &[RawRecord]) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome {
        observations: Vec::with_capacity(records.len()),
        diagnostics: Vec::new(),
        total: records.len(),
    };
    for (idx, raw) in records.iter().enumerate() {
        if let Some(obs) = normalize_record(idx + 1, raw, &mut outcome.diagnostics) {
            outcome.observations.push(obs);
        }
    }
    log::info!(
        "normalize: accepted {} of {} rows ({} diagnostics)",
        outcome.accepted(),
        outcome.total(),
        outcome.diagnostics.len()
    );
    outcome
}

fn normalize_record(
    row: usize,
    raw: &RawRecord,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Observation> {
    let mut report = |kind: DiagnosticKind| {
        let diagnostic = Diagnostic { row, kind };
        log::warn!("{}", diagnostic);
        diagnostics.push(diagnostic);
    };

    let date_text = raw.date.as_deref().filter(|s| !s.is_empty());
    let unit = raw.unit.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let (date_text, unit) = match (date_text, unit) {
        (Some(d), Some(u)) => (d, u),
        _ => {
            report(DiagnosticKind::MissingDateOrUnit);
            return None;
        }
    };

    let rainfall_raw = raw.rainfall.as_deref().unwrap_or("");
    let rainfall_mm = parse_decimal(rainfall_raw).unwrap_or_else(|| {
        report(DiagnosticKind::InvalidRainfall(rainfall_raw.to_string()));
        0.0
    });
    let probability_raw = raw.probability.as_deref().unwrap_or("");
    let risk_probability = parse_decimal(probability_raw).unwrap_or_else(|| {
        report(DiagnosticKind::InvalidProbability(probability_raw.to_string()));
        0.0
    });

    let risk_raw = raw.risk.as_deref().unwrap_or("");
    let risk_level = match risk_raw.parse::<RiskLevel>() {
        Ok(level) => level,
        Err(token) => {
            report(DiagnosticKind::UnknownRiskToken(token));
            return None;
        }
    };

    let date = match parse_display_date(date_text) {
        Ok(date) => date,
        Err(_) => {
            report(DiagnosticKind::InvalidDate(date_text.to_string()));
            return None;
        }
    };

    Some(Observation {
        date,
        date_display: date_text.to_string(),
        rainfall_mm,
        risk_level,
        risk_probability,
        unit_id: unit.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(date: &str, rain: &str, risk: &str, prob: &str, unit: &str) -> RawRecord {
        let field = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        RawRecord {
            date: field(date),
            rainfall: field(rain),
            risk: field(risk),
            probability: field(prob),
            unit: field(unit),
        }
    }

    #[test]
    fn accepts_well_formed_row() {
        let outcome = normalize(&[raw("01-03-2024", "15,5", "ALTO", "0,75", " UV-7 ")]);
        assert_eq!(outcome.accepted(), 1);
        assert!(outcome.diagnostics.is_empty());
        let obs = &outcome.observations[0];
        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(obs.date_display, "01-03-2024");
        assert_eq!(obs.rainfall_mm, 15.5);
        assert_eq!(obs.risk_level, RiskLevel::High);
        assert_eq!(obs.risk_probability, 0.75);
        assert_eq!(obs.unit_id, "UV-7");
    }

    #[test]
    fn comma_and_dot_decimals_agree() {
        let outcome = normalize(&[
            raw("01-03-2024", "12,5", "BAJO", "0,1", "A"),
            raw("01-03-2024", "12.5", "BAJO", "0.1", "B"),
        ]);
        assert_eq!(outcome.observations[0].rainfall_mm, 12.5);
        assert_eq!(
            outcome.observations[0].rainfall_mm,
            outcome.observations[1].rainfall_mm
        );
        assert_eq!(
            outcome.observations[0].risk_probability,
            outcome.observations[1].risk_probability
        );
    }

    #[test]
    fn missing_date_or_unit_rejects_row() {
        let outcome = normalize(&[
            raw("", "1", "ALTO", "0,5", "UV-1"),
            raw("01-03-2024", "1", "ALTO", "0,5", ""),
            raw("01-03-2024", "1", "ALTO", "0,5", "   "),
        ]);
        assert_eq!(outcome.accepted(), 0);
        assert_eq!(outcome.total(), 3);
        assert_eq!(outcome.diagnostics.len(), 3);
        assert!(outcome
            .diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::MissingDateOrUnit));
        assert_eq!(outcome.diagnostics[1].row, 2);
    }

    #[test]
    fn bad_rainfall_defaults_to_zero() {
        let outcome = normalize(&[raw("01-03-2024", "mucha", "ALTO", "0,9", "UV-1")]);
        assert_eq!(outcome.accepted(), 1);
        assert_eq!(outcome.observations[0].rainfall_mm, 0.0);
        assert_eq!(
            outcome.diagnostics,
            vec![Diagnostic {
                row: 1,
                kind: DiagnosticKind::InvalidRainfall("mucha".to_string())
            }]
        );
        assert!(!outcome.diagnostics[0].kind.rejects_row());
    }

    #[test]
    fn empty_probability_defaults_to_zero() {
        let outcome = normalize(&[raw("01-03-2024", "3", "BAJO", "", "UV-1")]);
        assert_eq!(outcome.accepted(), 1);
        assert_eq!(outcome.observations[0].risk_probability, 0.0);
        assert_eq!(
            outcome.diagnostics[0].kind,
            DiagnosticKind::InvalidProbability(String::new())
        );
    }

    #[test]
    fn risk_tokens_are_case_insensitive() {
        let outcome = normalize(&[
            raw("01-03-2024", "1", " alto ", "0,5", "A"),
            raw("01-03-2024", "1", "ALTO", "0,5", "B"),
            raw("01-03-2024", "1", "Alto", "0,5", "C"),
        ]);
        assert_eq!(outcome.accepted(), 3);
        assert!(outcome
            .observations
            .iter()
            .all(|o| o.risk_level == RiskLevel::High));
    }

    #[test]
    fn unknown_risk_token_drops_row() {
        let outcome = normalize(&[
            raw("01-03-2024", "1", "MEDIO", "0,5", "A"),
            raw("01-03-2024", "1", "", "0,5", "B"),
            raw("01-03-2024", "1", "high", "0,5", "C"),
        ]);
        assert_eq!(outcome.accepted(), 0);
        assert_eq!(outcome.rejected(), 3);
        assert_eq!(
            outcome.diagnostics[0].kind,
            DiagnosticKind::UnknownRiskToken("MEDIO".to_string())
        );
        assert!(outcome.diagnostics.iter().all(|d| d.kind.rejects_row()));
    }

    #[test]
    fn unknown_risk_token_drops_row_even_with_other_problems() {
        let outcome = normalize(&[raw("01-03-2024", "x", "MEDIO", "0,5", "A")]);
        assert_eq!(outcome.accepted(), 0);
        assert_eq!(outcome.diagnostics.len(), 2);
        assert_eq!(
            outcome.diagnostics[1].kind,
            DiagnosticKind::UnknownRiskToken("MEDIO".to_string())
        );
    }

    #[test]
    fn invalid_date_drops_row_and_keeps_display_text() {
        let outcome = normalize(&[
            raw("31-02-2024", "1", "ALTO", "0,5", "A"),
            raw("2024-03-01", "1", "ALTO", "0,5", "B"),
            raw("1-3-2024", "1", "ALTO", "0,5", "C"),
        ]);
        assert_eq!(outcome.accepted(), 1);
        assert_eq!(outcome.observations[0].date_display, "1-3-2024");
        assert_eq!(
            outcome.diagnostics[0].kind,
            DiagnosticKind::InvalidDate("31-02-2024".to_string())
        );
    }

    #[test]
    fn trailing_text_after_numbers_and_dates_is_ignored() {
        let outcome = normalize(&[
            raw("01-03-2024", "15,5 mm", "ALTO", "0,75", "UV-7"),
            raw("01-03-2024 08:00", "3", "ALTO", "0,5", "UV-8"),
        ]);
        assert_eq!(outcome.accepted(), 2);
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.observations[0].rainfall_mm, 15.5);
        assert_eq!(outcome.observations[1].date, outcome.observations[0].date);
        assert_eq!(outcome.observations[1].date_display, "01-03-2024 08:00");
    }

    #[test]
    fn accepted_never_exceeds_total() {
        let outcome = normalize(&[
            raw("01-03-2024", "1", "ALTO", "0,5", "A"),
            raw("bad", "1", "ALTO", "0,5", "B"),
            raw("02-03-2024", "1", "BAJO", "0,1", "C"),
        ]);
        assert!(outcome.accepted() <= outcome.total());
        assert!(outcome
            .observations
            .iter()
            .all(|o| !o.unit_id.is_empty()));
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic {
            row: 4,
            kind: DiagnosticKind::UnknownRiskToken("MEDIO".to_string()),
        };
        assert_eq!(d.to_string(), "row 4: ignored, unknown risk token \"MEDIO\"");
    }
}
