//! Derived report views.
//!
//! Every function here is a pure function of its arguments: it reads a slice
//! of observations (normally [`Dataset::observations`]) and returns a fresh
//! view. The `impl Dataset` block at the bottom only wires the store's state
//! into these functions.

use crate::models::{
    ChronicEntry, CorrelationPoint, DashboardSnapshot, Headline, HistoricalPeriod, PriorityEntry,
};
use crate::store::{Dataset, Selection};
use chrono::{NaiveDateTime, NaiveTime};
use rrd_core::observation::Observation;
use rrd_utils::dates::months_before;
use std::collections::HashMap;

/// Highest-probability observation for the selected date.
///
/// On exact ties the first row in store order wins. Returns `None` when no
/// row matches the selection.
pub fn headline(observations: &[Observation], selected: &Selection) -> Option<Headline> {
    let mut best: Option<&Observation> = None;
    for obs in observations.iter().filter(|o| selected.matches(o)) {
        match best {
            Some(b) if obs.risk_probability <= b.risk_probability => {}
            _ => best = Some(obs),
        }
    }
    best.map(|obs| Headline {
        unit_id: obs.unit_id.clone(),
        probability: obs.risk_probability,
        date: obs.date_display.clone(),
    })
}

/// Observations for the selected date ordered by probability, highest first.
///
/// The sort is stable, so rows with equal probability keep store order and
/// repeated calls return the same sequence.
pub fn priority_ranking(observations: &[Observation], selected: &Selection) -> Vec<PriorityEntry> {
    let mut rows: Vec<&Observation> = observations.iter().filter(|o| selected.matches(o)).collect();
    rows.sort_by(|a, b| b.risk_probability.total_cmp(&a.risk_probability));
    rows.into_iter()
        .map(|obs| PriorityEntry {
            unit_id: obs.unit_id.clone(),
            probability: obs.risk_probability,
            rainfall_mm: obs.rainfall_mm,
            risk_level: obs.risk_level,
        })
        .collect()
}

/// Per-unit count of high-risk observations dated on or after
/// `reference - period_months`.
///
/// Observation dates count as midnight, so with a reference carrying a time
/// of day the cutoff day itself falls outside the window. Percentages are
/// shares of the filtered total, rounded to one decimal. Units are ordered by
/// count descending, ties in order of first appearance.
pub fn chronic_rollup(
    observations: &[Observation],
    period_months: u32,
    reference: NaiveDateTime,
) -> Vec<ChronicEntry> {
    let cutoff = months_before(reference, period_months).unwrap_or(NaiveDateTime::MIN);

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut total = 0usize;
    for obs in observations {
        if !obs.risk_level.is_high() || obs.date.and_time(NaiveTime::MIN) < cutoff {
            continue;
        }
        total += 1;
        let slot = *index.entry(obs.unit_id.as_str()).or_insert_with(|| {
            counts.push((obs.unit_id.as_str(), 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let results: Vec<ChronicEntry> = counts
        .into_iter()
        .map(|(unit_id, count)| ChronicEntry {
            unit_id: unit_id.to_string(),
            count,
            percentage: round_one_decimal(count as f64 / total as f64 * 100.0),
        })
        .collect();
    log::info!(
        "report: chronic_rollup over {} months since {} -> {} units, {} alerts",
        period_months,
        cutoff,
        results.len(),
        total
    );
    results
}

/// One scatter point per observation, regardless of the selected date.
pub fn correlation_pairs(observations: &[Observation]) -> Vec<CorrelationPoint> {
    observations
        .iter()
        .map(|obs| CorrelationPoint {
            rainfall_mm: obs.rainfall_mm,
            probability_percent: obs.probability_percent(),
            risk_level: obs.risk_level,
            unit_id: obs.unit_id.clone(),
        })
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl Dataset {
    /// [`headline`] for the current selection.
    pub fn headline(&self) -> Option<Headline> {
        self.current_selection()
            .and_then(|selected| headline(self.observations(), selected))
    }

    /// [`priority_ranking`] for the current selection.
    pub fn priority_ranking(&self) -> Vec<PriorityEntry> {
        self.current_selection()
            .map(|selected| priority_ranking(self.observations(), selected))
            .unwrap_or_default()
    }

    pub fn chronic_rollup(
        &self,
        period: HistoricalPeriod,
        reference: NaiveDateTime,
    ) -> Vec<ChronicEntry> {
        chronic_rollup(self.observations(), period.months(), reference)
    }

    pub fn correlation_pairs(&self) -> Vec<CorrelationPoint> {
        correlation_pairs(self.observations())
    }

    /// Compute every view for the current state in one go.
    pub fn snapshot(&self, period: HistoricalPeriod, reference: NaiveDateTime) -> DashboardSnapshot {
        DashboardSnapshot {
            selected_date: self.current_selection().map(|s| s.display.clone()),
            period_months: period.months(),
            reference,
            total_observations: self.len(),
            headline: self.headline(),
            priority: self.priority_ranking(),
            chronic: self.chronic_rollup(period, reference),
            correlation: self.correlation_pairs(),
        }
    }
}
