//! The dataset store: canonical observations plus the selected-date cursor.

use chrono::NaiveDate;
use rrd_core::observation::Observation;
use rrd_utils::dates::parse_display_date;
use serde::Serialize;

/// The date a user picked from the date selector.
///
/// Keeps the text as picked (used for titles and file names) and the
/// calendar date it denotes. Rows are matched on the calendar date, so a
/// selection whose text is not a valid date matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub display: String,
    pub date: Option<NaiveDate>,
}

impl Selection {
    pub fn new(display: &str) -> Self {
        Self {
            display: display.to_string(),
            date: parse_display_date(display).ok(),
        }
    }

    pub fn matches(&self, obs: &Observation) -> bool {
        self.date == Some(obs.date)
    }
}

/// Holds the observations of the last successful upload, most recent first.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    observations: Vec<Observation>,
    available_dates: Vec<String>,
    selection: Option<Selection>,
    loaded: bool,
}

impl Dataset {
    /// Create an empty store. Nothing is selected and exports are refused
    /// until the first successful load.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole dataset.
    ///
    /// Observations are stably sorted by date, most recent first, the list of
    /// available dates is rebuilt and the most recent date becomes the
    /// selection (none when `observations` is empty).
    pub fn load(&mut self, mut observations: Vec<Observation>) {
        observations.sort_by(|a, b| b.date.cmp(&a.date));

        let mut available_dates: Vec<String> = Vec::new();
        for obs in &observations {
            if !available_dates.contains(&obs.date_display) {
                available_dates.push(obs.date_display.clone());
            }
        }

        self.selection = observations
            .first()
            .map(|obs| Selection::new(&obs.date_display));
        self.observations = observations;
        self.available_dates = available_dates;
        self.loaded = true;
        log::info!(
            "store: loaded {} observations over {} dates, selected {:?}",
            self.observations.len(),
            self.available_dates.len(),
            self.selection.as_ref().map(|s| s.display.as_str())
        );
    }

    /// Distinct display dates, most recent first.
    pub fn available_dates(&self) -> &[String] {
        &self.available_dates
    }

    /// Move the cursor. The date does not have to be one of
    /// [`available_dates`](Self::available_dates); an absent date simply
    /// produces empty date-filtered views.
    pub fn select(&mut self, date: &str) {
        log::debug!("store: select {:?}", date);
        self.selection = Some(Selection::new(date));
    }

    pub fn current_selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// True once a load has completed, even if it produced no observations.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}
