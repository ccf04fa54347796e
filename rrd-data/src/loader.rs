//! Loading prediction files into the [`Dataset`].
//!
//! A load either fully succeeds, replacing the store, or fails with a
//! [`LoadError`] and leaves the previous dataset untouched.
//!
//! # Input format
//!
//! Semicolon-delimited with headers:
//! `Fecha;Lluvia_Predicha_mm;Riesgo_Predicho;Probabilidad_Riesgo_Alto;Unidad_Vecinal`
//!
//! ```text
//! Fecha;Lluvia_Predicha_mm;Riesgo_Predicho;Probabilidad_Riesgo_Alto;Unidad_Vecinal
//! 01-03-2024;15,5;ALTO;0,75;UV-7
//! ```
//!
//! Paths ending in `.gz` are decompressed on the fly.

use crate::Dataset;
use flate2::read::GzDecoder;
use rrd_core::error::LoadError;
use rrd_core::normalize::{normalize, Diagnostic};
use rrd_core::record::read_records;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// What a successful load accepted. Only the counts are meant for end users;
/// `diagnostics` are for logs and tests.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub accepted: usize,
    pub total: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadSummary {
    /// "N de M registros procesados"
    pub fn message(&self) -> String {
        format!(
            "Archivo cargado exitosamente: {} de {} registros procesados",
            self.accepted, self.total
        )
    }
}

/// Open a prediction file, transparently un-gzipping `*.gz` paths.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>, LoadError> {
    let file = BufReader::new(File::open(path)?);
    let gzipped = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);
    if gzipped {
        log::debug!("loader: decompressing {}", path.display());
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

impl Dataset {
    /// Load a prediction file from disk.
    pub fn load_path(&mut self, path: &Path) -> Result<LoadSummary, LoadError> {
        log::info!("loader: reading {}", path.display());
        let reader = open_input(path)?;
        self.load_reader(reader)
    }

    /// Load prediction CSV from any reader.
    ///
    /// Structural parse errors, an empty file or missing required columns
    /// reject the whole upload. Row-level problems only produce diagnostics.
    pub fn load_reader<R: Read>(&mut self, reader: R) -> Result<LoadSummary, LoadError> {
        let records = read_records(reader)?;
        let outcome = normalize(&records);
        let summary = LoadSummary {
            accepted: outcome.accepted(),
            total: outcome.total(),
            diagnostics: outcome.diagnostics,
        };
        self.load(outcome.observations);
        log::info!(
            "loader: Loaded {} observations, skipped {}",
            summary.accepted,
            summary.total - summary.accepted
        );
        Ok(summary)
    }
}
