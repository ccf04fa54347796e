//! Presentation side of the rainfall risk dashboard.
//!
//! This crate provides:
//! - `charts`: chart payloads built from report views, and a `ChartSlot`
//!   that disposes the previous chart before drawing a new one
//! - `pdf`: page layout of the risk report and its rendering with `lopdf`
//!
//! Nothing here computes aggregates; it only reshapes `rrd-data` views.

pub mod charts;
pub mod pdf;

use std::fmt;

/// Exports are refused before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// No dataset loaded or no date selected.
    NoData,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NoData => write!(f, "No hay datos para exportar"),
        }
    }
}

impl std::error::Error for ExportError {}
