//! In-memory dataset and derived views for rainfall risk predictions.
//!
//! This crate owns the single [`Dataset`] that a dashboard session works
//! against, plus the pure report functions computed from it.
//!
//! # Architecture
//!
//! - `store`: the sorted observation collection and the selected-date cursor
//! - `loader`: file/bytes -> records -> normalized observations -> store replace
//! - `report`: headline, priority ranking, chronic rollup and correlation pairs
//! - `models`: serializable view structs returned by `report`
//!
//! # Usage
//!
//! ```rust
//! use rrd_data::Dataset;
//!
//! let mut ds = Dataset::new();
//! let csv = "Fecha;Lluvia_Predicha_mm;Riesgo_Predicho;Probabilidad_Riesgo_Alto;Unidad_Vecinal\n\
//!            01-03-2024;15,5;ALTO;0,75;UV-7\n";
//! let summary = ds.load_reader(csv.as_bytes()).unwrap();
//! assert_eq!(summary.accepted, 1);
//!
//! let headline = ds.headline().unwrap();
//! assert_eq!(headline.unit_id, "UV-7");
//! ```
//!
//! Views are recomputed on every call; nothing is cached against the store.

pub mod loader;
pub mod models;
pub mod report;
pub mod store;

pub use loader::LoadSummary;
pub use models::HistoricalPeriod;
pub use store::{Dataset, Selection};
