//! Core types for rainfall risk predictions.
//!
//! - `record`: reads the semicolon-delimited prediction file into raw records
//! - `normalize`: validates raw records into canonical [`observation::Observation`]s
//! - `error`: upload-level failures

pub mod error;
pub mod normalize;
pub mod observation;
pub mod record;
