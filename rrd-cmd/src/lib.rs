//! Command implementations for the RRD CLI.
//!
//! Each subcommand loads one prediction file, applies the selections given
//! as flags and hands the resulting views to a renderer: text tables,
//! JSON, chart payload files or the PDF report.

use clap::Subcommand;
use rrd_data::HistoricalPeriod;
use std::path::PathBuf;

pub mod render;
pub mod session;

#[derive(Subcommand)]
pub enum Command {
    /// Print the dashboard views for one date
    Summary {
        /// Prediction file (semicolon-delimited CSV, optionally .gz)
        #[arg(short, long)]
        input: PathBuf,

        /// Date to report on (DD-MM-YYYY); defaults to the most recent date in the file
        #[arg(short, long)]
        date: Option<String>,

        /// Trailing window for the chronic rollup, in months (1, 3, 6 or 12)
        #[arg(short, long, default_value = "3")]
        period: HistoricalPeriod,

        /// Anchor of the chronic window (DD-MM-YYYY, midnight); defaults to now
        #[arg(long)]
        reference_date: Option<String>,

        /// Print the views as JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// List the dates available in a prediction file, most recent first
    Dates {
        /// Prediction file (semicolon-delimited CSV, optionally .gz)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write the ranking and correlation chart payloads as JSON files
    Charts {
        /// Prediction file (semicolon-delimited CSV, optionally .gz)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory receiving one JSON file per chart
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Date to chart (DD-MM-YYYY); defaults to the most recent date in the file
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Export the risk report for one date as PDF
    Export {
        /// Prediction file (semicolon-delimited CSV, optionally .gz)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory receiving Riesgo_Camaras_<date>.pdf
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Date to export (DD-MM-YYYY); defaults to the most recent date in the file
        #[arg(short, long)]
        date: Option<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Summary {
            input,
            date,
            period,
            reference_date,
            json,
        } => session::run_summary(&input, date.as_deref(), period, reference_date.as_deref(), json),
        Command::Dates { input } => session::run_dates(&input),
        Command::Charts {
            input,
            out_dir,
            date,
        } => session::run_charts(&input, &out_dir, date.as_deref()),
        Command::Export {
            input,
            out_dir,
            date,
        } => session::run_export(&input, &out_dir, date.as_deref()),
    }
}
