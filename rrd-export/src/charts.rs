//! Chart payloads and chart lifecycle.
//!
//! Payloads are plain serializable structs; a [`ChartBackend`] turns them
//! into something visible. [`ChartSlot`] tracks whether its container holds a
//! live chart and destroys it before every redraw, so repeated filter changes
//! never stack charts on top of each other.

use rrd_core::observation::RiskLevel;
use rrd_data::models::{CorrelationPoint, PriorityEntry};
use serde::Serialize;
use std::path::PathBuf;

pub const RANKING_CHART_ID: &str = "riskComparisonChart";
pub const CORRELATION_CHART_ID: &str = "correlationChart";

const NO_DATE_DATA: &str = "No hay datos para la fecha seleccionada";
const NO_DATA: &str = "No hay datos para mostrar";

/// Horizontal bar chart of probabilities for the selected date.
///
/// Bars are ordered by probability ascending, so the riskiest unit ends up
/// at the top of a horizontal layout. `highlight` marks the first bar that
/// holds the maximum value.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankingChart {
    pub labels: Vec<String>,
    /// Probabilities in percent.
    pub values: Vec<f64>,
    pub highlight: Option<usize>,
}

impl RankingChart {
    pub fn from_ranking(ranking: &[PriorityEntry]) -> Self {
        let mut rows: Vec<&PriorityEntry> = ranking.iter().collect();
        rows.sort_by(|a, b| a.probability.total_cmp(&b.probability));

        let labels = rows.iter().map(|e| e.unit_id.clone()).collect();
        let values: Vec<f64> = rows.iter().map(|e| e.probability * 100.0).collect();
        let mut highlight: Option<usize> = None;
        for (idx, v) in values.iter().enumerate() {
            match highlight {
                Some(h) if *v <= values[h] => {}
                _ => highlight = Some(idx),
            }
        }
        Self {
            labels,
            values,
            highlight,
        }
    }
}

/// One scatter point of the rainfall/probability chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub color_class: &'static str,
}

impl From<&CorrelationPoint> for ScatterPoint {
    fn from(p: &CorrelationPoint) -> Self {
        ScatterPoint {
            x: p.rainfall_mm,
            y: p.probability_percent,
            color_class: match p.risk_level {
                RiskLevel::High => "high-risk",
                RiskLevel::Low => "low-risk",
            },
        }
    }
}

/// Anything a [`ChartSlot`] can draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Ranking(RankingChart),
    Correlation(Vec<ScatterPoint>),
}

impl Chart {
    pub fn correlation(points: &[CorrelationPoint]) -> Self {
        Chart::Correlation(points.iter().map(ScatterPoint::from).collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Chart::Ranking(r) => r.values.is_empty(),
            Chart::Correlation(points) => points.is_empty(),
        }
    }

    /// Text drawn in place of an empty chart.
    pub fn empty_message(&self) -> &'static str {
        match self {
            Chart::Ranking(_) => NO_DATE_DATA,
            Chart::Correlation(_) => NO_DATA,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            Chart::Ranking(r) => serde_json::to_string(r),
            Chart::Correlation(points) => serde_json::to_string(points),
        }
    }
}

/// Something that can put a chart into a named container and take it away.
pub trait ChartBackend {
    fn draw(&mut self, container_id: &str, payload_json: &str) -> anyhow::Result<()>;
    fn draw_message(&mut self, container_id: &str, message: &str) -> anyhow::Result<()>;
    fn destroy(&mut self, container_id: &str) -> anyhow::Result<()>;
}

/// One chart container and whether it currently holds something.
#[derive(Debug, Clone)]
pub struct ChartSlot {
    container_id: String,
    live: bool,
}

impl ChartSlot {
    pub fn new(container_id: &str) -> Self {
        Self {
            container_id: container_id.to_string(),
            live: false,
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Destroy whatever the slot holds, then draw `chart` (or its empty message).
    pub fn render<B: ChartBackend>(&mut self, backend: &mut B, chart: &Chart) -> anyhow::Result<()> {
        self.clear(backend)?;
        if chart.is_empty() {
            backend.draw_message(&self.container_id, chart.empty_message())?;
        } else {
            let payload = chart.to_json()?;
            log::debug!("charts: drawing {} ({} bytes)", self.container_id, payload.len());
            backend.draw(&self.container_id, &payload)?;
        }
        self.live = true;
        Ok(())
    }

    pub fn clear<B: ChartBackend>(&mut self, backend: &mut B) -> anyhow::Result<()> {
        if self.live {
            backend.destroy(&self.container_id)?;
            self.live = false;
        }
        Ok(())
    }
}

/// Writes each container as `<out_dir>/<container_id>.json`.
///
/// Charts are written as their payload; empty charts as `{"message": ...}`.
/// Destroying a chart deletes its file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    out_dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn path_for(&self, container_id: &str) -> PathBuf {
        self.out_dir.join(format!("{}.json", container_id))
    }
}

impl ChartBackend for JsonFileBackend {
    fn draw(&mut self, container_id: &str, payload_json: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.out_dir)?;
        std::fs::write(self.path_for(container_id), payload_json)?;
        Ok(())
    }

    fn draw_message(&mut self, container_id: &str, message: &str) -> anyhow::Result<()> {
        let payload = serde_json::json!({ "message": message }).to_string();
        self.draw(container_id, &payload)
    }

    fn destroy(&mut self, container_id: &str) -> anyhow::Result<()> {
        let path = self.path_for(container_id);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}
