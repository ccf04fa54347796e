//! Plain-text tables for the terminal.

use rrd_data::models::{
    ChronicEntry, CorrelationPoint, DashboardSnapshot, Headline, PriorityEntry,
};
use std::fmt::Write;

pub const NO_DATE_DATA: &str = "No hay datos para la fecha seleccionada";
pub const NO_CHRONIC_ALERTS: &str = "No hay alertas de alto riesgo en el periodo seleccionado";

pub fn render_headline(headline: Option<&Headline>) -> String {
    match headline {
        Some(h) => format!(
            "Unidad Vecinal con Maximo Riesgo: {} ({:.1}%, {})\n",
            h.unit_id,
            h.probability * 100.0,
            h.date
        ),
        None => "Unidad Vecinal con Maximo Riesgo: -\n".to_string(),
    }
}

pub fn render_priority(entries: &[PriorityEntry]) -> String {
    if entries.is_empty() {
        return format!("{}\n", NO_DATE_DATA);
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<16} {:>12} {:>12}  {}",
        "#", "Unidad", "Probabilidad", "Lluvia", "Riesgo"
    );
    for (idx, e) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<16} {:>11.1}% {:>9.2} mm  {}",
            idx + 1,
            e.unit_id,
            e.probability * 100.0,
            e.rainfall_mm,
            e.risk_level
        );
    }
    out
}

pub fn render_chronic(entries: &[ChronicEntry], period_months: u32) -> String {
    let mut out = format!("Alertas cronicas (ultimos {} meses)\n", period_months);
    if entries.is_empty() {
        out.push_str(NO_CHRONIC_ALERTS);
        out.push('\n');
        return out;
    }
    for e in entries {
        let _ = writeln!(
            out,
            "  {:<16} {:>4} alertas  {:>5.1}%",
            e.unit_id, e.count, e.percentage
        );
    }
    out
}

/// Rainfall vs probability, one line per observation.
pub fn render_correlation(points: &[CorrelationPoint]) -> String {
    let mut out = String::new();
    for p in points {
        let _ = writeln!(
            out,
            "  {:<16} {:>9.2} mm {:>6.1}%  {}",
            p.unit_id, p.rainfall_mm, p.probability_percent, p.risk_level
        );
    }
    out
}

pub fn render_snapshot(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Fecha de analisis: {}",
        snapshot.selected_date.as_deref().unwrap_or("-")
    );
    out.push_str(&render_headline(snapshot.headline.as_ref()));
    out.push('\n');
    let _ = writeln!(
        out,
        "Lista de Trabajo Priorizada ({} unidades)",
        snapshot.priority.len()
    );
    out.push_str(&render_priority(&snapshot.priority));
    out.push('\n');
    out.push_str(&render_chronic(&snapshot.chronic, snapshot.period_months));
    out.push('\n');
    let _ = writeln!(
        out,
        "Correlacion lluvia/probabilidad ({} observaciones)",
        snapshot.correlation.len()
    );
    out.push_str(&render_correlation(&snapshot.correlation));
    out
}
