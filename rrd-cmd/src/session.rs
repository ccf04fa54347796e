//! Load-then-render flows behind each subcommand.

use crate::render;
use anyhow::Context;
use chrono::{Local, NaiveDateTime, NaiveTime};
use log::info;
use rrd_data::{Dataset, HistoricalPeriod, LoadSummary};
use rrd_export::charts::{
    Chart, ChartSlot, JsonFileBackend, RankingChart, CORRELATION_CHART_ID, RANKING_CHART_ID,
};
use rrd_export::pdf;
use rrd_utils::dates::parse_display_date;
use std::path::Path;

/// Load `input` into a fresh dataset and apply the optional date selection.
pub fn open_dataset(input: &Path, date: Option<&str>) -> anyhow::Result<(Dataset, LoadSummary)> {
    let mut ds = Dataset::new();
    let summary = ds
        .load_path(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    if let Some(date) = date {
        if !ds.available_dates().iter().any(|d| d == date) {
            info!("Date {} is not present in {}", date, input.display());
        }
        ds.select(date);
    }
    Ok((ds, summary))
}

/// Midnight of `reference_date`, or the local current time.
pub fn reference_instant(reference_date: Option<&str>) -> anyhow::Result<NaiveDateTime> {
    match reference_date {
        Some(s) => {
            let date = parse_display_date(s)
                .with_context(|| format!("invalid --reference-date {:?}", s))?;
            Ok(date.and_time(NaiveTime::MIN))
        }
        None => Ok(Local::now().naive_local()),
    }
}

pub fn run_summary(
    input: &Path,
    date: Option<&str>,
    period: HistoricalPeriod,
    reference_date: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let reference = reference_instant(reference_date)?;
    let (ds, summary) = open_dataset(input, date)?;
    let snapshot = ds.snapshot(period, reference);

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", summary.message());
        print!("{}", render::render_snapshot(&snapshot));
    }
    Ok(())
}

pub fn run_dates(input: &Path) -> anyhow::Result<()> {
    let (ds, summary) = open_dataset(input, None)?;
    println!("{}", summary.message());
    for date in ds.available_dates() {
        println!("{}", date);
    }
    Ok(())
}

/// Render both charts into `out_dir` through the JSON file backend.
pub fn run_charts(input: &Path, out_dir: &Path, date: Option<&str>) -> anyhow::Result<()> {
    let (ds, _) = open_dataset(input, date)?;
    let mut backend = JsonFileBackend::new(out_dir);

    let mut ranking_slot = ChartSlot::new(RANKING_CHART_ID);
    let ranking = Chart::Ranking(RankingChart::from_ranking(&ds.priority_ranking()));
    ranking_slot.render(&mut backend, &ranking)?;

    let mut correlation_slot = ChartSlot::new(CORRELATION_CHART_ID);
    let correlation = Chart::correlation(&ds.correlation_pairs());
    correlation_slot.render(&mut backend, &correlation)?;

    info!(
        "Charts written to {} ({}, {})",
        out_dir.display(),
        backend.path_for(RANKING_CHART_ID).display(),
        backend.path_for(CORRELATION_CHART_ID).display()
    );
    Ok(())
}

pub fn run_export(input: &Path, out_dir: &Path, date: Option<&str>) -> anyhow::Result<()> {
    let (ds, _) = open_dataset(input, date)?;
    let path = pdf::export_report(&ds, out_dir)?;
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const CSV: &str = "\
Fecha;Lluvia_Predicha_mm;Riesgo_Predicho;Probabilidad_Riesgo_Alto;Unidad_Vecinal
01-03-2024;15,5;ALTO;0,75;UV-7
01-03-2024;2,0;BAJO;0,05;UV-3
28-02-2024;30,1;ALTO;0,91;UV-7
";

    fn write_input(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("rrd-cmd-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("predicciones.csv");
        std::fs::write(&path, CSV).unwrap();
        path
    }

    #[test]
    fn reference_instant_from_flag_is_midnight() {
        let instant = reference_instant(Some("01-03-2024")).unwrap();
        assert_eq!(
            instant,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
        assert!(reference_instant(Some("2024-03-01")).is_err());
    }

    #[test]
    fn open_dataset_applies_selection() {
        let input = write_input("select");
        let (ds, summary) = open_dataset(&input, Some("28-02-2024")).unwrap();
        assert_eq!(summary.accepted, 3);
        assert_eq!(ds.headline().unwrap().probability, 0.91);

        let (ds, _) = open_dataset(&input, None).unwrap();
        assert_eq!(ds.current_selection().unwrap().display, "01-03-2024");
        std::fs::remove_dir_all(input.parent().unwrap()).unwrap();
    }

    #[test]
    fn open_dataset_reports_missing_file() {
        let missing = std::env::temp_dir().join("rrd-cmd-missing").join("nada.csv");
        let err = open_dataset(&missing, None).unwrap_err();
        assert!(err.to_string().contains("failed to load"));
    }

    #[test]
    fn charts_and_export_write_files() {
        let input = write_input("files");
        let out = input.parent().unwrap().join("out");

        run_charts(&input, &out, None).unwrap();
        let ranking = std::fs::read_to_string(out.join("riskComparisonChart.json")).unwrap();
        assert_eq!(ranking, r#"{"labels":["UV-3","UV-7"],"values":[5.0,75.0],"highlight":1}"#);
        assert!(out.join("correlationChart.json").exists());

        run_charts(&input, &out, Some("10-10-2030")).unwrap();
        let empty = std::fs::read_to_string(out.join("riskComparisonChart.json")).unwrap();
        assert!(empty.contains("No hay datos para la fecha seleccionada"));

        run_export(&input, &out, Some("28-02-2024")).unwrap();
        assert!(out.join("Riesgo_Camaras_28_02_2024.pdf").exists());

        std::fs::remove_dir_all(input.parent().unwrap()).unwrap();
    }
}
