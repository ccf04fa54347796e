//! PDF risk report.
//!
//! The report is laid out first as pages of positioned text (millimetres on
//! an A4 page, origin at the top-left), then rendered with `lopdf`. Keeping
//! the layout separate lets pagination be tested without parsing PDFs.

use crate::ExportError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use rrd_data::models::{Headline, PriorityEntry};
use rrd_data::Dataset;
use rrd_utils::dates::file_token;
use std::path::{Path, PathBuf};

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

/// First worklist row on the first page.
pub const ROW_START_Y: f64 = 95.0;
pub const ROW_STEP: f64 = 7.0;
/// A row that would be drawn below this starts a new page instead.
pub const ROW_LIMIT_Y: f64 = 270.0;
/// Top margin of continuation pages.
pub const PAGE_TOP_Y: f64 = 20.0;

const TITLE: &str = "Informe de Riesgo - Camaras de Aguas Lluvias";
const MM_TO_PT: f64 = 72.0 / 25.4;

/// A line of text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub x: f64,
    pub y: f64,
    pub size: u8,
    pub text: String,
}

impl TextItem {
    fn new(x: f64, y: f64, size: u8, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            size,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportLayout {
    pub pages: Vec<Vec<TextItem>>,
}

/// `Riesgo_Camaras_<date>.pdf` with every `-` of the date turned into `_`.
pub fn report_file_name(date_display: &str) -> String {
    format!("Riesgo_Camaras_{}.pdf", file_token(date_display))
}

/// Lay out the report: title, analysis date, headline and the numbered
/// worklist, paginating the worklist as needed.
pub fn layout_report(
    date_display: &str,
    headline: Option<&Headline>,
    ranking: &[PriorityEntry],
) -> ReportLayout {
    let mut page = vec![
        TextItem::new(20.0, 20.0, 18, TITLE),
        TextItem::new(20.0, 35.0, 12, format!("Fecha de analisis: {}", date_display)),
        TextItem::new(20.0, 50.0, 14, "Unidad Vecinal con Maximo Riesgo:"),
        TextItem::new(
            20.0,
            60.0,
            12,
            match headline {
                Some(h) => format!("{} - {:.1}%", h.unit_id, h.probability * 100.0),
                None => "-".to_string(),
            },
        ),
        TextItem::new(20.0, 80.0, 14, "Lista de Trabajo Priorizada:"),
    ];
    let mut pages = Vec::new();

    let mut y = ROW_START_Y;
    for (idx, entry) in ranking.iter().enumerate() {
        if y > ROW_LIMIT_Y {
            pages.push(std::mem::take(&mut page));
            y = PAGE_TOP_Y;
        }
        page.push(TextItem::new(25.0, y, 10, format!("{}. {}", idx + 1, entry.unit_id)));
        page.push(TextItem::new(120.0, y, 10, format!("{:.1}%", entry.probability * 100.0)));
        page.push(TextItem::new(150.0, y, 10, format!("{:.2} mm", entry.rainfall_mm)));
        page.push(TextItem::new(180.0, y, 10, entry.risk_level.as_str()));
        y += ROW_STEP;
    }
    pages.push(page);

    ReportLayout { pages }
}

/// Lay out the report for the dataset's current selection.
///
/// A selection that is not a calendar date has nothing to report.
pub fn layout_for(ds: &Dataset) -> Result<(String, ReportLayout), ExportError> {
    if !ds.is_loaded() || ds.is_empty() {
        return Err(ExportError::NoData);
    }
    let selection = ds
        .current_selection()
        .filter(|s| s.date.is_some())
        .ok_or(ExportError::NoData)?;
    let headline = ds.headline();
    let ranking = ds.priority_ranking();
    Ok((
        selection.display.clone(),
        layout_report(&selection.display, headline.as_ref(), &ranking),
    ))
}

/// Write the report for the current selection into `out_dir`.
///
/// Refused with [`ExportError::NoData`] before touching the filesystem when
/// nothing is loaded or selected.
pub fn export_report(ds: &Dataset, out_dir: &Path) -> anyhow::Result<PathBuf> {
    let (date_display, layout) = layout_for(ds)?;
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(report_file_name(&date_display));
    let mut doc = render_document(&layout)?;
    doc.save(&path)?;
    log::info!(
        "pdf: wrote {} ({} pages)",
        path.display(),
        layout.pages.len()
    );
    Ok(path)
}

/// Render a layout into a PDF document with one Helvetica font.
pub fn render_document(layout: &ReportLayout) -> anyhow::Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(layout.pages.len());
    for items in &layout.pages {
        let content = Content {
            operations: page_operations(items),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
        "Count" => Object::Integer(page_ids.len() as i64),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(to_points(PAGE_WIDTH_MM)),
            Object::Real(to_points(PAGE_HEIGHT_MM)),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    Ok(doc)
}

fn page_operations(items: &[TextItem]) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(items.len() * 5);
    for item in items {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec!["F1".into(), Object::Integer(item.size as i64)],
        ));
        ops.push(Operation::new(
            "Td",
            vec![
                Object::Real(to_points(item.x)),
                Object::Real(to_points(PAGE_HEIGHT_MM - item.y)),
            ],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi_bytes(&item.text))],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

fn to_points(mm: f64) -> f32 {
    (mm * MM_TO_PT) as f32
}

/// Encode text for a WinAnsiEncoding font (Windows-1252). Characters the
/// encoding cannot express become '?'.
fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c as u32 {
        0x00..=0x7F | 0xA0..=0xFF => c as u32 as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        // C1 controls have no glyph in WinAnsi
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rrd_core::observation::RiskLevel;

    fn entry(unit: &str, probability: f64, risk_level: RiskLevel) -> PriorityEntry {
        PriorityEntry {
            unit_id: unit.to_string(),
            probability,
            rainfall_mm: 15.5,
            risk_level,
        }
    }

    fn headline() -> Headline {
        Headline {
            unit_id: "UV-7".to_string(),
            probability: 0.75,
            date: "01-03-2024".to_string(),
        }
    }

    #[test]
    fn file_name_normalizes_separators() {
        assert_eq!(report_file_name("01-03-2024"), "Riesgo_Camaras_01_03_2024.pdf");
    }

    #[test]
    fn layout_single_page() {
        let ranking = vec![
            entry("UV-7", 0.75, RiskLevel::High),
            entry("UV-3", 0.05, RiskLevel::Low),
        ];
        let h = headline();
        let layout = layout_report("01-03-2024", Some(&h), &ranking);
        assert_eq!(layout.pages.len(), 1);

        let page = &layout.pages[0];
        assert_eq!(page[1].text, "Fecha de analisis: 01-03-2024");
        assert_eq!(page[3].text, "UV-7 - 75.0%");

        let rows: Vec<&TextItem> = page.iter().filter(|t| t.size == 10).collect();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].text, "1. UV-7");
        assert_eq!(rows[0].y, ROW_START_Y);
        assert_eq!(rows[1].text, "75.0%");
        assert_eq!(rows[2].text, "15.50 mm");
        assert_eq!(rows[3].text, "ALTO");
        assert_eq!(rows[4].text, "2. UV-3");
        assert_eq!(rows[4].y, ROW_START_Y + ROW_STEP);
        assert_eq!(rows[7].text, "BAJO");
    }

    #[test]
    fn layout_without_headline() {
        let layout = layout_report("05-05-2025", None, &[]);
        assert_eq!(layout.pages.len(), 1);
        assert_eq!(layout.pages[0][3].text, "-");
        assert_eq!(layout.pages[0].len(), 5);
    }

    #[test]
    fn layout_paginates_long_worklists() {
        // Rows at 95, 102, ..., 270 fit on the first page: 26 rows.
        let ranking: Vec<PriorityEntry> = (0..30)
            .map(|i| entry(&format!("UV-{}", i), 0.5, RiskLevel::Low))
            .collect();
        let layout = layout_report("01-03-2024", None, &ranking);
        assert_eq!(layout.pages.len(), 2);

        let first_rows = layout.pages[0].iter().filter(|t| t.x == 25.0).count();
        assert_eq!(first_rows, 26);
        let second = &layout.pages[1];
        assert_eq!(second[0].text, "27. UV-26");
        assert_eq!(second[0].y, PAGE_TOP_Y);
        assert_eq!(second.len(), 4 * 4);
    }

    #[test]
    fn export_refused_without_data() {
        let ds = Dataset::new();
        let dir = std::env::temp_dir().join(format!("rrd-pdf-refused-{}", std::process::id()));
        let err = export_report(&ds, &dir).unwrap_err();
        assert_eq!(err.downcast_ref::<ExportError>(), Some(&ExportError::NoData));
        assert!(!dir.exists());
    }

    #[test]
    fn export_refused_for_selection_that_is_not_a_date() {
        let mut ds = Dataset::new();
        let csv = "Fecha;Lluvia_Predicha_mm;Riesgo_Predicho;Probabilidad_Riesgo_Alto;Unidad_Vecinal\n\
                   01-03-2024;15,5;ALTO;0,75;UV-7\n";
        ds.load_reader(csv.as_bytes()).unwrap();
        let dir = std::env::temp_dir().join(format!("rrd-pdf-nodate-{}", std::process::id()));

        for bad in ["../x", "01/03/2024"] {
            ds.select(bad);
            let err = export_report(&ds, &dir).unwrap_err();
            assert_eq!(err.downcast_ref::<ExportError>(), Some(&ExportError::NoData));
        }
        assert!(!dir.exists());
        assert_eq!(report_file_name("../x"), "Riesgo_Camaras____x.pdf");
    }

    #[test]
    fn export_writes_pdf() {
        let mut ds = Dataset::new();
        let csv = "Fecha;Lluvia_Predicha_mm;Riesgo_Predicho;Probabilidad_Riesgo_Alto;Unidad_Vecinal\n\
                   01-03-2024;15,5;ALTO;0,75;UV-7\n";
        ds.load_reader(csv.as_bytes()).unwrap();

        let dir = std::env::temp_dir().join(format!("rrd-pdf-{}", std::process::id()));
        let path = export_report(&ds, &dir).unwrap();
        assert_eq!(path.file_name().unwrap(), "Riesgo_Camaras_01_03_2024.pdf");
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn non_latin1_text_is_replaced() {
        assert_eq!(win_ansi_bytes("Ñuñoa"), vec![0xD1, b'u', 0xF1, b'o', b'a']);
        assert_eq!(win_ansi_bytes("UV→7"), b"UV?7".to_vec());
    }

    #[test]
    fn windows_1252_extras_are_encoded() {
        assert_eq!(
            win_ansi_bytes("\u{20AC}5 \u{201C}UV\u{201D}"),
            vec![0x80, b'5', b' ', 0x93, b'U', b'V', 0x94]
        );
        assert_eq!(win_ansi_bytes("\u{0153}\u{2122}"), vec![0x9C, 0x99]);
        assert_eq!(win_ansi_bytes("a\u{0085}b\u{009F}"), b"a?b?".to_vec());
    }
}
