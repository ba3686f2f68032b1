//! Report rendering: CSV for spreadsheets and a paginated PDF class report.
//!
//! Both renderers are pure functions over already-filtered records.

use anyhow::{anyhow, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::domain::models::record::RecordView;

pub const CSV_HEADERS: [&str; 8] = [
    "Tanggal", "NISN", "Siswa", "Kelas", "Aspek", "Aturan", "Poin", "Catatan",
];

/// Render records as CSV with a header row
pub fn records_to_csv(records: &[RecordView]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for record in records {
        writer.write_record([
            record.input_date.format("%Y-%m-%d").to_string(),
            record.student_nisn.clone().unwrap_or_default(),
            record.student_name.clone(),
            record.class_name.clone().unwrap_or_default(),
            record.aspect_name.clone().unwrap_or_default(),
            record.rule_name.clone().unwrap_or_default(),
            record.point.to_string(),
            record.note.clone().unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to finish CSV export: {}", e))
}

// A4 portrait, in points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_LEFT: f32 = 40.0;
const TITLE_Y: f32 = 800.0;
const HEADER_Y: f32 = 770.0;
const FIRST_ROW_Y: f32 = 752.0;
const ROW_HEIGHT: f32 = 14.0;
const ROWS_PER_PAGE: usize = 48;
const FONT_SIZE: i64 = 9;

/// (heading, x offset, max characters)
const PDF_COLUMNS: [(&str, f32, usize); 6] = [
    ("Tanggal", 0.0, 10),
    ("NISN", 62.0, 12),
    ("Siswa", 135.0, 28),
    ("Aspek", 290.0, 18),
    ("Aturan", 395.0, 22),
    ("Poin", 500.0, 6),
];

/// Render the class report PDF titled `Laporan Poin Kelas {class_name}`
pub fn records_to_pdf(class_name: &str, records: &[RecordView]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
            "F2" => bold_id,
        },
    });

    let title = format!("Laporan Poin Kelas {}", class_name);
    let total: i64 = records.iter().map(|r| r.point).sum();

    // An empty report still gets one page with the title and headings
    let chunks: Vec<&[RecordView]> = if records.is_empty() {
        vec![records]
    } else {
        records.chunks(ROWS_PER_PAGE).collect()
    };
    let page_count = chunks.len();

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(page_count);
    for (index, chunk) in chunks.iter().enumerate() {
        let mut ops = Vec::new();
        text(&mut ops, "F2", 14, MARGIN_LEFT, TITLE_Y, &title);

        for (heading, x, _) in PDF_COLUMNS {
            text(&mut ops, "F2", FONT_SIZE, MARGIN_LEFT + x, HEADER_Y, heading);
        }
        ops.push(Operation::new("m", vec![MARGIN_LEFT.into(), (HEADER_Y - 4.0).into()]));
        ops.push(Operation::new(
            "l",
            vec![(PAGE_WIDTH as f32 - MARGIN_LEFT).into(), (HEADER_Y - 4.0).into()],
        ));
        ops.push(Operation::new("S", vec![]));

        let mut y = FIRST_ROW_Y;
        for record in chunk.iter() {
            let cells = [
                record.input_date.format("%d-%m-%Y").to_string(),
                record.student_nisn.clone().unwrap_or_else(|| "-".to_string()),
                record.student_name.clone(),
                record.aspect_name.clone().unwrap_or_else(|| "-".to_string()),
                record.rule_name.clone().unwrap_or_else(|| "-".to_string()),
                record.point.to_string(),
            ];
            for ((_, x, width), cell) in PDF_COLUMNS.iter().zip(cells.iter()) {
                text(&mut ops, "F1", FONT_SIZE, MARGIN_LEFT + x, y, &truncate(cell, *width));
            }
            y -= ROW_HEIGHT;
        }

        if index + 1 == page_count {
            let summary = format!("Jumlah catatan: {}    Total poin: {}", records.len(), total);
            text(&mut ops, "F2", FONT_SIZE, MARGIN_LEFT, y - ROW_HEIGHT, &summary);
        }
        let footer = format!("Halaman {} / {}", index + 1, page_count);
        text(&mut ops, "F1", 8, MARGIN_LEFT, 30.0, &footer);

        let content = Content { operations: ops };
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
        "Kids" => page_ids.iter().map(|id| Object::from(*id)).collect::<Vec<_>>(),
        "Count" => page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn text(ops: &mut Vec<Operation>, font: &str, size: i64, x: f32, y: f32, value: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(value), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

/// The standard fonts only cover Latin-1; anything else prints as '?'
fn win_ansi(value: &str) -> Vec<u8> {
    value
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(student: &str, point: i64, note: Option<&str>) -> RecordView {
        RecordView {
            id: format!("r-{}", student),
            student_id: student.to_string(),
            student_name: student.to_string(),
            student_nisn: Some("0051234567".to_string()),
            class_id: Some("c1".to_string()),
            class_name: Some("X-1".to_string()),
            aspect_id: Some("a1".to_string()),
            aspect_name: Some("Kehadiran".to_string()),
            aspect_polarity: None,
            rule_id: None,
            rule_name: None,
            point,
            input_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            note: note.map(str::to_string),
            input_by: None,
            created_at: "2025-01-06T07:45:00Z".to_string(),
        }
    }

    #[test]
    fn test_csv_has_headers_and_quotes_notes() {
        let bytes =
            records_to_csv(&[record("Ani", -3, Some("Hadir jam 07:45, terlambat"))]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Tanggal,NISN,Siswa,Kelas,Aspek,Aturan,Poin,Catatan")
        );
        assert_eq!(
            lines.next(),
            Some("2025-01-06,0051234567,Ani,X-1,Kehadiran,,-3,\"Hadir jam 07:45, terlambat\"")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_for_no_records_is_just_headers() {
        let text = String::from_utf8(records_to_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_pdf_paginates_and_carries_title() {
        let records: Vec<RecordView> = (0..(ROWS_PER_PAGE + 3))
            .map(|i| record(&format!("Siswa {}", i), -1, None))
            .collect();
        let bytes = records_to_pdf("X-1", &records).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);

        let first_page = pages[&1];
        let content = doc.get_page_content(first_page).unwrap();
        let content = String::from_utf8_lossy(&content);
        assert!(content.contains("Laporan Poin Kelas X-1"));
        assert!(content.contains("Halaman 1 / 2"));
    }

    #[test]
    fn test_empty_pdf_has_one_page() {
        let bytes = records_to_pdf("XII IPA 3", &[]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_text_helpers() {
        assert_eq!(truncate("Ani", 10), "Ani");
        assert_eq!(truncate("Muhammad Rizky Pratama", 8), "Muhamma~");
        assert_eq!(win_ansi("Café ✓"), vec![b'C', b'a', b'f', 0xE9, b' ', b'?']);
    }
}
