#![cfg(feature = "excel_test_writer")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use gemstone_ingest::error::IngestError;
use gemstone_ingest::persist::MemoryStore;
use gemstone_ingest::pipeline::{ingest_from_path, IngestOptions};
use gemstone_ingest::validate::DefaultPolicy;

const OWNER: &str = "vendor-17";

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("gemstone-ingest-{name}-{nanos}.xlsx"))
}

fn options() -> IngestOptions {
    IngestOptions {
        default_policy: DefaultPolicy::Silent,
        ..Default::default()
    }
}

fn write_inventory_xlsx(path: &PathBuf, with_blank_spacer_row: bool) {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();

    for (col, header) in [
        "Stock Number",
        "Shape",
        "Carat",
        "Color",
        "Clarity",
        "Fluorescence",
        "Certificate Number",
    ]
    .iter()
    .enumerate()
    {
        ws.write_string(0, col as u16, *header).unwrap();
    }

    ws.write_string(1, 0, "X-1").unwrap();
    ws.write_string(1, 1, "RB").unwrap();
    ws.write_number(1, 2, 1.25).unwrap();
    ws.write_string(1, 3, "G").unwrap();
    ws.write_string(1, 4, "VS1").unwrap();
    ws.write_string(1, 5, "N").unwrap();
    // numeric certificate cell must come through as a clean integer string
    ws.write_number(1, 6, 123456.0).unwrap();

    let second_row = if with_blank_spacer_row { 3 } else { 2 };
    ws.write_string(second_row, 0, "X-2").unwrap();
    ws.write_string(second_row, 1, "OV").unwrap();
    ws.write_number(second_row, 2, 2.0).unwrap();
    ws.write_string(second_row, 3, "H").unwrap();
    ws.write_string(second_row, 4, "SI1").unwrap();
    ws.write_string(second_row, 5, "F").unwrap();
    ws.write_string(second_row, 6, "654321").unwrap();

    wb.save(path).unwrap();
}

#[test]
fn ingests_a_workbook_end_to_end() {
    let path = tmp_file("inventory");
    write_inventory_xlsx(&path, false);

    let store = MemoryStore::new();
    let report = ingest_from_path(&path, OWNER, &store, &options()).unwrap();

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.accepted_rows, 2);
    assert_eq!(report.persisted_rows(), 2);

    let first = store.get(OWNER, "X-1").expect("record persisted");
    assert_eq!(first.shape, "round brilliant");
    assert_eq!(first.weight, 1.25);
    assert_eq!(first.certificate_number, "123456");

    let second = store.get(OWNER, "X-2").expect("record persisted");
    assert_eq!(second.shape, "oval");
    assert_eq!(second.fluorescence, "FAINT");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn blank_spacer_rows_are_skipped_and_not_counted() {
    let path = tmp_file("spacer");
    write_inventory_xlsx(&path, true);

    let store = MemoryStore::new();
    let report = ingest_from_path(&path, OWNER, &store, &options()).unwrap();

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.accepted_rows, 2);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn header_only_workbook_is_fatal() {
    use rust_xlsxwriter::Workbook;

    let path = tmp_file("header-only");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "Shape").unwrap();
    ws.write_string(0, 1, "Carat").unwrap();
    wb.save(&path).unwrap();

    let store = MemoryStore::new();
    let err = ingest_from_path(&path, OWNER, &store, &options()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyFile { .. }));

    let _ = std::fs::remove_file(&path);
}
