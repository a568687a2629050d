//! Integration tests for Santri CLI commands.
//!
//! Uses tempfile for testing file-based operations.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use santri::cli::{cmd_check_import, cmd_render_pdf, cmd_template};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a temporary directory for tests.
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write the sample template into `dir`.
fn create_template(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("template.xlsx");
    cmd_template(&path, false).unwrap();
    path
}

// =============================================================================
// TEMPLATE COMMAND TESTS
// =============================================================================

#[test]
fn test_template_writes_workbook() {
    let temp = create_temp_dir();
    let path = temp.path().join("santri.xlsx");

    let written = cmd_template(&path, false).unwrap();
    assert_eq!(written, 3);

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_template_refuses_overwrite_without_force() {
    let temp = create_temp_dir();
    let path = create_template(&temp);

    assert!(cmd_template(&path, false).is_err());
    assert!(cmd_template(&path, true).is_ok());
}

// =============================================================================
// CHECK-IMPORT COMMAND TESTS
// =============================================================================

#[test]
fn test_check_import_reads_template() {
    let temp = create_temp_dir();
    let path = create_template(&temp);

    let report = cmd_check_import(&path, false).unwrap();
    assert!(report.success);
    assert_eq!(report.imported, 3);
    assert!(report.errors.is_empty());
}

#[test]
fn test_check_import_json_output() {
    let temp = create_temp_dir();
    let path = create_template(&temp);

    let report = cmd_check_import(&path, true).unwrap();
    assert_eq!(report.message, "Successfully imported 3 students");
}

#[test]
fn test_check_import_fails_on_unreadable_file() {
    let temp = create_temp_dir();
    let path = temp.path().join("notes.xlsx");
    std::fs::write(&path, "not a workbook").unwrap();

    assert!(cmd_check_import(&path, false).is_err());
}

#[test]
fn test_check_import_fails_on_missing_file() {
    let temp = create_temp_dir();
    assert!(cmd_check_import(&temp.path().join("missing.xlsx"), false).is_err());
}

// =============================================================================
// RENDER-PDF COMMAND TESTS
// =============================================================================

#[test]
fn test_render_pdf_writes_form() {
    let temp = create_temp_dir();
    let sheet = create_template(&temp);
    let pdf = temp.path().join("iqbal.pdf");

    cmd_render_pdf(&sheet, 3, &pdf, false).unwrap();

    let bytes = std::fs::read(&pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(String::from_utf8_lossy(&bytes).contains("(Muhammad Iqbal)"));
}

#[test]
fn test_render_pdf_unknown_sequence() {
    let temp = create_temp_dir();
    let sheet = create_template(&temp);
    let pdf = temp.path().join("nobody.pdf");

    assert!(cmd_render_pdf(&sheet, 9, &pdf, false).is_err());
    assert!(!pdf.exists());
}

#[test]
fn test_render_pdf_refuses_overwrite_without_force() {
    let temp = create_temp_dir();
    let sheet = create_template(&temp);
    let pdf = temp.path().join("form.pdf");
    std::fs::write(&pdf, "existing").unwrap();

    assert!(cmd_render_pdf(&sheet, 1, &pdf, false).is_err());
    assert_eq!(std::fs::read_to_string(&pdf).unwrap(), "existing");

    cmd_render_pdf(&sheet, 1, &pdf, true).unwrap();
    assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF-"));
}
