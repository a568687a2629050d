//! # CLI Module
//!
//! Command implementations for the `santri` binary.
//!
//! Offline commands work on a fresh in-memory store; nothing is persisted
//! between invocations.

use std::path::Path;

use santri_core::{
    ImportReport, Ingestor, StudentStore, export_students, pdf_filename, render_student_pdf,
    seed_store, today,
};
use tracing::info;

use crate::api::run_server;
use crate::config::{ServeArgs, ServerConfig};

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

// =============================================================================
// HELPERS
// =============================================================================

fn ensure_writable(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }
    Ok(())
}

fn import_file(store: &mut StudentStore, file: &Path) -> CliResult<ImportReport> {
    let bytes = std::fs::read(file)?;
    let report = Ingestor::ingest_workbook(store, &bytes, today())?;
    info!(
        file = %file.display(),
        imported = report.imported,
        rejected = report.errors.len(),
        "imported spreadsheet"
    );
    Ok(report)
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(args: ServeArgs) -> CliResult<()> {
    run_server(ServerConfig::from(args)).await
}

/// Dry-run an import and print the report. Row errors do not fail the command.
pub fn cmd_check_import(file: &Path, json: bool) -> CliResult<ImportReport> {
    let mut store = StudentStore::new();
    let report = import_file(&mut store, file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.message);
        for error in &report.errors {
            println!("  {error}");
        }
    }

    Ok(report)
}

/// Write the sample students as a starting spreadsheet.
pub fn cmd_template(output: &Path, force: bool) -> CliResult<usize> {
    ensure_writable(output, force)?;

    let mut store = StudentStore::new();
    let ids = seed_store(&mut store, today());
    let bytes = export_students(store.list())?;
    std::fs::write(output, bytes)?;

    println!("Wrote {} sample students to {}", ids.len(), output.display());
    Ok(ids.len())
}

/// Import `file` and render the record with sequence number `no_urut`.
pub fn cmd_render_pdf(file: &Path, no_urut: u32, output: &Path, force: bool) -> CliResult<()> {
    ensure_writable(output, force)?;

    let mut store = StudentStore::new();
    let report = import_file(&mut store, file)?;
    let student = store.get_by_no_urut(no_urut).ok_or_else(|| {
        format!(
            "no record with sequence number {no_urut} ({} rows imported)",
            report.imported
        )
    })?;

    std::fs::write(output, render_student_pdf(student))?;
    println!(
        "Rendered {} ({}) to {}",
        student.profile.nama,
        pdf_filename(student),
        output.display()
    );
    Ok(())
}
