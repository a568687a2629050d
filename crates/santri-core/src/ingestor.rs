//! # Ingestor Module
//!
//! Batch import of spreadsheet rows into the store.
//!
//! Rows are validated and committed one at a time, in sheet order. A failing
//! row is reported and skipped; rows before it stay committed and rows after
//! it are still attempted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::formats::{SheetRow, read_rows};
use crate::store::StudentStore;
use crate::types::{SantriError, StudentId};

/// Outcome of one import batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Always `true` once the workbook itself was readable.
    pub success: bool,
    pub imported: usize,
    /// One `Row {n}: ...` entry per rejected row.
    pub errors: Vec<String>,
    pub message: String,
    /// Ids of the created records, in row order.
    #[serde(skip)]
    pub created: Vec<StudentId>,
}

impl ImportReport {
    fn new(created: Vec<StudentId>, errors: Vec<String>) -> Self {
        let imported = created.len();
        let mut message = format!("Successfully imported {imported} students");
        if !errors.is_empty() {
            message.push_str(&format!(" with {} errors", errors.len()));
        }
        Self {
            success: true,
            imported,
            errors,
            message,
            created,
        }
    }
}

/// Stateless batch importer.
pub struct Ingestor;

impl Ingestor {
    /// Read an XLSX workbook and import its rows.
    ///
    /// Fails only when the workbook cannot be read; row-level problems end
    /// up in [`ImportReport::errors`].
    pub fn ingest_workbook(
        store: &mut StudentStore,
        bytes: &[u8],
        today: NaiveDate,
    ) -> Result<ImportReport, SantriError> {
        let rows = read_rows(bytes)?;
        Ok(Self::ingest_rows(store, rows, today))
    }

    /// Import already-parsed rows.
    pub fn ingest_rows(
        store: &mut StudentStore,
        rows: impl IntoIterator<Item = SheetRow>,
        today: NaiveDate,
    ) -> ImportReport {
        let mut created = Vec::new();
        let mut errors = Vec::new();

        for row in rows {
            match row.input.validate_new() {
                Ok(profile) => created.push(store.create_at(profile, today).id),
                Err(err) => errors.push(row_error(row.row_number, &err)),
            }
        }

        ImportReport::new(created, errors)
    }
}

fn row_error(row_number: u32, err: &SantriError) -> String {
    let fields = err.field_errors();
    let detail = if fields.is_empty() {
        err.to_string()
    } else {
        fields
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("Row {row_number}: {detail}")
}

// =============================================================================
// TESTS
// =============================================================================
