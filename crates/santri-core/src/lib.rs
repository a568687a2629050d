//! # Santri Core
//!
//! Student-record engine for a boarding-school administration service.
//!
//! This crate is pure and synchronous. It owns:
//! - the in-memory Record Store (ids, sequence numbers, derived age)
//! - input validation for create, update and import
//! - the Query/Filter Engine and the Statistics Aggregator
//! - XLSX and PDF encoders (byte transformations only)
//!
//! Date-dependent operations take `today` explicitly; the `*_at` variants
//! exist so tests can pin the calendar.

pub mod formats;
pub mod ingestor;
pub mod primitives;
pub mod query;
pub mod report;
pub mod schema;
pub mod seed;
pub mod stats;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use formats::{
    COLUMNS, EXPORT_FILENAME, PDF_CONTENT_TYPE, SheetRow, XLSX_CONTENT_TYPE, export_students,
    pdf_filename, read_rows, render_student_pdf,
};
pub use ingestor::{ImportReport, Ingestor};
pub use primitives::{Sequence, calendar_age};
pub use query::{AGE_BUCKETS, AgeBucket, AgeRange, StudentFilter, StudentQuery};
pub use report::{FORM_SUBTITLE, FORM_TITLE, FormLine, StudentForm};
pub use schema::{Field, FieldError, Patch, RawValue, StudentInput, StudentPatch};
pub use seed::{sample_profiles, seed_store};
pub use stats::{AgeRangeCount, ClassCount, StudentStats};
pub use store::{StudentStore, today};
pub use types::{Gender, SantriError, Student, StudentId, StudentProfile};
