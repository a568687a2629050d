//! # Formats Module
//!
//! Byte encoders for getting records in and out of the store.
//!
//! This module contains:
//! - The 32-column XLSX layout (export writer and import row reader)
//! - A PDF writer for one student's form
//!
//! Note: File I/O and HTTP headers remain in the app layer (apps/santri).
//! This module only handles format conversion (pure transformations).

mod pdf;
mod spreadsheet;

pub use pdf::*;
pub use spreadsheet::*;
