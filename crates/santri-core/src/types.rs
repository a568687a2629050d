//! # Types Module
//!
//! Core type definitions for the student record engine.
//!
//! A [`Student`] is the stored record: the system-assigned identity
//! (`id`, `noUrut`, `noReg`, `nis`), the derived age (`umur`) and the
//! validated, user-supplied [`StudentProfile`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::schema::FieldError;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// System-assigned record identifier. Monotonic, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// GENDER
// =============================================================================

/// Sex of a student, stored with the single-letter codes `L` and `P`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Laki-laki.
    #[default]
    #[serde(rename = "L")]
    Male,
    /// Perempuan.
    #[serde(rename = "P")]
    Female,
}

impl Gender {
    /// Parse a `L` / `P` code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "L" => Some(Self::Male),
            "P" => Some(Self::Female),
            _ => None,
        }
    }

    /// The stored single-letter code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Male => "L",
            Self::Female => "P",
        }
    }

    /// Human readable label used on printed forms.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Laki-laki",
            Self::Female => "Perempuan",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// STUDENT PROFILE
// =============================================================================

/// The validated, user-supplied part of a student record.
///
/// Optional fields are `None` whenever the input was absent or blank;
/// an empty string is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub nama: String,
    pub nik: String,
    pub no_kk: String,
    pub jenis_kelamin: Gender,
    pub tempat_lahir: String,
    pub tanggal_lahir: NaiveDate,
    pub agama: String,
    pub kewarganegaraan: String,
    pub anak_ke: Option<u32>,
    pub jumlah_saudara: Option<u32>,
    pub alamat: String,
    pub rt: Option<String>,
    pub rw: Option<String>,
    pub desa: String,
    pub dusun: Option<String>,
    pub kecamatan: String,
    pub kabupaten: String,
    pub provinsi: String,
    pub nama_ayah: String,
    pub nik_ayah: Option<String>,
    pub pekerjaan_ayah: Option<String>,
    pub nama_ibu: String,
    pub nik_ibu: Option<String>,
    pub pekerjaan_ibu: Option<String>,
    pub kelas: String,
    pub keterangan: Option<String>,
    pub no_wa: Option<String>,
    pub tanggal_masuk: NaiveDate,
}

// =============================================================================
// STUDENT
// =============================================================================

/// A stored student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub no_urut: u32,
    pub no_reg: String,
    pub nis: String,
    /// Age in whole years, derived from `tanggal_lahir`.
    pub umur: i32,
    #[serde(flatten)]
    pub profile: StudentProfile,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Errors produced by the record engine.
#[derive(Debug, Error)]
pub enum SantriError {
    /// Input failed validation; every offending field is reported.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// No record with this id.
    #[error("student {0} not found")]
    NotFound(StudentId),

    /// The workbook has no worksheet to import from.
    #[error("no worksheet found")]
    NoWorksheet,

    /// Reading an uploaded workbook failed.
    #[error("spreadsheet read error: {0}")]
    SpreadsheetRead(#[from] calamine::XlsxError),

    /// Writing an export workbook failed.
    #[error("spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),
}

impl SantriError {
    /// Field errors carried by a validation failure, empty otherwise.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_codes_roundtrip() {
        assert_eq!(Gender::from_code("L"), Some(Gender::Male));
        assert_eq!(Gender::from_code("P"), Some(Gender::Female));
        assert_eq!(Gender::from_code("X"), None);
        assert_eq!(Gender::Female.code(), "P");
        assert_eq!(Gender::Male.label(), "Laki-laki");
    }

    #[test]
    fn student_serializes_flat_camel_case() {
        let student = Student {
            id: StudentId(7),
            no_urut: 7,
            no_reg: "REG-2024-007".to_string(),
            nis: "2024007".to_string(),
            umur: 16,
            profile: StudentProfile {
                nama: "Fatimah Zahra".to_string(),
                jenis_kelamin: Gender::Female,
                no_wa: None,
                ..StudentProfile::default()
            },
        };

        let json = serde_json::to_value(&student).unwrap_or_default();
        assert_eq!(json["id"], 7);
        assert_eq!(json["noReg"], "REG-2024-007");
        assert_eq!(json["nama"], "Fatimah Zahra");
        assert_eq!(json["jenisKelamin"], "P");
        assert!(json["noWa"].is_null());
        assert!(json.get("profile").is_none());
    }

    #[test]
    fn validation_error_reports_count() {
        let err = SantriError::Validation(vec![
            FieldError::new("nama", "is required"),
            FieldError::new("nik", "is required"),
        ]);
        assert_eq!(err.to_string(), "validation failed on 2 field(s)");
        assert_eq!(err.field_errors().len(), 2);
        assert!(SantriError::NotFound(StudentId(3)).field_errors().is_empty());
    }
}
