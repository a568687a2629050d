//! # Schema Module
//!
//! Raw input shape and validation for student records.
//!
//! The same rules apply to every entry point: the JSON body of a create or
//! update request and a spreadsheet row being imported. Input arrives as a [`StudentInput`] whose fields are loosely typed
//! ([`RawValue`]) and tri-state ([`Patch`]); validation turns it into either a
//! complete [`StudentProfile`] or a [`StudentPatch`], collecting every field
//! error on the way.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Gender, SantriError, StudentProfile};

/// Accepted date layout for `tanggalLahir` and `tanggalMasuk`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest accepted text value, in characters; the capacity of one
/// spreadsheet cell.
pub const MAX_TEXT_CHARS: usize = 32_767;

// =============================================================================
// FIELDS
// =============================================================================

/// The user-supplied fields of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Nama,
    Nik,
    NoKk,
    JenisKelamin,
    TempatLahir,
    TanggalLahir,
    Agama,
    Kewarganegaraan,
    AnakKe,
    JumlahSaudara,
    Alamat,
    Rt,
    Rw,
    Desa,
    Dusun,
    Kecamatan,
    Kabupaten,
    Provinsi,
    NamaAyah,
    NikAyah,
    PekerjaanAyah,
    NamaIbu,
    NikIbu,
    PekerjaanIbu,
    Kelas,
    Keterangan,
    NoWa,
    TanggalMasuk,
}

impl Field {
    /// Every input field, in record order.
    pub const ALL: [Field; 28] = [
        Field::Nama,
        Field::Nik,
        Field::NoKk,
        Field::JenisKelamin,
        Field::TempatLahir,
        Field::TanggalLahir,
        Field::Agama,
        Field::Kewarganegaraan,
        Field::AnakKe,
        Field::JumlahSaudara,
        Field::Alamat,
        Field::Rt,
        Field::Rw,
        Field::Desa,
        Field::Dusun,
        Field::Kecamatan,
        Field::Kabupaten,
        Field::Provinsi,
        Field::NamaAyah,
        Field::NikAyah,
        Field::PekerjaanAyah,
        Field::NamaIbu,
        Field::NikIbu,
        Field::PekerjaanIbu,
        Field::Kelas,
        Field::Keterangan,
        Field::NoWa,
        Field::TanggalMasuk,
    ];

    /// The JSON (camelCase) name of the field.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Field::Nama => "nama",
            Field::Nik => "nik",
            Field::NoKk => "noKk",
            Field::JenisKelamin => "jenisKelamin",
            Field::TempatLahir => "tempatLahir",
            Field::TanggalLahir => "tanggalLahir",
            Field::Agama => "agama",
            Field::Kewarganegaraan => "kewarganegaraan",
            Field::AnakKe => "anakKe",
            Field::JumlahSaudara => "jumlahSaudara",
            Field::Alamat => "alamat",
            Field::Rt => "rt",
            Field::Rw => "rw",
            Field::Desa => "desa",
            Field::Dusun => "dusun",
            Field::Kecamatan => "kecamatan",
            Field::Kabupaten => "kabupaten",
            Field::Provinsi => "provinsi",
            Field::NamaAyah => "namaAyah",
            Field::NikAyah => "nikAyah",
            Field::PekerjaanAyah => "pekerjaanAyah",
            Field::NamaIbu => "namaIbu",
            Field::NikIbu => "nikIbu",
            Field::PekerjaanIbu => "pekerjaanIbu",
            Field::Kelas => "kelas",
            Field::Keterangan => "keterangan",
            Field::NoWa => "noWa",
            Field::TanggalMasuk => "tanggalMasuk",
        }
    }

    /// Whether a record must carry a value for this field.
    #[must_use]
    pub fn is_required(self) -> bool {
        !matches!(
            self,
            Field::AnakKe
                | Field::JumlahSaudara
                | Field::Rt
                | Field::Rw
                | Field::Dusun
                | Field::NikAyah
                | Field::PekerjaanAyah
                | Field::NikIbu
                | Field::PekerjaanIbu
                | Field::Keterangan
                | Field::NoWa
        )
    }
}

// =============================================================================
// RAW VALUES
// =============================================================================

/// A loosely typed input value.
///
/// Clients and spreadsheets are not consistent about sending `"2"` or `2`
/// for a count, or a number for an ID string, so both are accepted here and
/// interpreted during validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl RawValue {
    /// Textual form of the value, `None` for booleans.
    fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.trim().to_string()),
            RawValue::Integer(i) => Some(i.to_string()),
            RawValue::Float(f) => Some(f.to_string()),
            RawValue::Bool(_) => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        RawValue::Integer(i64::from(value))
    }
}

// =============================================================================
// PATCH (tri-state field)
// =============================================================================

/// A field as it appeared in the input: missing, explicitly `null`, or set.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present; `#[serde(default)]` covers absence.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

// =============================================================================
// FIELD ERRORS
// =============================================================================

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

// =============================================================================
// STUDENT INPUT
// =============================================================================

/// Unvalidated student input, as received from a client or a spreadsheet row.
///
/// System-assigned keys (`id`, `noUrut`, `noReg`, `nis`, `umur`) are not part
/// of the input and are ignored when present in a JSON body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentInput {
    pub nama: Patch<RawValue>,
    pub nik: Patch<RawValue>,
    pub no_kk: Patch<RawValue>,
    pub jenis_kelamin: Patch<RawValue>,
    pub tempat_lahir: Patch<RawValue>,
    pub tanggal_lahir: Patch<RawValue>,
    pub agama: Patch<RawValue>,
    pub kewarganegaraan: Patch<RawValue>,
    pub anak_ke: Patch<RawValue>,
    pub jumlah_saudara: Patch<RawValue>,
    pub alamat: Patch<RawValue>,
    pub rt: Patch<RawValue>,
    pub rw: Patch<RawValue>,
    pub desa: Patch<RawValue>,
    pub dusun: Patch<RawValue>,
    pub kecamatan: Patch<RawValue>,
    pub kabupaten: Patch<RawValue>,
    pub provinsi: Patch<RawValue>,
    pub nama_ayah: Patch<RawValue>,
    pub nik_ayah: Patch<RawValue>,
    pub pekerjaan_ayah: Patch<RawValue>,
    pub nama_ibu: Patch<RawValue>,
    pub nik_ibu: Patch<RawValue>,
    pub pekerjaan_ibu: Patch<RawValue>,
    pub kelas: Patch<RawValue>,
    pub keterangan: Patch<RawValue>,
    pub no_wa: Patch<RawValue>,
    pub tanggal_masuk: Patch<RawValue>,
}

impl StudentInput {
    /// Build an input from `(field, value)` pairs; unlisted fields stay absent.
    pub fn from_fields<I, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (Field, V)>,
        V: Into<RawValue>,
    {
        let mut input = Self::default();
        for (field, value) in fields {
            input.set(field, value);
        }
        input
    }

    /// Set a field to a value.
    pub fn set(&mut self, field: Field, value: impl Into<RawValue>) {
        *self.slot_mut(field) = Patch::Value(value.into());
    }

    /// The raw state of a field.
    #[must_use]
    pub fn get(&self, field: Field) -> &Patch<RawValue> {
        match field {
            Field::Nama => &self.nama,
            Field::Nik => &self.nik,
            Field::NoKk => &self.no_kk,
            Field::JenisKelamin => &self.jenis_kelamin,
            Field::TempatLahir => &self.tempat_lahir,
            Field::TanggalLahir => &self.tanggal_lahir,
            Field::Agama => &self.agama,
            Field::Kewarganegaraan => &self.kewarganegaraan,
            Field::AnakKe => &self.anak_ke,
            Field::JumlahSaudara => &self.jumlah_saudara,
            Field::Alamat => &self.alamat,
            Field::Rt => &self.rt,
            Field::Rw => &self.rw,
            Field::Desa => &self.desa,
            Field::Dusun => &self.dusun,
            Field::Kecamatan => &self.kecamatan,
            Field::Kabupaten => &self.kabupaten,
            Field::Provinsi => &self.provinsi,
            Field::NamaAyah => &self.nama_ayah,
            Field::NikAyah => &self.nik_ayah,
            Field::PekerjaanAyah => &self.pekerjaan_ayah,
            Field::NamaIbu => &self.nama_ibu,
            Field::NikIbu => &self.nik_ibu,
            Field::PekerjaanIbu => &self.pekerjaan_ibu,
            Field::Kelas => &self.kelas,
            Field::Keterangan => &self.keterangan,
            Field::NoWa => &self.no_wa,
            Field::TanggalMasuk => &self.tanggal_masuk,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Patch<RawValue> {
        match field {
            Field::Nama => &mut self.nama,
            Field::Nik => &mut self.nik,
            Field::NoKk => &mut self.no_kk,
            Field::JenisKelamin => &mut self.jenis_kelamin,
            Field::TempatLahir => &mut self.tempat_lahir,
            Field::TanggalLahir => &mut self.tanggal_lahir,
            Field::Agama => &mut self.agama,
            Field::Kewarganegaraan => &mut self.kewarganegaraan,
            Field::AnakKe => &mut self.anak_ke,
            Field::JumlahSaudara => &mut self.jumlah_saudara,
            Field::Alamat => &mut self.alamat,
            Field::Rt => &mut self.rt,
            Field::Rw => &mut self.rw,
            Field::Desa => &mut self.desa,
            Field::Dusun => &mut self.dusun,
            Field::Kecamatan => &mut self.kecamatan,
            Field::Kabupaten => &mut self.kabupaten,
            Field::Provinsi => &mut self.provinsi,
            Field::NamaAyah => &mut self.nama_ayah,
            Field::NikAyah => &mut self.nik_ayah,
            Field::PekerjaanAyah => &mut self.pekerjaan_ayah,
            Field::NamaIbu => &mut self.nama_ibu,
            Field::NikIbu => &mut self.nik_ibu,
            Field::PekerjaanIbu => &mut self.pekerjaan_ibu,
            Field::Kelas => &mut self.kelas,
            Field::Keterangan => &mut self.keterangan,
            Field::NoWa => &mut self.no_wa,
            Field::TanggalMasuk => &mut self.tanggal_masuk,
        }
    }

    /// Whether no field carries a value (absent, null or blank everywhere).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|&field| match self.get(field) {
            Patch::Absent | Patch::Null => true,
            Patch::Value(raw) => raw.as_text().is_some_and(|s| s.is_empty()),
        })
    }

    /// Validate as a complete record (create / import).
    pub fn validate_new(&self) -> Result<StudentProfile, SantriError> {
        let mut v = Validator::new(self, Mode::Create);

        let profile = StudentProfile {
            nama: v.required(Field::Nama).unwrap_or_default(),
            nik: v.required(Field::Nik).unwrap_or_default(),
            no_kk: v.required(Field::NoKk).unwrap_or_default(),
            jenis_kelamin: v.gender(Field::JenisKelamin).unwrap_or_default(),
            tempat_lahir: v.required(Field::TempatLahir).unwrap_or_default(),
            tanggal_lahir: v.date(Field::TanggalLahir).unwrap_or_default(),
            agama: v.required(Field::Agama).unwrap_or_default(),
            kewarganegaraan: v.required(Field::Kewarganegaraan).unwrap_or_default(),
            anak_ke: v.optional_count(Field::AnakKe).flatten(),
            jumlah_saudara: v.optional_count(Field::JumlahSaudara).flatten(),
            alamat: v.required(Field::Alamat).unwrap_or_default(),
            rt: v.optional(Field::Rt).flatten(),
            rw: v.optional(Field::Rw).flatten(),
            desa: v.required(Field::Desa).unwrap_or_default(),
            dusun: v.optional(Field::Dusun).flatten(),
            kecamatan: v.required(Field::Kecamatan).unwrap_or_default(),
            kabupaten: v.required(Field::Kabupaten).unwrap_or_default(),
            provinsi: v.required(Field::Provinsi).unwrap_or_default(),
            nama_ayah: v.required(Field::NamaAyah).unwrap_or_default(),
            nik_ayah: v.optional(Field::NikAyah).flatten(),
            pekerjaan_ayah: v.optional(Field::PekerjaanAyah).flatten(),
            nama_ibu: v.required(Field::NamaIbu).unwrap_or_default(),
            nik_ibu: v.optional(Field::NikIbu).flatten(),
            pekerjaan_ibu: v.optional(Field::PekerjaanIbu).flatten(),
            kelas: v.required(Field::Kelas).unwrap_or_default(),
            keterangan: v.optional(Field::Keterangan).flatten(),
            no_wa: v.optional(Field::NoWa).flatten(),
            tanggal_masuk: v.date(Field::TanggalMasuk).unwrap_or_default(),
        };

        v.finish(profile)
    }

    /// Validate as a partial update: only present fields are checked.
    pub fn validate_patch(&self) -> Result<StudentPatch, SantriError> {
        let mut v = Validator::new(self, Mode::Update);

        let patch = StudentPatch {
            nama: v.required(Field::Nama),
            nik: v.required(Field::Nik),
            no_kk: v.required(Field::NoKk),
            jenis_kelamin: v.gender(Field::JenisKelamin),
            tempat_lahir: v.required(Field::TempatLahir),
            tanggal_lahir: v.date(Field::TanggalLahir),
            agama: v.required(Field::Agama),
            kewarganegaraan: v.required(Field::Kewarganegaraan),
            anak_ke: v.optional_count(Field::AnakKe),
            jumlah_saudara: v.optional_count(Field::JumlahSaudara),
            alamat: v.required(Field::Alamat),
            rt: v.optional(Field::Rt),
            rw: v.optional(Field::Rw),
            desa: v.required(Field::Desa),
            dusun: v.optional(Field::Dusun),
            kecamatan: v.required(Field::Kecamatan),
            kabupaten: v.required(Field::Kabupaten),
            provinsi: v.required(Field::Provinsi),
            nama_ayah: v.required(Field::NamaAyah),
            nik_ayah: v.optional(Field::NikAyah),
            pekerjaan_ayah: v.optional(Field::PekerjaanAyah),
            nama_ibu: v.required(Field::NamaIbu),
            nik_ibu: v.optional(Field::NikIbu),
            pekerjaan_ibu: v.optional(Field::PekerjaanIbu),
            kelas: v.required(Field::Kelas),
            keterangan: v.optional(Field::Keterangan),
            no_wa: v.optional(Field::NoWa),
            tanggal_masuk: v.date(Field::TanggalMasuk),
        };

        v.finish(patch)
    }
}

// =============================================================================
// STUDENT PATCH
// =============================================================================

/// A validated partial update.
///
/// `None` leaves a field untouched. For optional fields `Some(None)` clears
/// the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub nama: Option<String>,
    pub nik: Option<String>,
    pub no_kk: Option<String>,
    pub jenis_kelamin: Option<Gender>,
    pub tempat_lahir: Option<String>,
    pub tanggal_lahir: Option<NaiveDate>,
    pub agama: Option<String>,
    pub kewarganegaraan: Option<String>,
    pub anak_ke: Option<Option<u32>>,
    pub jumlah_saudara: Option<Option<u32>>,
    pub alamat: Option<String>,
    pub rt: Option<Option<String>>,
    pub rw: Option<Option<String>>,
    pub desa: Option<String>,
    pub dusun: Option<Option<String>>,
    pub kecamatan: Option<String>,
    pub kabupaten: Option<String>,
    pub provinsi: Option<String>,
    pub nama_ayah: Option<String>,
    pub nik_ayah: Option<Option<String>>,
    pub pekerjaan_ayah: Option<Option<String>>,
    pub nama_ibu: Option<String>,
    pub nik_ibu: Option<Option<String>>,
    pub pekerjaan_ibu: Option<Option<String>>,
    pub kelas: Option<String>,
    pub keterangan: Option<Option<String>>,
    pub no_wa: Option<Option<String>>,
    pub tanggal_masuk: Option<NaiveDate>,
}

impl StudentPatch {
    /// Merge the provided fields over `profile`.
    pub fn apply_to(self, profile: &mut StudentProfile) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        set(&mut profile.nama, self.nama);
        set(&mut profile.nik, self.nik);
        set(&mut profile.no_kk, self.no_kk);
        set(&mut profile.jenis_kelamin, self.jenis_kelamin);
        set(&mut profile.tempat_lahir, self.tempat_lahir);
        set(&mut profile.tanggal_lahir, self.tanggal_lahir);
        set(&mut profile.agama, self.agama);
        set(&mut profile.kewarganegaraan, self.kewarganegaraan);
        set(&mut profile.anak_ke, self.anak_ke);
        set(&mut profile.jumlah_saudara, self.jumlah_saudara);
        set(&mut profile.alamat, self.alamat);
        set(&mut profile.rt, self.rt);
        set(&mut profile.rw, self.rw);
        set(&mut profile.desa, self.desa);
        set(&mut profile.dusun, self.dusun);
        set(&mut profile.kecamatan, self.kecamatan);
        set(&mut profile.kabupaten, self.kabupaten);
        set(&mut profile.provinsi, self.provinsi);
        set(&mut profile.nama_ayah, self.nama_ayah);
        set(&mut profile.nik_ayah, self.nik_ayah);
        set(&mut profile.pekerjaan_ayah, self.pekerjaan_ayah);
        set(&mut profile.nama_ibu, self.nama_ibu);
        set(&mut profile.nik_ibu, self.nik_ibu);
        set(&mut profile.pekerjaan_ibu, self.pekerjaan_ibu);
        set(&mut profile.kelas, self.kelas);
        set(&mut profile.keterangan, self.keterangan);
        set(&mut profile.no_wa, self.no_wa);
        set(&mut profile.tanggal_masuk, self.tanggal_masuk);
    }
}

// =============================================================================
// VALIDATOR
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Update,
}

/// Collects field errors while extracting typed values.
///
/// Every extractor returns `None` for "nothing to store" (absent in update
/// mode, or invalid) and records an error when the input is invalid.
struct Validator<'a> {
    input: &'a StudentInput,
    mode: Mode,
    errors: Vec<FieldError>,
}

impl<'a> Validator<'a> {
    fn new(input: &'a StudentInput, mode: Mode) -> Self {
        Self {
            input,
            mode,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, field: Field, message: &str) {
        self.errors.push(FieldError::new(field.name(), message));
    }

    /// Trimmed text of a required field.
    fn required(&mut self, field: Field) -> Option<String> {
        let text = match self.input.get(field) {
            Patch::Absent if self.mode == Mode::Update => return None,
            Patch::Absent | Patch::Null => None,
            Patch::Value(raw) => match raw.as_text() {
                Some(text) => Some(text),
                None => {
                    self.fail(field, "must be text");
                    return None;
                }
            },
        };
        match text {
            Some(text) if !text.is_empty() => self.within_limit(field, text),
            _ => {
                self.fail(field, "is required");
                None
            }
        }
    }

    /// Trimmed text of an optional field; `Some(None)` means "clear".
    fn optional(&mut self, field: Field) -> Option<Option<String>> {
        match self.input.get(field) {
            Patch::Absent => match self.mode {
                Mode::Create => Some(None),
                Mode::Update => None,
            },
            Patch::Null => Some(None),
            Patch::Value(raw) => match raw.as_text() {
                Some(text) if text.is_empty() => Some(None),
                Some(text) => self.within_limit(field, text).map(Some),
                None => {
                    self.fail(field, "must be text");
                    None
                }
            },
        }
    }

    fn within_limit(&mut self, field: Field, text: String) -> Option<String> {
        if text.chars().count() > MAX_TEXT_CHARS {
            self.fail(field, &format!("must be at most {MAX_TEXT_CHARS} characters"));
            return None;
        }
        Some(text)
    }

    fn gender(&mut self, field: Field) -> Option<Gender> {
        let code = self.required(field)?;
        let gender = Gender::from_code(&code);
        if gender.is_none() {
            self.fail(field, "must be L or P");
        }
        gender
    }

    fn date(&mut self, field: Field) -> Option<NaiveDate> {
        let text = self.required(field)?;
        match NaiveDate::parse_from_str(&text, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.fail(field, "must be a date in YYYY-MM-DD format");
                None
            }
        }
    }

    /// A non-negative count; zero is stored as "not provided".
    fn optional_count(&mut self, field: Field) -> Option<Option<u32>> {
        let text = self.optional(field)?;
        let Some(text) = text else {
            return Some(None);
        };
        match text.parse::<u32>() {
            Ok(0) => Some(None),
            Ok(n) => Some(Some(n)),
            Err(_) => {
                self.fail(field, "must be a non-negative integer");
                None
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, SantriError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(SantriError::Validation(self.errors))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
