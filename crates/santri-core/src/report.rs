//! # Report Module
//!
//! The printable form of a single student record: a title block followed by
//! label/value lines. The PDF encoder lays these lines out on a page; the CLI
//! prints them as text.

use serde::{Deserialize, Serialize};

use crate::types::Student;

/// Title printed at the top of every form.
pub const FORM_TITLE: &str = "FORMULIR DATA SANTRI";

/// Subtitle printed under the title.
pub const FORM_SUBTITLE: &str = "Sistem Kelola Data Santri";

/// Placeholder for absent optional values.
const EMPTY: &str = "-";

/// One labelled line of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLine {
    pub label: String,
    pub value: String,
}

impl FormLine {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// The complete printable form of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentForm {
    pub title: String,
    pub subtitle: String,
    pub lines: Vec<FormLine>,
}

impl StudentForm {
    /// Lay out `student` as label/value lines.
    #[must_use]
    pub fn from_student(student: &Student) -> Self {
        let p = &student.profile;
        let or_dash = |value: &Option<String>| value.clone().unwrap_or_else(|| EMPTY.to_string());
        let count = |value: Option<u32>| value.map_or_else(|| EMPTY.to_string(), |n| n.to_string());

        let lines = vec![
            FormLine::new("No. Urut", student.no_urut.to_string()),
            FormLine::new("No. Registrasi", student.no_reg.clone()),
            FormLine::new("NIS", student.nis.clone()),
            FormLine::new("Nama Lengkap", p.nama.clone()),
            FormLine::new("NIK", p.nik.clone()),
            FormLine::new("No. KK", p.no_kk.clone()),
            FormLine::new("Jenis Kelamin", p.jenis_kelamin.label()),
            FormLine::new(
                "Tempat, Tanggal Lahir",
                format!("{}, {}", p.tempat_lahir, p.tanggal_lahir),
            ),
            FormLine::new("Umur", format!("{} tahun", student.umur)),
            FormLine::new("Agama", p.agama.clone()),
            FormLine::new("Kewarganegaraan", p.kewarganegaraan.clone()),
            FormLine::new("Anak ke-", count(p.anak_ke)),
            FormLine::new("Jumlah Saudara", count(p.jumlah_saudara)),
            FormLine::new("Alamat", p.alamat.clone()),
            FormLine::new("RT/RW", format!("{}/{}", or_dash(&p.rt), or_dash(&p.rw))),
            FormLine::new("Desa", p.desa.clone()),
            FormLine::new("Dusun", or_dash(&p.dusun)),
            FormLine::new("Kecamatan", p.kecamatan.clone()),
            FormLine::new("Kabupaten", p.kabupaten.clone()),
            FormLine::new("Provinsi", p.provinsi.clone()),
            FormLine::new("Nama Ayah", p.nama_ayah.clone()),
            FormLine::new("NIK Ayah", or_dash(&p.nik_ayah)),
            FormLine::new("Pekerjaan Ayah", or_dash(&p.pekerjaan_ayah)),
            FormLine::new("Nama Ibu", p.nama_ibu.clone()),
            FormLine::new("NIK Ibu", or_dash(&p.nik_ibu)),
            FormLine::new("Pekerjaan Ibu", or_dash(&p.pekerjaan_ibu)),
            FormLine::new("Kelas", p.kelas.clone()),
            FormLine::new("Tanggal Masuk", p.tanggal_masuk.to_string()),
            FormLine::new("No. WhatsApp", or_dash(&p.no_wa)),
            FormLine::new("Keterangan", or_dash(&p.keterangan)),
        ];

        Self {
            title: FORM_TITLE.to_string(),
            subtitle: FORM_SUBTITLE.to_string(),
            lines,
        }
    }

    /// Plain-text rendering with aligned labels.
    #[must_use]
    pub fn to_text(&self) -> String {
        let width = self
            .lines
            .iter()
            .map(|line| line.label.chars().count())
            .max()
            .unwrap_or(0);

        let mut output = String::new();
        output.push_str(&self.title);
        output.push('\n');
        output.push_str(&self.subtitle);
        output.push('\n');
        output.push_str(&"─".repeat(self.title.chars().count().max(self.subtitle.chars().count())));
        output.push('\n');

        for line in &self.lines {
            output.push_str(&format!("{:<width$} : {}\n", line.label, line.value));
        }

        output
    }
}

// =============================================================================
// TESTS
// =============================================================================
