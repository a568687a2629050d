//! XLSX export and import in the fixed 32-column layout.
//!
//! Columns are addressed by position, never by header text: an import reads
//! column 4 as the name whatever its header says.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Color, Format, Workbook};

use crate::schema::{DATE_FORMAT, Field, StudentInput};
use crate::types::{SantriError, Student};

/// Name of the exported worksheet.
pub const SHEET_NAME: &str = "Data Santri";

/// Attachment name for a full export.
pub const EXPORT_FILENAME: &str = "data-santri.xlsx";

/// MIME type of an XLSX workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Header row fill.
const HEADER_FILL: u32 = 0xE3_F2_FD;

// =============================================================================
// LAYOUT
// =============================================================================

/// Where a column's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    NoUrut,
    NoReg,
    Nis,
    Umur,
    /// A user-supplied field, read back on import.
    Input(Field),
}

/// One spreadsheet column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub header: &'static str,
    pub width: f64,
    pub source: Source,
}

const fn column(header: &'static str, width: f64, source: Source) -> Column {
    Column {
        header,
        width,
        source,
    }
}

/// The column layout, left to right.
pub const COLUMNS: [Column; 32] = [
    column("No. Urut", 10.0, Source::NoUrut),
    column("No. Registrasi", 15.0, Source::NoReg),
    column("NIS", 12.0, Source::Nis),
    column("Nama Lengkap", 25.0, Source::Input(Field::Nama)),
    column("NIK", 18.0, Source::Input(Field::Nik)),
    column("No. KK", 18.0, Source::Input(Field::NoKk)),
    column("Jenis Kelamin", 15.0, Source::Input(Field::JenisKelamin)),
    column("Tempat Lahir", 20.0, Source::Input(Field::TempatLahir)),
    column("Tanggal Lahir", 15.0, Source::Input(Field::TanggalLahir)),
    column("Umur", 8.0, Source::Umur),
    column("Agama", 12.0, Source::Input(Field::Agama)),
    column("Kewarganegaraan", 15.0, Source::Input(Field::Kewarganegaraan)),
    column("Anak Ke", 10.0, Source::Input(Field::AnakKe)),
    column("Jumlah Saudara", 15.0, Source::Input(Field::JumlahSaudara)),
    column("Alamat", 30.0, Source::Input(Field::Alamat)),
    column("RT", 8.0, Source::Input(Field::Rt)),
    column("RW", 8.0, Source::Input(Field::Rw)),
    column("Desa", 20.0, Source::Input(Field::Desa)),
    column("Dusun", 15.0, Source::Input(Field::Dusun)),
    column("Kecamatan", 20.0, Source::Input(Field::Kecamatan)),
    column("Kabupaten", 20.0, Source::Input(Field::Kabupaten)),
    column("Provinsi", 20.0, Source::Input(Field::Provinsi)),
    column("Nama Ayah", 25.0, Source::Input(Field::NamaAyah)),
    column("NIK Ayah", 18.0, Source::Input(Field::NikAyah)),
    column("Pekerjaan Ayah", 20.0, Source::Input(Field::PekerjaanAyah)),
    column("Nama Ibu", 25.0, Source::Input(Field::NamaIbu)),
    column("NIK Ibu", 18.0, Source::Input(Field::NikIbu)),
    column("Pekerjaan Ibu", 20.0, Source::Input(Field::PekerjaanIbu)),
    column("Kelas", 12.0, Source::Input(Field::Kelas)),
    column("Keterangan", 30.0, Source::Input(Field::Keterangan)),
    column("No. WhatsApp", 15.0, Source::Input(Field::NoWa)),
    column("Tanggal Masuk", 15.0, Source::Input(Field::TanggalMasuk)),
];

// =============================================================================
// EXPORT
// =============================================================================

enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

fn text_or_empty(value: &Option<String>) -> Cell {
    value.clone().map_or(Cell::Empty, Cell::Text)
}

fn count_or_empty(value: Option<u32>) -> Cell {
    value.map_or(Cell::Empty, |n| Cell::Number(f64::from(n)))
}

fn cell_for(student: &Student, source: Source) -> Cell {
    let p = &student.profile;
    match source {
        Source::NoUrut => Cell::Number(f64::from(student.no_urut)),
        Source::NoReg => Cell::Text(student.no_reg.clone()),
        Source::Nis => Cell::Text(student.nis.clone()),
        Source::Umur => Cell::Number(f64::from(student.umur)),
        Source::Input(field) => match field {
            Field::Nama => Cell::Text(p.nama.clone()),
            Field::Nik => Cell::Text(p.nik.clone()),
            Field::NoKk => Cell::Text(p.no_kk.clone()),
            Field::JenisKelamin => Cell::Text(p.jenis_kelamin.code().to_string()),
            Field::TempatLahir => Cell::Text(p.tempat_lahir.clone()),
            Field::TanggalLahir => Cell::Text(p.tanggal_lahir.format(DATE_FORMAT).to_string()),
            Field::Agama => Cell::Text(p.agama.clone()),
            Field::Kewarganegaraan => Cell::Text(p.kewarganegaraan.clone()),
            Field::AnakKe => count_or_empty(p.anak_ke),
            Field::JumlahSaudara => count_or_empty(p.jumlah_saudara),
            Field::Alamat => Cell::Text(p.alamat.clone()),
            Field::Rt => text_or_empty(&p.rt),
            Field::Rw => text_or_empty(&p.rw),
            Field::Desa => Cell::Text(p.desa.clone()),
            Field::Dusun => text_or_empty(&p.dusun),
            Field::Kecamatan => Cell::Text(p.kecamatan.clone()),
            Field::Kabupaten => Cell::Text(p.kabupaten.clone()),
            Field::Provinsi => Cell::Text(p.provinsi.clone()),
            Field::NamaAyah => Cell::Text(p.nama_ayah.clone()),
            Field::NikAyah => text_or_empty(&p.nik_ayah),
            Field::PekerjaanAyah => text_or_empty(&p.pekerjaan_ayah),
            Field::NamaIbu => Cell::Text(p.nama_ibu.clone()),
            Field::NikIbu => text_or_empty(&p.nik_ibu),
            Field::PekerjaanIbu => text_or_empty(&p.pekerjaan_ibu),
            Field::Kelas => Cell::Text(p.kelas.clone()),
            Field::Keterangan => text_or_empty(&p.keterangan),
            Field::NoWa => text_or_empty(&p.no_wa),
            Field::TanggalMasuk => Cell::Text(p.tanggal_masuk.format(DATE_FORMAT).to_string()),
        },
    }
}

/// Write `students` to an XLSX workbook, one row each after the header.
pub fn export_students<'a>(
    students: impl IntoIterator<Item = &'a Student>,
) -> Result<Vec<u8>, SantriError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, column) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, column.width)?;
        worksheet.write_string_with_format(0, col, column.header, &header_format)?;
    }

    for (idx, student) in students.into_iter().enumerate() {
        let row = (idx as u32).saturating_add(1);
        for (col, column) in COLUMNS.iter().enumerate() {
            let col = col as u16;
            match cell_for(student, column.source) {
                Cell::Number(n) => {
                    worksheet.write_number(row, col, n)?;
                }
                Cell::Text(text) => {
                    worksheet.write_string(row, col, text)?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

// =============================================================================
// IMPORT
// =============================================================================

/// A data row read from an uploaded workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// 1-based spreadsheet row number (the header is row 1).
    pub row_number: u32,
    pub input: StudentInput,
}

/// Read every data row of the first worksheet.
///
/// Row 1 is the header and is skipped. Rows with all 32 cells blank are
/// skipped too. Values in the system columns (No. Urut, No. Registrasi, NIS,
/// Umur) are not read back since they are reassigned on import, but they do
/// keep a row from counting as blank.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<SheetRow>, SantriError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SantriError::NoWorksheet)??;

    let Some((last_row, _)) = range.end() else {
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();
    for row in 1..=last_row {
        let mut input = StudentInput::default();
        let mut system_blank = true;
        for (col, column) in COLUMNS.iter().enumerate() {
            let text = range
                .get_value((row, col as u32))
                .map(cell_text)
                .unwrap_or_default();
            match column.source {
                Source::Input(field) => input.set(field, text),
                _ => system_blank &= text.is_empty(),
            }
        }
        if system_blank && input.is_blank() {
            continue;
        }
        rows.push(SheetRow {
            row_number: row.saturating_add(1),
            input,
        });
    }

    Ok(rows)
}

/// Text of a cell as a user would read it.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        // f64 Display prints integral values without a fraction.
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.date().format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.get(..10).unwrap_or(s).to_string(),
        other => other.to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
