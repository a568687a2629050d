//! Sample records for demos and the spreadsheet template.

use chrono::NaiveDate;

use crate::store::StudentStore;
use crate::types::{Gender, StudentId, StudentProfile};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn some(value: &str) -> Option<String> {
    Some(value.to_string())
}

/// The three sample students, in creation order.
#[must_use]
pub fn sample_profiles() -> Vec<StudentProfile> {
    vec![
        StudentProfile {
            nama: "Ahmad Fadli Rahman".to_string(),
            nik: "3201234567890123".to_string(),
            no_kk: "3201234567890123".to_string(),
            jenis_kelamin: Gender::Male,
            tempat_lahir: "Jakarta".to_string(),
            tanggal_lahir: date(2007, 5, 15),
            agama: "Islam".to_string(),
            kewarganegaraan: "WNI".to_string(),
            anak_ke: Some(1),
            jumlah_saudara: Some(2),
            alamat: "Jl. Masjid No. 15 RT 01 RW 02".to_string(),
            rt: some("001"),
            rw: some("002"),
            desa: "Sukamaju".to_string(),
            dusun: some("Mekar"),
            kecamatan: "Cibitung".to_string(),
            kabupaten: "Bekasi".to_string(),
            provinsi: "Jawa Barat".to_string(),
            nama_ayah: "Budi Rahman".to_string(),
            nik_ayah: some("3201234567890124"),
            pekerjaan_ayah: some("Petani"),
            nama_ibu: "Siti Aminah".to_string(),
            nik_ibu: some("3201234567890125"),
            pekerjaan_ibu: some("Ibu Rumah Tangga"),
            kelas: "VII A".to_string(),
            keterangan: some("Santri reguler"),
            no_wa: some("081234567890"),
            tanggal_masuk: date(2024, 7, 15),
        },
        StudentProfile {
            nama: "Fatimah Zahra".to_string(),
            nik: "3201234567890126".to_string(),
            no_kk: "3201234567890127".to_string(),
            jenis_kelamin: Gender::Female,
            tempat_lahir: "Bandung".to_string(),
            tanggal_lahir: date(2008, 3, 20),
            agama: "Islam".to_string(),
            kewarganegaraan: "WNI".to_string(),
            anak_ke: Some(2),
            jumlah_saudara: Some(1),
            alamat: "Jl. Pesantren No. 25 RT 03 RW 01".to_string(),
            rt: some("003"),
            rw: some("001"),
            desa: "Sukahati".to_string(),
            dusun: some("Indah"),
            kecamatan: "Cibitung".to_string(),
            kabupaten: "Bekasi".to_string(),
            provinsi: "Jawa Barat".to_string(),
            nama_ayah: "Ali Hassan".to_string(),
            nik_ayah: some("3201234567890128"),
            pekerjaan_ayah: some("Guru"),
            nama_ibu: "Khadijah".to_string(),
            nik_ibu: some("3201234567890129"),
            pekerjaan_ibu: some("Pedagang"),
            kelas: "VIII B".to_string(),
            keterangan: some("Santri berprestasi"),
            no_wa: some("081234567891"),
            tanggal_masuk: date(2023, 7, 15),
        },
        StudentProfile {
            nama: "Muhammad Iqbal".to_string(),
            nik: "3201234567890130".to_string(),
            no_kk: "3201234567890131".to_string(),
            jenis_kelamin: Gender::Male,
            tempat_lahir: "Bogor".to_string(),
            tanggal_lahir: date(2006, 12, 10),
            agama: "Islam".to_string(),
            kewarganegaraan: "WNI".to_string(),
            anak_ke: Some(3),
            jumlah_saudara: Some(2),
            alamat: "Jl. Pondok No. 8 RT 02 RW 03".to_string(),
            rt: some("002"),
            rw: some("003"),
            desa: "Sukamaju".to_string(),
            dusun: some("Sejahtera"),
            kecamatan: "Tambun".to_string(),
            kabupaten: "Bekasi".to_string(),
            provinsi: "Jawa Barat".to_string(),
            nama_ayah: "Usman Hakim".to_string(),
            nik_ayah: some("3201234567890132"),
            pekerjaan_ayah: some("Buruh"),
            nama_ibu: "Aisyah".to_string(),
            nik_ibu: some("3201234567890133"),
            pekerjaan_ibu: some("Ibu Rumah Tangga"),
            kelas: "IX A".to_string(),
            keterangan: None,
            no_wa: some("081234567892"),
            tanggal_masuk: date(2022, 7, 15),
        },
    ]
}

/// Create the sample students in `store` as of `today`.
pub fn seed_store(store: &mut StudentStore, today: NaiveDate) -> Vec<StudentId> {
    sample_profiles()
        .into_iter()
        .map(|profile| store.create_at(profile, today).id)
        .collect()
}
