//! Property tests for the record store, query engine and spreadsheet layout.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use santri_core::{
    Field, Ingestor, StudentFilter, StudentInput, StudentProfile, StudentStore, calendar_age,
    export_students, sample_profiles,
};

// =============================================================================
// STRATEGIES
// =============================================================================

fn date_strategy(min_year: i32, max_year: i32) -> impl Strategy<Value = NaiveDate> {
    (min_year..=max_year, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn profile_with_birth(birth: NaiveDate) -> StudentProfile {
    let mut profile = sample_profiles().remove(0);
    profile.tanggal_lahir = birth;
    profile
}

/// Printable text without leading/trailing whitespace.
fn text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 .,/-]{0,20}[A-Za-z0-9]"
}

// =============================================================================
// STORE PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn sequence_numbers_are_unique_and_formatted(count in 1usize..40) {
        let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let mut store = StudentStore::new();
        for _ in 0..count {
            store.create_at(profile_with_birth(NaiveDate::from_ymd_opt(2008, 1, 1).unwrap()), today);
        }

        let nis: BTreeSet<_> = store.list().map(|s| s.nis.clone()).collect();
        let regs: BTreeSet<_> = store.list().map(|s| s.no_reg.clone()).collect();
        prop_assert_eq!(nis.len(), count);
        prop_assert_eq!(regs.len(), count);

        for student in store.list() {
            prop_assert_eq!(&student.nis, &format!("2024{:03}", student.no_urut));
            prop_assert_eq!(&student.no_reg, &format!("REG-2024-{:03}", student.no_urut));
        }
    }

    #[test]
    fn age_drops_by_one_before_birthday(
        birth in date_strategy(1950, 2020),
        today in date_strategy(2021, 2030),
    ) {
        let age = calendar_age(birth, today);
        let before_birthday = (today.month(), today.day()) < (birth.month(), birth.day());
        let expected = today.year() - birth.year() - i32::from(before_birthday);
        prop_assert_eq!(age, expected);
    }

    #[test]
    fn bucket_filter_returns_exact_ages(ages in prop::collection::vec(5i32..40, 1..30)) {
        let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let mut store = StudentStore::new();
        for age in &ages {
            let birth = NaiveDate::from_ymd_opt(2024 - age, 1, 1).unwrap();
            store.create_at(profile_with_birth(birth), today);
        }

        let pick = |key: &str| {
            let filter = StudentFilter { age_range: Some(key.to_string()), ..StudentFilter::default() };
            santri_core::query::filter_students(&store, &filter)
                .iter()
                .map(|s| s.umur)
                .collect::<Vec<_>>()
        };

        let middle = pick("16-18");
        prop_assert!(middle.iter().all(|a| (16..=18).contains(a)));
        prop_assert_eq!(middle.len(), ages.iter().filter(|a| (16..=18).contains(*a)).count());

        let top = pick("19+");
        prop_assert!(top.iter().all(|a| *a >= 19));
        prop_assert_eq!(top.len(), ages.iter().filter(|a| **a >= 19).count());
    }

    #[test]
    fn delete_keeps_order_and_removes_record(count in 2usize..20, victim in 0usize..20) {
        let mut store = StudentStore::new();
        let ids: Vec<_> = (0..count)
            .map(|_| store.create(profile_with_birth(NaiveDate::from_ymd_opt(2008, 1, 1).unwrap())).id)
            .collect();
        let victim = ids[victim % count];

        prop_assert!(store.delete(victim));
        prop_assert!(store.get(victim).is_none());
        prop_assert!(!store.delete(victim));

        let order: Vec<_> = store.list().map(|s| s.no_urut).collect();
        prop_assert_eq!(order.len(), count - 1);
        prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(store.list().all(|s| s.id != victim));
    }

    #[test]
    fn export_import_preserves_fields(
        nama in text_strategy(),
        kelas in text_strategy(),
        desa in text_strategy(),
        anak_ke in prop::option::of(1u32..15),
        birth in date_strategy(1990, 2015),
    ) {
        let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let mut profile = profile_with_birth(birth);
        profile.nama = nama;
        profile.kelas = kelas;
        profile.desa = desa;
        profile.anak_ke = anak_ke;
        profile.rw = None;

        let mut source = StudentStore::new();
        source.create_at(profile.clone(), today);
        let bytes = export_students(source.list()).unwrap();

        let mut target = StudentStore::new();
        let report = Ingestor::ingest_workbook(&mut target, &bytes, today).unwrap();
        prop_assert_eq!(report.imported, 1);
        prop_assert!(report.errors.is_empty());

        let imported = target.list().next().unwrap();
        prop_assert_eq!(&imported.profile, &profile);
    }
}

// =============================================================================
// FIXED CASES
// =============================================================================

#[test]
fn reference_birth_date_age() {
    let birth = NaiveDate::from_ymd_opt(2008, 3, 20).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
    assert_eq!(calendar_age(birth, today), 16);
}

#[test]
fn updating_birth_date_only_changes_age() {
    let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
    let mut store = StudentStore::new();
    let before = store
        .create_at(profile_with_birth(NaiveDate::from_ymd_opt(2008, 3, 20).unwrap()), today)
        .clone();

    let patch = StudentInput::from_fields([(Field::TanggalLahir, "2010-01-01")])
        .validate_patch()
        .unwrap();
    let after = store.update_at(before.id, patch, today).unwrap().clone();

    let mut expected = before.clone();
    expected.profile.tanggal_lahir = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
    expected.umur = 14;
    assert_eq!(after, expected);

    let patch = StudentInput::from_fields([(Field::Kelas, "IX B")])
        .validate_patch()
        .unwrap();
    let later = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    let renamed = store.update_at(before.id, patch, later).unwrap();
    assert_eq!(renamed.umur, 14);
    assert_eq!(renamed.profile.kelas, "IX B");
}
