//! # Record Store
//!
//! The in-memory student store for Santri CORE.
//!
//! Records are kept in a `BTreeMap` keyed by sequence number (`noUrut`), so
//! every listing comes out in ascending `noUrut` order without relying on
//! insertion order. A second map indexes record ids to sequence numbers.
//!
//! The store is a plain value: the process entry point constructs it and
//! hands it to whoever needs it. There is no global instance.

use chrono::{Datelike, Local, NaiveDate};
use std::collections::BTreeMap;

use crate::primitives::{Sequence, calendar_age};
use crate::schema::StudentPatch;
use crate::types::{Student, StudentId, StudentProfile};

/// The main record store.
#[derive(Debug, Clone)]
pub struct StudentStore {
    /// Record storage: noUrut -> Student
    records: BTreeMap<u32, Student>,

    /// Reverse lookup: StudentId -> noUrut
    id_index: BTreeMap<StudentId, u32>,

    /// Next id to assign. Never reused.
    next_id: u64,

    /// Next sequence number to assign. Never reused.
    next_sequence: u32,
}

impl Default for StudentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentStore {
    /// Create an empty store. Ids and sequence numbers start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            id_index: BTreeMap::new(),
            next_id: 1,
            next_sequence: 1,
        }
    }

    /// Lookup a record by id.
    #[must_use]
    pub fn get(&self, id: StudentId) -> Option<&Student> {
        let no_urut = self.id_index.get(&id)?;
        self.records.get(no_urut)
    }

    /// Lookup a record by sequence number.
    #[must_use]
    pub fn get_by_no_urut(&self, no_urut: u32) -> Option<&Student> {
        self.records.get(&no_urut)
    }

    /// All records in ascending `noUrut` order.
    pub fn list(&self) -> impl Iterator<Item = &Student> {
        self.records.values()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Create a record, deriving age and sequence from the local date.
    pub fn create(&mut self, profile: StudentProfile) -> &Student {
        self.create_at(profile, today())
    }

    /// Create a record as of `today`.
    ///
    /// Assigns the next id and the next `(noUrut, noReg, nis)` triple,
    /// using `today`'s calendar year for the formatted numbers.
    pub fn create_at(&mut self, profile: StudentProfile, today: NaiveDate) -> &Student {
        let sequence = self.next_sequence(today.year());

        let id = StudentId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        let student = Student {
            id,
            no_urut: sequence.no_urut,
            no_reg: sequence.no_reg,
            nis: sequence.nis,
            umur: calendar_age(profile.tanggal_lahir, today),
            profile,
        };

        let no_urut = student.no_urut;
        self.id_index.insert(id, no_urut);
        self.records.entry(no_urut).or_insert(student)
    }

    /// Apply a partial update, deriving age from the local date.
    pub fn update(&mut self, id: StudentId, patch: StudentPatch) -> Option<&Student> {
        self.update_at(id, patch, today())
    }

    /// Apply a partial update as of `today`.
    ///
    /// Age is recomputed only when the patch carries a birth date.
    /// Identity fields are never touched. Returns `None` for an unknown id.
    pub fn update_at(
        &mut self,
        id: StudentId,
        patch: StudentPatch,
        today: NaiveDate,
    ) -> Option<&Student> {
        let no_urut = *self.id_index.get(&id)?;
        let student = self.records.get_mut(&no_urut)?;

        let birth_changed = patch.tanggal_lahir.is_some();
        patch.apply_to(&mut student.profile);
        if birth_changed {
            student.umur = calendar_age(student.profile.tanggal_lahir, today);
        }

        Some(&*student)
    }

    /// Remove a record. Returns whether it existed.
    pub fn delete(&mut self, id: StudentId) -> bool {
        match self.id_index.remove(&id) {
            Some(no_urut) => self.records.remove(&no_urut).is_some(),
            None => false,
        }
    }

    /// Hand out the next sequence triple for `year`.
    fn next_sequence(&mut self, year: i32) -> Sequence {
        let no_urut = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        Sequence::new(no_urut, year)
    }
}

/// The local calendar date.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gender;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    fn profile(nama: &str, birth: NaiveDate) -> StudentProfile {
        StudentProfile {
            nama: nama.to_string(),
            jenis_kelamin: Gender::Male,
            tanggal_lahir: birth,
            kelas: "VII A".to_string(),
            ..StudentProfile::default()
        }
    }

    #[test]
    fn create_assigns_identity_and_age() {
        let mut store = StudentStore::new();
        let today = date(2024, 7, 15);

        let student = store.create_at(profile("Fatimah", date(2008, 3, 20)), today);

        assert_eq!(student.id, StudentId(1));
        assert_eq!(student.no_urut, 1);
        assert_eq!(student.no_reg, "REG-2024-001");
        assert_eq!(student.nis, "2024001");
        assert_eq!(student.umur, 16);
    }

    #[test]
    fn get_and_list_in_sequence_order() {
        let mut store = StudentStore::new();
        let today = date(2024, 7, 15);
        store.create_at(profile("A", date(2008, 1, 1)), today);
        store.create_at(profile("B", date(2008, 1, 1)), today);
        store.create_at(profile("C", date(2008, 1, 1)), today);

        let names: Vec<_> = store.list().map(|s| s.profile.nama.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(store.get(StudentId(2)).map(|s| s.no_urut), Some(2));
        assert!(store.get(StudentId(99)).is_none());
    }

    #[test]
    fn delete_leaves_gap_and_never_reuses_numbers() {
        let mut store = StudentStore::new();
        let today = date(2024, 7, 15);
        store.create_at(profile("A", date(2008, 1, 1)), today);
        store.create_at(profile("B", date(2008, 1, 1)), today);

        assert!(store.delete(StudentId(2)));
        assert!(!store.delete(StudentId(2)));
        assert!(store.get(StudentId(2)).is_none());

        let c = store.create_at(profile("C", date(2008, 1, 1)), today);
        assert_eq!(c.id, StudentId(3));
        assert_eq!(c.no_urut, 3);

        let sequence: Vec<_> = store.list().map(|s| s.no_urut).collect();
        assert_eq!(sequence, vec![1, 3]);
    }

    #[test]
    fn update_birth_date_recomputes_age() {
        let mut store = StudentStore::new();
        let today = date(2024, 7, 15);
        store.create_at(profile("A", date(2008, 3, 20)), today);

        let patch = StudentPatch {
            tanggal_lahir: Some(date(2010, 12, 1)),
            ..StudentPatch::default()
        };
        let updated = store.update_at(StudentId(1), patch, today);

        assert_eq!(updated.map(|s| s.umur), Some(13));
        assert_eq!(updated.map(|s| s.profile.nama.as_str()), Some("A"));
    }

    #[test]
    fn update_other_field_keeps_age() {
        let mut store = StudentStore::new();
        store.create_at(profile("A", date(2008, 3, 20)), date(2024, 7, 15));

        // A later "today" would give a different age if it were recomputed.
        let patch = StudentPatch {
            kelas: Some("IX A".to_string()),
            ..StudentPatch::default()
        };
        let updated = store.update_at(StudentId(1), patch, date(2030, 1, 1));

        assert_eq!(updated.map(|s| s.umur), Some(16));
        assert_eq!(updated.map(|s| s.profile.kelas.as_str()), Some("IX A"));
        assert_eq!(updated.map(|s| s.no_reg.as_str()), Some("REG-2024-001"));
    }

    #[test]
    fn update_unknown_id_returns_none() {
        let mut store = StudentStore::new();
        assert!(
            store
                .update_at(StudentId(5), StudentPatch::default(), date(2024, 1, 1))
                .is_none()
        );
    }

    #[test]
    fn year_comes_from_creation_date() {
        let mut store = StudentStore::new();
        store.create_at(profile("A", date(2008, 1, 1)), date(2024, 12, 31));
        let b = store.create_at(profile("B", date(2008, 1, 1)), date(2025, 1, 1));
        assert_eq!(b.no_reg, "REG-2025-002");
        assert_eq!(b.nis, "2025002");
    }
}
