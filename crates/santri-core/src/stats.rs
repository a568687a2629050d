//! # Statistics Aggregator
//!
//! Dashboard figures derived from the full record set.
//!
//! Everything is recomputed on each call; nothing is cached or maintained
//! incrementally. Sums and the average are kept in integer tenths so the
//! only floating-point step is the final conversion for output.

use serde::{Deserialize, Serialize};

use crate::query::AGE_BUCKETS;
use crate::types::{Gender, Student};

/// Number of students in one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCount {
    pub kelas: String,
    pub count: usize,
}

/// Number of students in one age bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeRangeCount {
    pub age_range: String,
    pub count: usize,
}

/// Summary statistics for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub total_students: usize,
    pub male_students: usize,
    pub female_students: usize,
    /// Mean age rounded to one decimal place; `0` without records.
    pub average_age: f64,
    /// One entry per distinct class, in order of first appearance.
    pub students_by_class: Vec<ClassCount>,
    /// Always the three fixed buckets, youngest first.
    pub age_distribution: Vec<AgeRangeCount>,
}

impl StudentStats {
    /// Aggregate over `students`.
    pub fn compute<'a>(students: impl IntoIterator<Item = &'a Student>) -> Self {
        let mut total: usize = 0;
        let mut male: usize = 0;
        let mut female: usize = 0;
        let mut age_sum: i64 = 0;
        let mut by_class: Vec<ClassCount> = Vec::new();
        let mut buckets = [0usize; AGE_BUCKETS.len()];

        for student in students {
            total += 1;
            match student.profile.jenis_kelamin {
                Gender::Male => male += 1,
                Gender::Female => female += 1,
            }
            age_sum += i64::from(student.umur);

            match by_class.iter_mut().find(|c| c.kelas == student.profile.kelas) {
                Some(entry) => entry.count += 1,
                None => by_class.push(ClassCount {
                    kelas: student.profile.kelas.clone(),
                    count: 1,
                }),
            }

            for (slot, bucket) in buckets.iter_mut().zip(AGE_BUCKETS.iter()) {
                if bucket.contains_capped(student.umur) {
                    *slot += 1;
                }
            }
        }

        let age_distribution = AGE_BUCKETS
            .iter()
            .zip(buckets)
            .map(|(bucket, count)| AgeRangeCount {
                age_range: bucket.label.to_string(),
                count,
            })
            .collect();

        Self {
            total_students: total,
            male_students: male,
            female_students: female,
            average_age: tenths_to_f64(average_tenths(age_sum, total)),
            students_by_class: by_class,
            age_distribution,
        }
    }
}

/// Mean of `sum / count` in tenths, rounded half away from zero.
fn average_tenths(sum: i64, count: usize) -> i64 {
    let Ok(count) = i64::try_from(count) else {
        return 0;
    };
    if count == 0 {
        return 0;
    }
    let scaled = sum.saturating_mul(20);
    let rounded = (scaled.abs() + count) / (count * 2);
    if scaled < 0 { -rounded } else { rounded }
}

#[allow(clippy::float_arithmetic)]
fn tenths_to_f64(tenths: i64) -> f64 {
    tenths as f64 / 10.0
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StudentStore;
    use crate::types::StudentProfile;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    fn store_with(rows: &[(i32, &str, Gender)]) -> StudentStore {
        let mut store = StudentStore::new();
        for (year, kelas, gender) in rows {
            store.create_at(
                StudentProfile {
                    jenis_kelamin: *gender,
                    tanggal_lahir: date(*year, 1, 1),
                    kelas: (*kelas).to_string(),
                    ..StudentProfile::default()
                },
                date(2024, 7, 15),
            );
        }
        store
    }

    #[test]
    fn empty_store_yields_zeroes() {
        let stats = StudentStats::compute(StudentStore::new().list());
        assert_eq!(stats.total_students, 0);
        assert_eq!(stats.male_students, 0);
        assert_eq!(stats.female_students, 0);
        assert_eq!(stats.average_age.to_string(), "0");
        assert!(stats.students_by_class.is_empty());
        assert_eq!(stats.age_distribution.len(), 3);
        assert!(stats.age_distribution.iter().all(|b| b.count == 0));
    }

    #[test]
    fn counts_and_average() {
        // Ages 17, 16, 17.
        let store = store_with(&[
            (2007, "VII A", Gender::Male),
            (2008, "VIII B", Gender::Female),
            (2007, "VII A", Gender::Male),
        ]);
        let stats = StudentStats::compute(store.list());

        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.male_students, 2);
        assert_eq!(stats.female_students, 1);
        assert_eq!(stats.average_age.to_string(), "16.7");
        assert_eq!(
            stats.students_by_class,
            vec![
                ClassCount {
                    kelas: "VII A".to_string(),
                    count: 2
                },
                ClassCount {
                    kelas: "VIII B".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn age_distribution_uses_fixed_buckets() {
        // Ages 13, 16, 18, 19, 130.
        let store = store_with(&[
            (2011, "A", Gender::Male),
            (2008, "A", Gender::Male),
            (2006, "A", Gender::Male),
            (2005, "A", Gender::Male),
            (1894, "A", Gender::Male),
        ]);
        let stats = StudentStats::compute(store.list());

        let labels: Vec<_> = stats
            .age_distribution
            .iter()
            .map(|b| (b.age_range.as_str(), b.count))
            .collect();
        assert_eq!(
            labels,
            vec![("12-15 tahun", 1), ("16-18 tahun", 2), ("19+ tahun", 1)]
        );
    }

    #[test]
    fn average_rounds_half_up() {
        assert_eq!(average_tenths(33, 2), 165);
        assert_eq!(average_tenths(100, 3), 333);
        assert_eq!(average_tenths(50, 3), 167);
        assert_eq!(average_tenths(0, 0), 0);
    }

    #[test]
    fn serializes_with_dashboard_keys() {
        let stats = StudentStats::compute(StudentStore::new().list());
        let json = serde_json::to_value(&stats).unwrap_or_default();
        assert_eq!(json["totalStudents"], 0);
        assert_eq!(json["averageAge"], 0.0);
        assert!(json["studentsByClass"].as_array().is_some_and(|a| a.is_empty()));
        assert_eq!(json["ageDistribution"][2]["ageRange"], "19+ tahun");
    }
}
