//! # Query Module
//!
//! Search and filtering over the record store.
//!
//! Results always come back in ascending `noUrut` order, the order of
//! [`StudentStore::list`].

use serde::{Deserialize, Serialize};

use crate::primitives::MAX_BUCKET_AGE;
use crate::store::StudentStore;
use crate::types::Student;

// =============================================================================
// AGE RANGES
// =============================================================================

/// One of the fixed age buckets used by filters and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgeBucket {
    /// Filter value, e.g. `16-18`.
    pub key: &'static str,
    /// Statistics label, e.g. `16-18 tahun`.
    pub label: &'static str,
    pub min: i32,
    /// Inclusive upper bound; `None` for the open-ended top bucket.
    pub max: Option<i32>,
}

impl AgeBucket {
    /// Whether `age` falls in the bucket.
    #[must_use]
    pub fn contains(&self, age: i32) -> bool {
        age >= self.min && self.max.is_none_or(|max| age <= max)
    }

    /// Statistics variant of [`contains`](Self::contains): the open top
    /// bucket stops at [`MAX_BUCKET_AGE`].
    #[must_use]
    pub fn contains_capped(&self, age: i32) -> bool {
        age >= self.min && age <= self.max.unwrap_or(MAX_BUCKET_AGE)
    }
}

/// The three buckets, youngest first.
pub const AGE_BUCKETS: [AgeBucket; 3] = [
    AgeBucket {
        key: "12-15",
        label: "12-15 tahun",
        min: 12,
        max: Some(15),
    },
    AgeBucket {
        key: "16-18",
        label: "16-18 tahun",
        min: 16,
        max: Some(18),
    },
    AgeBucket {
        key: "19+",
        label: "19+ tahun",
        min: 19,
        max: None,
    },
];

/// An `ageRange` filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgeRange {
    Bucket(AgeBucket),
    /// A value that names no bucket. Matches every record.
    Unrecognized(String),
}

impl AgeRange {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        AGE_BUCKETS
            .iter()
            .find(|bucket| bucket.key == value)
            .map(|bucket| AgeRange::Bucket(*bucket))
            .unwrap_or_else(|| AgeRange::Unrecognized(value.to_string()))
    }

    #[must_use]
    pub fn matches(&self, age: i32) -> bool {
        match self {
            AgeRange::Bucket(bucket) => bucket.contains(age),
            AgeRange::Unrecognized(_) => true,
        }
    }

    #[must_use]
    pub fn is_recognized(&self) -> bool {
        matches!(self, AgeRange::Bucket(_))
    }
}

// =============================================================================
// FILTER
// =============================================================================

/// Conjunctive filter criteria. Missing or empty criteria are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFilter {
    pub kelas: Option<String>,
    pub desa: Option<String>,
    pub age_range: Option<String>,
    pub jenis_kelamin: Option<String>,
}

impl StudentFilter {
    /// Whether at least one criterion is set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        [&self.kelas, &self.desa, &self.age_range, &self.jenis_kelamin]
            .into_iter()
            .any(|c| criterion(c).is_some())
    }

    /// The parsed `ageRange` criterion, if any.
    #[must_use]
    pub fn age_range(&self) -> Option<AgeRange> {
        criterion(&self.age_range).map(AgeRange::parse)
    }

    /// Whether `student` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, student: &Student) -> bool {
        let profile = &student.profile;

        if criterion(&self.kelas).is_some_and(|kelas| profile.kelas != kelas) {
            return false;
        }
        if criterion(&self.desa).is_some_and(|desa| profile.desa != desa) {
            return false;
        }
        if criterion(&self.jenis_kelamin)
            .is_some_and(|code| profile.jenis_kelamin.code() != code)
        {
            return false;
        }
        self.age_range()
            .is_none_or(|range| range.matches(student.umur))
    }
}

fn criterion(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// =============================================================================
// QUERY
// =============================================================================

/// A listing request as the API sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentQuery {
    /// Every record.
    All,
    /// Case-insensitive substring search on name, NIS, NIK and registration number.
    Search(String),
    /// Conjunctive filter.
    Filter(StudentFilter),
}

impl StudentQuery {
    /// Pick the query for a listing request: a non-empty search wins over
    /// filters, and a filter without criteria lists everything.
    #[must_use]
    pub fn from_params(search: Option<&str>, filter: StudentFilter) -> Self {
        match search.filter(|s| !s.is_empty()) {
            Some(text) => StudentQuery::Search(text.to_string()),
            None if filter.is_active() => StudentQuery::Filter(filter),
            None => StudentQuery::All,
        }
    }

    /// Run against the store.
    #[must_use]
    pub fn execute<'a>(&self, store: &'a StudentStore) -> Vec<&'a Student> {
        match self {
            StudentQuery::All => store.list().collect(),
            StudentQuery::Search(text) => search(store, text),
            StudentQuery::Filter(filter) => filter_students(store, filter),
        }
    }
}

/// Records whose name, NIS, NIK or registration number contains `text`,
/// ignoring case.
#[must_use]
pub fn search<'a>(store: &'a StudentStore, text: &str) -> Vec<&'a Student> {
    let needle = text.to_lowercase();
    store
        .list()
        .filter(|student| {
            [
                student.profile.nama.as_str(),
                student.nis.as_str(),
                student.profile.nik.as_str(),
                student.no_reg.as_str(),
            ]
            .into_iter()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Records matching every criterion of `filter`.
#[must_use]
pub fn filter_students<'a>(store: &'a StudentStore, filter: &StudentFilter) -> Vec<&'a Student> {
    store.list().filter(|student| filter.matches(student)).collect()
}

// =============================================================================
// TESTS
// =============================================================================
