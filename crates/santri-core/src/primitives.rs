//! # Primitives
//!
//! Derived-field rules shared by the store, the query engine and the
//! statistics aggregator: sequence numbering and calendar age.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Width of the zero-padded sequence part of `noReg` and `nis`.
pub const SEQUENCE_WIDTH: usize = 3;

/// Iteration cap for the open-ended top age bucket in statistics.
pub const MAX_BUCKET_AGE: i32 = 100;

// =============================================================================
// SEQUENCE
// =============================================================================

/// The identity triple handed out to every new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    pub no_urut: u32,
    pub no_reg: String,
    pub nis: String,
}

impl Sequence {
    /// Format the triple for sequence number `no_urut` issued in `year`.
    ///
    /// `noReg = REG-{year}-{noUrut:03}` and `nis = {year}{noUrut:03}`.
    #[must_use]
    pub fn new(no_urut: u32, year: i32) -> Self {
        Self {
            no_urut,
            no_reg: format!("REG-{year}-{no_urut:0width$}", width = SEQUENCE_WIDTH),
            nis: format!("{year}{no_urut:0width$}", width = SEQUENCE_WIDTH),
        }
    }
}

// =============================================================================
// AGE
// =============================================================================

/// Age in whole years on `today`.
///
/// Calendar year difference, minus one when today's (month, day) falls
/// before the birthday's (month, day).
#[must_use]
pub fn calendar_age(birth: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years - 1
    } else {
        years
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn sequence_is_zero_padded() {
        let seq = Sequence::new(7, 2024);
        assert_eq!(seq.no_reg, "REG-2024-007");
        assert_eq!(seq.nis, "2024007");
    }

    #[test]
    fn sequence_beyond_padding_keeps_all_digits() {
        let seq = Sequence::new(1234, 2025);
        assert_eq!(seq.no_reg, "REG-2025-1234");
        assert_eq!(seq.nis, "20251234");
    }

    #[test]
    fn age_after_birthday() {
        assert_eq!(calendar_age(date(2008, 3, 20), date(2024, 7, 15)), 16);
    }

    #[test]
    fn age_before_birthday() {
        assert_eq!(calendar_age(date(2006, 12, 10), date(2024, 7, 15)), 17);
    }

    #[test]
    fn age_on_birthday_boundary() {
        assert_eq!(calendar_age(date(2008, 7, 15), date(2024, 7, 15)), 16);
        assert_eq!(calendar_age(date(2008, 7, 16), date(2024, 7, 15)), 15);
    }

    #[test]
    fn leap_day_birthday() {
        assert_eq!(calendar_age(date(2008, 2, 29), date(2023, 2, 28)), 14);
        assert_eq!(calendar_age(date(2008, 2, 29), date(2023, 3, 1)), 15);
    }
}
