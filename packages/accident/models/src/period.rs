//! Year-month keys used by the period filter.
//!
//! A [`YearMonth`] always renders as zero-padded `YYYY-MM`, and its ordering
//! matches the lexicographic ordering of that string.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike as _, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A calendar month, e.g. `2016-02`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

/// Error returned when a string is not a valid `YYYY-MM` key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid year-month '{value}': expected YYYY-MM")]
pub struct ParseYearMonthError {
    /// The rejected input.
    pub value: String,
}

impl YearMonth {
    /// Creates a key from a four-digit year and a month in `1..=12`.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if year < 1000 || year > 9999 || month < 1 || month > 12 {
            return None;
        }
        Some(Self { year, month })
    }

    /// Key of the month containing `dt`.
    #[must_use]
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month of year, `1..=12`.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Short display label such as `"Feb 2016"`.
    #[must_use]
    pub fn label(self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map_or_else(|| self.to_string(), |d| d.format("%b %Y").to_string())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseYearMonthError {
            value: s.to_string(),
        };

        let (year, month) = s.split_once('-').ok_or_else(err)?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }

        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ParseYearMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_zero_padded() {
        let ym = YearMonth::new(2016, 2).unwrap();
        assert_eq!(ym.to_string(), "2016-02");
        assert_eq!(ym.label(), "Feb 2016");
    }

    #[test]
    fn parses_valid_keys() {
        let ym: YearMonth = "2023-12".parse().unwrap();
        assert_eq!(ym.year(), 2023);
        assert_eq!(ym.month(), 12);
    }

    #[test]
    fn rejects_malformed_keys() {
        for bad in ["2023-1", "23-01", "2023-13", "2023-00", "2023/01", "", "abcd-ef"] {
            assert!(bad.parse::<YearMonth>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn ordering_matches_string_ordering() {
        let keys = ["2016-01", "2016-12", "2017-01", "2016-06", "2023-03", "2019-10"];
        let mut by_key: Vec<YearMonth> = keys.iter().map(|k| k.parse().unwrap()).collect();
        let mut by_string: Vec<&str> = keys.to_vec();

        by_key.sort();
        by_string.sort_unstable();

        let rendered: Vec<String> = by_key.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, by_string);
    }
}
