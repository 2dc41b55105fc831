use crate::error::{FpaError, Result};
use chrono::{Months, NaiveDate};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed reporting interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
}

impl Period {
    pub fn start_date(&self) -> NaiveDate {
        let (year, month) = match *self {
            Period::Month { year, month } => (year, month),
            Period::Quarter { year, quarter } => {
                (year, quarter.saturating_sub(1).saturating_mul(3).saturating_add(1))
            }
        };
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn end_date(&self) -> NaiveDate {
        match *self {
            Period::Month { year, month } => last_day_of_month(year, month),
            Period::Quarter { year, quarter } => last_day_of_month(year, quarter.saturating_mul(3)),
        }
    }
}

impl Ord for Period {
    // Starts first; a quarter sorts before its own first month.
    fn cmp(&self, other: &Self) -> Ordering {
        self.start_date()
            .cmp(&other.start_date())
            .then_with(|| other.end_date().cmp(&self.end_date()))
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Period::Quarter { year, quarter } => write!(f, "{:04}-Q{}", year, quarter),
        }
    }
}

impl FromStr for Period {
    type Err = FpaError;

    fn from_str(s: &str) -> Result<Self> {
        parse_period(s)
    }
}

/// Parses `YYYY-MM`, `YYYY-Qn` or `Qn YYYY`.
pub fn parse_period(key: &str) -> Result<Period> {
    let invalid = || FpaError::InvalidPeriod(key.to_string());
    let trimmed = key.trim().to_ascii_uppercase();

    if let Some(rest) = trimmed.strip_prefix('Q') {
        let (quarter, year) = rest.split_once([' ', '-']).ok_or_else(invalid)?;
        return quarter_period(year, quarter).ok_or_else(invalid);
    }

    let (year, tail) = trimmed.split_once('-').ok_or_else(invalid)?;
    if let Some(quarter) = tail.strip_prefix('Q') {
        return quarter_period(year, quarter).ok_or_else(invalid);
    }

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = tail.parse().map_err(|_| invalid())?;
    if !is_supported_year(year) || !(1..=12).contains(&month) {
        return Err(invalid());
    }

    Ok(Period::Month { year, month })
}

fn quarter_period(year: &str, quarter: &str) -> Option<Period> {
    let year: i32 = year.trim().parse().ok()?;
    let quarter: u32 = quarter.trim().parse().ok()?;
    if !is_supported_year(year) || !(1..=4).contains(&quarter) {
        return None;
    }
    Some(Period::Quarter { year, quarter })
}

// The whole year, through 31 December, must be a representable date.
fn is_supported_year(year: i32) -> bool {
    year >= 1
        && NaiveDate::from_ymd_opt(year, 1, 1).is_some()
        && NaiveDate::from_ymd_opt(year, 12, 31).is_some()
}

/// Orders period keys chronologically. Keys that do not parse keep their
/// lexical order and follow every parseable key.
pub fn sort_periods<S: AsRef<str>>(keys: &mut [S]) {
    keys.sort_by(|a, b| compare_period_keys(a.as_ref(), b.as_ref()));
}

pub fn compare_period_keys(a: &str, b: &str) -> Ordering {
    match (parse_period(a), parse_period(b)) {
        (Ok(pa), Ok(pb)) => pa.cmp(&pb).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Last calendar day of `month`. Dates chrono cannot represent saturate to
/// [`NaiveDate::MAX`].
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .or_else(|| {
            // December of chrono's final year has no following month.
            (month == 12)
                .then(|| NaiveDate::from_ymd_opt(year, 12, 31))
                .flatten()
        })
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        let period = parse_period("2024-03").unwrap();
        assert_eq!(period, Period::Month { year: 2024, month: 3 });
        assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(period.end_date(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    }

    #[test]
    fn test_parse_quarter_forms() {
        let expected = Period::Quarter { year: 2023, quarter: 2 };
        assert_eq!(parse_period("2023-Q2").unwrap(), expected);
        assert_eq!(parse_period("2023-q2").unwrap(), expected);
        assert_eq!(parse_period("Q2 2023").unwrap(), expected);
        assert_eq!(expected.end_date(), NaiveDate::from_ymd_opt(2023, 6, 30).unwrap());
    }

    #[test]
    fn test_parse_invalid() {
        for key in ["2024-13", "2024-Q5", "March", "", "2024", "Q0 2024"] {
            assert!(parse_period(key).is_err(), "{key} should not parse");
        }
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2023, 2), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
        assert_eq!(last_day_of_month(2024, 2), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(last_day_of_month(2023, 12), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_sort_periods_is_chronological() {
        let mut keys = vec!["2024-02", "Budget Total", "2023-12", "2024-Q1", "2024-01"];
        sort_periods(&mut keys);
        assert_eq!(keys, vec!["2023-12", "2024-Q1", "2024-01", "2024-02", "Budget Total"]);
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(parse_period("Q4 2022").unwrap().to_string(), "2022-Q4");
        assert_eq!(parse_period("2021-7").unwrap().to_string(), "2021-07");
    }

    #[test]
    fn test_years_beyond_calendar_range_are_rejected() {
        for key in ["2147483647-12", "2147483647-Q4", "Q4 2147483647", "300000-01"] {
            assert!(parse_period(key).is_err(), "{key} should not parse");
        }
        assert!(parse_period("262000-12").is_ok());
    }

    #[test]
    fn test_out_of_range_keys_sort_after_valid_ones() {
        let mut keys = vec!["2147483647-12", "300000-01", "2024-01", "1000000-01"];
        sort_periods(&mut keys);
        assert_eq!(keys, vec!["2024-01", "1000000-01", "2147483647-12", "300000-01"]);
    }

    #[test]
    fn test_last_day_of_month_saturates() {
        assert_eq!(last_day_of_month(i32::MAX, 12), NaiveDate::MAX);
        assert_eq!(last_day_of_month(2024, 0), NaiveDate::MAX);
        assert_eq!(last_day_of_month(2024, u32::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_hand_built_quarter_zero_does_not_underflow() {
        let period = Period::Quarter { year: 2024, quarter: 0 };
        assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(period.end_date(), NaiveDate::MAX);

        let huge = Period::Quarter { year: 2024, quarter: u32::MAX };
        assert_eq!(huge.start_date(), NaiveDate::MIN);
        assert_eq!(huge.end_date(), NaiveDate::MAX);
    }
}
