use std::cmp::Ordering;

use chrono::{DateTime, Days, NaiveDate};

/// A `DD/MM/YY` log date resolved for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDate {
    /// A calendar day. Strings without exactly three `/`-separated parts land
    /// on the Unix epoch, which sorts before every real log date.
    Day(NaiveDate),
    /// Three parts, but at least one is not an integer.
    Indeterminate,
}

impl LogDate {
    /// Parse `DD/MM/YY`. The year is read as `20YY`; month and day overflow
    /// roll into the neighbouring month/year (`32/01/24` is 1 Feb 2024).
    pub fn parse(s: &str) -> LogDate {
        let parts: Vec<&str> = s.split('/').collect();
        let [day, month, year] = parts.as_slice() else {
            return LogDate::Day(DateTime::UNIX_EPOCH.date_naive());
        };

        let fields = (
            day.trim().parse::<i64>(),
            month.trim().parse::<i64>(),
            format!("20{}", year.trim()).parse::<i64>(),
        );
        match fields {
            (Ok(d), Ok(m), Ok(y)) => {
                rolled_date(y, m, d).map_or(LogDate::Indeterminate, LogDate::Day)
            }
            _ => LogDate::Indeterminate,
        }
    }

    /// Ordering against another date; `None` when either side is indeterminate.
    pub fn compare(&self, other: &LogDate) -> Option<Ordering> {
        match (self, other) {
            (LogDate::Day(a), LogDate::Day(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Whether `self` falls strictly before `other`.
    pub fn is_before(&self, other: &LogDate) -> bool {
        self.compare(other) == Some(Ordering::Less)
    }

    /// Whether `self` falls strictly after `other`.
    pub fn is_after(&self, other: &LogDate) -> bool {
        self.compare(other) == Some(Ordering::Greater)
    }

    /// Sort key: real days in calendar order, indeterminate dates last.
    pub fn sort_key(&self) -> (bool, NaiveDate) {
        match self {
            LogDate::Day(d) => (false, *d),
            LogDate::Indeterminate => (true, NaiveDate::MAX),
        }
    }
}

/// First of the month `month` (1-based, may overflow) of `year`, shifted by
/// `day - 1` days.
fn rolled_date(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    let months = year.checked_mul(12)?.checked_add(month.checked_sub(1)?)?;
    let y = i32::try_from(months.div_euclid(12)).ok()?;
    let m = u32::try_from(months.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(y, m, 1)?;

    let offset = day.checked_sub(1)?;
    if offset >= 0 {
        first.checked_add_days(Days::new(offset.unsigned_abs()))
    } else {
        first.checked_sub_days(Days::new(offset.unsigned_abs()))
    }
}
