//! Filename stamp detection.
//!
//! Classifies a file name as carrying a date (`2010-12-31_report.txt`) or a
//! date and time of day (`2011-08-29T08.23.59_test.pdf`) at its start. The
//! patterns only check the shape of the digits; whether the captured fields
//! form a real calendar value is decided later by [`DateStamp::to_date`] and
//! [`TimeStamp::to_date_time`].

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};

use crate::error::{EngineError, Result};

/// Suffix used by editor backup files (`notes.txt~`).
pub const BACKUP_SUFFIX: char = '~';

static DATE_STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([12][0-9]{3})-([01][0-9])-([0-3][0-9])").expect("date stamp pattern is valid")
});

static TIME_STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([12][0-9]{3})-([01][0-9])-([0-3][0-9])T([0-2][0-9])\.([0-5][0-9])(?:\.([0-5][0-9]))?",
    )
    .expect("time stamp pattern is valid")
});

/// Year, month and day as captured from a file name. Not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateStamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// A [`DateStamp`] followed by a time of day. Not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeStamp {
    pub date: DateStamp,
    pub hour: u32,
    pub minute: u32,
    pub second: Option<u32>,
}

/// Outcome of a successful shape match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampMatch {
    Date(DateStamp),
    DateTime(TimeStamp),
}

impl DateStamp {
    /// Builds the calendar date.
    ///
    /// # Errors
    /// Returns [`EngineError::TimestampParse`] for values such as month 14 or
    /// February 30th.
    pub fn to_date(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            EngineError::TimestampParse {
                name: self.to_string(),
                reason: "not a calendar date".into(),
            }
        })
    }
}

impl TimeStamp {
    /// Whether the file name carried seconds.
    #[must_use]
    pub const fn has_seconds(&self) -> bool {
        self.second.is_some()
    }

    /// Builds the calendar date and time.
    ///
    /// # Errors
    /// Returns [`EngineError::TimestampParse`] if either the date or the time
    /// of day is out of range (hour 25, day 32, ...).
    pub fn to_date_time(&self) -> Result<NaiveDateTime> {
        let date = self.date.to_date()?;
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, self.second.unwrap_or(0))
            .ok_or_else(|| EngineError::TimestampParse {
                name: self.to_string(),
                reason: "not a valid time of day".into(),
            })?;
        Ok(date.and_time(time))
    }
}

impl std::fmt::Display for DateStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl std::fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}T{:02}.{:02}", self.date, self.hour, self.minute)?;
        if let Some(s) = self.second {
            write!(f, ".{s:02}")?;
        }
        Ok(())
    }
}

/// Whether `name` is an editor backup file that must never be indexed.
#[must_use]
pub fn is_backup_file(name: &str) -> bool {
    name.ends_with(BACKUP_SUFFIX)
}

/// Detects a stamp at the start of `name`.
///
/// A date+time stamp wins over the plain date stamp it starts with. Backup
/// files are rejected before any pattern runs.
#[must_use]
pub fn match_stamp(name: &str) -> Option<StampMatch> {
    if is_backup_file(name) {
        return None;
    }

    if let Some(caps) = TIME_STAMP.captures(name) {
        return Some(StampMatch::DateTime(TimeStamp {
            date: date_from(&caps),
            hour: field(&caps, 4),
            minute: field(&caps, 5),
            second: caps.get(6).map(|m| u32::from(parse_digits(m.as_str()))),
        }));
    }

    DATE_STAMP
        .captures(name)
        .map(|caps| StampMatch::Date(date_from(&caps)))
}

fn date_from(caps: &Captures<'_>) -> DateStamp {
    DateStamp {
        year: field::<i32>(caps, 1),
        month: field(caps, 2),
        day: field(caps, 3),
    }
}

fn field<T: From<u16>>(caps: &Captures<'_>, idx: usize) -> T {
    T::from(caps.get(idx).map_or(0, |m| parse_digits(m.as_str())))
}

// The patterns only capture ASCII digits, at most four of them.
fn parse_digits(digits: &str) -> u16 {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u16::from(b - b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> DateStamp {
        DateStamp { year, month, day }
    }

    #[test]
    fn test_time_stamp_without_seconds() {
        let m = match_stamp("2010-03-29T20.12 Divegraph.tiff").unwrap();
        assert_eq!(
            m,
            StampMatch::DateTime(TimeStamp {
                date: date(2010, 3, 29),
                hour: 20,
                minute: 12,
                second: None,
            })
        );
    }

    #[test]
    fn test_time_stamp_with_seconds() {
        let m = match_stamp("2011-08-29T08.23.59_test.pdf").unwrap();
        let StampMatch::DateTime(ts) = m else {
            panic!("expected a date+time match, got {m:?}");
        };
        assert_eq!(ts.date, date(2011, 8, 29));
        assert_eq!((ts.hour, ts.minute, ts.second), (8, 23, Some(59)));
        assert!(ts.has_seconds());
    }

    #[test]
    fn test_date_stamp_only() {
        assert_eq!(
            match_stamp("2010-12-31_report.txt"),
            Some(StampMatch::Date(date(2010, 12, 31)))
        );
    }

    #[test]
    fn test_broken_time_falls_back_to_date() {
        // "T9.05" does not have two hour digits, so only the date is taken.
        assert_eq!(
            match_stamp("2010-12-31T9.05 notes.org"),
            Some(StampMatch::Date(date(2010, 12, 31)))
        );
    }

    #[test]
    fn test_partial_seconds_are_ignored() {
        let Some(StampMatch::DateTime(ts)) = match_stamp("2011-08-29T08.23.5x.pdf") else {
            panic!("expected a date+time match");
        };
        assert_eq!(ts.second, None);
    }

    #[test]
    fn test_backup_files_are_rejected() {
        assert_eq!(match_stamp("2011-08-29T08.23.59_test.pdf~"), None);
        assert_eq!(match_stamp("2010-12-31~"), None);
        assert!(is_backup_file("x~"));
        assert!(!is_backup_file("x~.txt"));
    }

    #[test]
    fn test_stamp_must_start_the_name() {
        assert_eq!(match_stamp("scan 2010-12-31.png"), None);
        assert_eq!(match_stamp("README.md"), None);
        assert_eq!(match_stamp(""), None);
    }

    #[test]
    fn test_shape_filter_is_loose() {
        // Month 19 and hour 29 pass the shape check; calendar checks reject them later.
        assert_eq!(
            match_stamp("2011-19-05.txt"),
            Some(StampMatch::Date(date(2011, 19, 5)))
        );
        let Some(StampMatch::DateTime(ts)) = match_stamp("2011-01-05T29.00.txt") else {
            panic!("expected a date+time match");
        };
        assert_eq!(ts.hour, 29);
        assert!(ts.to_date_time().is_err());
    }

    #[test]
    fn test_shape_filter_rejects_out_of_class_digits() {
        assert_eq!(match_stamp("3011-01-05.txt"), None);
        assert_eq!(match_stamp("2011-21-05.txt"), None);
        assert_eq!(match_stamp("2011-01-45.txt"), None);
        assert_eq!(
            match_stamp("2011-01-05T30.00.txt"),
            Some(StampMatch::Date(date(2011, 1, 5)))
        );
    }

    #[test]
    fn test_calendar_validation() {
        assert!(date(2011, 14, 5).to_date().is_err());
        assert!(date(2011, 2, 30).to_date().is_err());
        assert!(date(2012, 2, 29).to_date().is_ok());
        let err = date(2011, 14, 5).to_date().unwrap_err();
        assert!(err.to_string().contains("2011-14-05"));
    }

    #[test]
    fn test_display_round_trips_the_stamp_text() {
        let Some(StampMatch::DateTime(ts)) = match_stamp("2011-08-29T08.23.59_test.pdf") else {
            panic!("expected a date+time match");
        };
        assert_eq!(ts.to_string(), "2011-08-29T08.23.59");
    }
}
