//! Turning a stamp match into the timestamp a record is filed under.

use std::path::Path;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, Timelike};

use crate::error::{EngineError, Result};
use crate::record::{ReportedTime, TimePrecision};
use crate::stamp::{DateStamp, StampMatch, TimeStamp};

/// Source of a file's modification time in local time.
pub trait ModifiedTime {
    /// # Errors
    /// Returns an I/O error when the file cannot be inspected.
    fn modified(&self, path: &Path) -> std::io::Result<DateTime<Local>>;
}

/// Reads the modification time from the file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsModifiedTime;

impl ModifiedTime for FsModifiedTime {
    fn modified(&self, path: &Path) -> std::io::Result<DateTime<Local>> {
        let meta = std::fs::metadata(path)?;
        Ok(DateTime::<Local>::from(meta.modified()?))
    }
}

/// Resolves the timestamp for a matched file.
///
/// A full date+time stamp is taken as is, without touching the file. For a
/// date-only stamp the file's modification time is consulted: when it falls on
/// the same day its hour and minute are borrowed, otherwise the date stands
/// alone.
///
/// # Errors
/// [`EngineError::TimestampParse`] when the stamp is not a calendar value,
/// [`EngineError::Metadata`] when the modification time cannot be read.
pub fn reconcile<M: ModifiedTime + ?Sized>(
    stamp: &StampMatch,
    path: &Path,
    mtime: &M,
) -> Result<ReportedTime> {
    match stamp {
        StampMatch::DateTime(ts) => from_time_stamp(ts),
        StampMatch::Date(ds) => {
            // A bad calendar value is reported before the file is touched.
            let date = ds.to_date()?;
            let modified = mtime.modified(path).map_err(|source| EngineError::Metadata {
                path: path.to_path_buf(),
                source,
            })?;
            borrow_time_of_day(ds, date, &modified)
        }
    }
}

fn from_time_stamp(ts: &TimeStamp) -> Result<ReportedTime> {
    let precision = if ts.has_seconds() {
        TimePrecision::Seconds
    } else {
        TimePrecision::Minutes
    };
    Ok(ReportedTime::DateTime {
        at: ts.to_date_time()?,
        precision,
    })
}

fn borrow_time_of_day(
    ds: &DateStamp,
    date: NaiveDate,
    modified: &DateTime<Local>,
) -> Result<ReportedTime> {
    let same_day = modified.year() == date.year()
        && modified.month() == date.month()
        && modified.day() == date.day();
    if !same_day {
        return Ok(ReportedTime::Date { date });
    }

    let time = NaiveTime::from_hms_opt(modified.hour(), modified.minute(), 0).ok_or_else(|| {
        EngineError::TimestampParse {
            name: ds.to_string(),
            reason: "modification time out of range".into(),
        }
    })?;
    log::debug!("found a time in file metadata: {ds} --> {time}");
    Ok(ReportedTime::DateTime {
        at: date.and_time(time),
        precision: TimePrecision::Minutes,
    })
}
