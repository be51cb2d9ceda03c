use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_128;

use crate::error::Result;

/// How much of the time of day a [`ReportedTime::DateTime`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePrecision {
    Minutes,
    Seconds,
}

/// The timestamp a record is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportedTime {
    /// Only the date is known.
    Date { date: NaiveDate },
    /// Date plus time of day, either from the file name or borrowed from the
    /// file's modification time.
    DateTime {
        at: NaiveDateTime,
        precision: TimePrecision,
    },
}

impl ReportedTime {
    /// ISO-8601 rendering that keeps exactly the known precision.
    #[must_use]
    pub fn iso8601(&self) -> String {
        match self {
            Self::Date { date } => date.format("%Y-%m-%d").to_string(),
            Self::DateTime {
                at,
                precision: TimePrecision::Minutes,
            } => at.format("%Y-%m-%dT%H:%M").to_string(),
            Self::DateTime {
                at,
                precision: TimePrecision::Seconds,
            } => at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

impl fmt::Display for ReportedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso8601())
    }
}

/// Stable identifier of a record, derived from its rendered link text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct DedupKey(pub u128);

impl Serialize for DedupKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl DedupKey {
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self(xxh3_128(text.as_bytes()))
    }

    /// Parses the 32-digit hex form written by [`fmt::Display`].
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != 32 {
            return None;
        }
        u128::from_str_radix(s, 16).ok().map(Self)
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Link markup pointing at `path` with `label` as description.
#[must_use]
pub fn link_text(path: &Path, label: &str) -> String {
    format!("[[{}][{label}]]", path.display())
}

/// One index entry per matched file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRecord {
    timestamp: ReportedTime,
    link: PathBuf,
    label: String,
    id: DedupKey,
}

impl ResolvedRecord {
    /// The dedup key is computed over the link text only, so two files sharing
    /// a timestamp still differ while reruns reproduce the same key.
    #[must_use]
    pub fn new(timestamp: ReportedTime, link: PathBuf, label: String) -> Self {
        let id = DedupKey::of(&link_text(&link, &label));
        Self {
            timestamp,
            link,
            label,
            id,
        }
    }

    #[must_use]
    pub const fn timestamp(&self) -> &ReportedTime {
        &self.timestamp
    }

    #[must_use]
    pub fn link(&self) -> &Path {
        &self.link
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub const fn dedup_key(&self) -> DedupKey {
        self.id
    }

    #[must_use]
    pub fn link_text(&self) -> String {
        link_text(&self.link, &self.label)
    }
}

/// Receives records as the index is built.
pub trait RecordSink {
    /// # Errors
    /// Implementations return an error when the record cannot be persisted;
    /// this aborts the run.
    fn emit(&mut self, record: ResolvedRecord) -> Result<()>;
}

impl RecordSink for Vec<ResolvedRecord> {
    fn emit(&mut self, record: ResolvedRecord) -> Result<()> {
        self.push(record);
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn emit(&mut self, record: ResolvedRecord) -> Result<()> {
        (**self).emit(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_iso8601_keeps_precision() {
        let date = NaiveDate::from_ymd_opt(2010, 12, 31).unwrap();
        assert_eq!(ReportedTime::Date { date }.iso8601(), "2010-12-31");

        let minutes = ReportedTime::DateTime {
            at: at("2010-03-29 20:12:00"),
            precision: TimePrecision::Minutes,
        };
        assert_eq!(minutes.iso8601(), "2010-03-29T20:12");

        let seconds = ReportedTime::DateTime {
            at: at("2011-08-29 08:23:59"),
            precision: TimePrecision::Seconds,
        };
        assert_eq!(seconds.to_string(), "2011-08-29T08:23:59");
    }

    #[test]
    fn test_dedup_key_is_stable_and_content_derived() {
        let ts = ReportedTime::Date {
            date: NaiveDate::from_ymd_opt(2010, 12, 31).unwrap(),
        };
        let a = ResolvedRecord::new(ts, PathBuf::from("/a/2010-12-31.txt"), "2010-12-31.txt".into());
        let b = ResolvedRecord::new(ts, PathBuf::from("/a/2010-12-31.txt"), "2010-12-31.txt".into());
        let c = ResolvedRecord::new(ts, PathBuf::from("/b/2010-12-31.txt"), "2010-12-31.txt".into());

        assert_eq!(a.dedup_key(), b.dedup_key());
        assert_ne!(a.dedup_key(), c.dedup_key());
        assert_eq!(a.dedup_key(), DedupKey::of("[[/a/2010-12-31.txt][2010-12-31.txt]]"));
    }

    #[test]
    fn test_dedup_key_ignores_timestamp() {
        let link = PathBuf::from("/a/2010-12-31.txt");
        let date = NaiveDate::from_ymd_opt(2010, 12, 31).unwrap();
        let a = ResolvedRecord::new(ReportedTime::Date { date }, link.clone(), "x".into());
        let b = ResolvedRecord::new(
            ReportedTime::DateTime {
                at: date.and_hms_opt(14, 5, 0).unwrap(),
                precision: TimePrecision::Minutes,
            },
            link,
            "x".into(),
        );
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_dedup_key_hex_form() {
        let key = DedupKey(0xab);
        let hex = key.to_string();
        assert_eq!(hex.len(), 32);
        assert_eq!(DedupKey::from_hex(&hex), Some(key));
        assert_eq!(DedupKey::from_hex("ab"), None);
        assert_eq!(DedupKey::from_hex("zz000000000000000000000000000000"), None);
    }

    #[test]
    fn test_record_serializes_to_json() {
        let date = NaiveDate::from_ymd_opt(2010, 12, 31).unwrap();
        let rec = ResolvedRecord::new(ReportedTime::Date { date }, PathBuf::from("/r.txt"), "r.txt".into());
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["label"], "r.txt");
        assert_eq!(json["timestamp"]["kind"], "date");
        assert_eq!(json["id"], rec.dedup_key().to_string());
    }
}
