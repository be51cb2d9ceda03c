// crates/cli/src/writer.rs
//! Output writers for the index.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use stampindex_engine::index::RunResult;
use stampindex_engine::record::{DedupKey, RecordSink, ReportedTime, ResolvedRecord};

use crate::config::OutputConfig;
use crate::error::{AppError, Result};
use crate::options::OutputFormat;

const ID_PROPERTY: &str = ":ID:";

/// What a finished writer reports back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub duplicates: usize,
}

/// Writes records in the configured format, dropping records whose key is
/// already present in the output.
pub struct IndexWriter<W: Write> {
    out: W,
    format: OutputFormat,
    tag: String,
    inactive: bool,
    known: HashSet<DedupKey>,
    summary: WriteSummary,
}

impl<W: Write> IndexWriter<W> {
    pub fn new(out: W, settings: &OutputConfig, known: HashSet<DedupKey>) -> Self {
        Self {
            out,
            format: settings.format,
            tag: settings.tag.clone(),
            inactive: settings.inactive_timestamps,
            known,
            summary: WriteSummary::default(),
        }
    }

    /// File preamble; skipped when appending to existing output.
    ///
    /// # Errors
    /// Propagates write failures.
    pub fn write_header(&mut self) -> io::Result<()> {
        match self.format {
            OutputFormat::Org => {
                writeln!(self.out, "## -*- coding: utf-8 mode: org -*-")?;
                writeln!(
                    self.out,
                    "## This file is generated by stampindex. \
                     Any modification will be overwritten upon next invocation!"
                )?;
                writeln!(
                    self.out,
                    "* files with date stamps in their names          :stampindex:{}:",
                    self.tag
                )
            }
            OutputFormat::Jsonl => Ok(()),
        }
    }

    /// Writes the trailer and flushes.
    ///
    /// # Errors
    /// Propagates write failures.
    pub fn finish(mut self, result: &RunResult) -> Result<WriteSummary> {
        let now = Local::now().naive_local();
        match self.format {
            OutputFormat::Org => {
                writeln!(
                    self.out,
                    "## successfully parsed {} entries ({} new, {} skipped) by stampindex at {}",
                    result.emitted,
                    self.summary.written,
                    result.skipped.len(),
                    org_date_time(&now, true),
                )?;
            }
            OutputFormat::Jsonl => {
                let summary = serde_json::json!({
                    "type": "summary",
                    "version": crate::VERSION,
                    "candidates": result.candidates,
                    "emitted": result.emitted,
                    "written": self.summary.written,
                    "duplicates": self.summary.duplicates,
                    "skipped": result.skipped.len(),
                    "finished": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
                });
                writeln!(self.out, "{}", serde_json::to_string(&summary)?)?;
            }
        }
        self.out.flush()?;
        Ok(self.summary)
    }

    fn write_record(&mut self, record: &ResolvedRecord) -> io::Result<()> {
        match self.format {
            OutputFormat::Org => {
                writeln!(
                    self.out,
                    "** {} {}",
                    org_timestamp(record.timestamp(), self.inactive),
                    record.link_text()
                )?;
                writeln!(self.out, "   :PROPERTIES:")?;
                writeln!(self.out, "   {ID_PROPERTY:<12}{}", record.dedup_key())?;
                writeln!(self.out, "   :END:")
            }
            OutputFormat::Jsonl => {
                let line = serde_json::json!({
                    "type": "entry",
                    "timestamp": record.timestamp().iso8601(),
                    "link": record.link().display().to_string(),
                    "label": record.label(),
                    "id": record.dedup_key().to_string(),
                });
                writeln!(self.out, "{line}")
            }
        }
    }
}

impl<W: Write> RecordSink for IndexWriter<W> {
    fn emit(&mut self, record: ResolvedRecord) -> stampindex_engine::error::Result<()> {
        if !self.known.insert(record.dedup_key()) {
            log::debug!("already indexed: {}", record.link().display());
            self.summary.duplicates += 1;
            return Ok(());
        }
        self.write_record(&record)?;
        self.summary.written += 1;
        Ok(())
    }
}

/// Org timestamp: `<2010-03-29 Mon>` or `<2010-03-29 Mon 20:12>`.
///
/// Org has no seconds field, so seconds are not rendered.
#[must_use]
pub fn org_timestamp(time: &ReportedTime, inactive: bool) -> String {
    let body = match time {
        ReportedTime::Date { date } => date.format("%Y-%m-%d %a").to_string(),
        ReportedTime::DateTime { at, .. } => at.format("%Y-%m-%d %a %H:%M").to_string(),
    };
    wrap(&body, inactive)
}

fn org_date_time(at: &NaiveDateTime, inactive: bool) -> String {
    wrap(&at.format("%Y-%m-%d %a %H:%M").to_string(), inactive)
}

fn wrap(body: &str, inactive: bool) -> String {
    if inactive {
        format!("[{body}]")
    } else {
        format!("<{body}>")
    }
}

/// Keys already present in an earlier output file.
///
/// Understands both the Org `:ID:` property lines and JSON lines with an
/// `id` field. A missing file yields an empty set.
///
/// # Errors
/// Propagates read failures other than the file not existing.
pub fn load_known_keys(path: &Path) -> io::Result<HashSet<DedupKey>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(e),
    };

    let mut keys = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let trimmed = line.trim();
        let key = if let Some(rest) = trimmed.strip_prefix(ID_PROPERTY) {
            DedupKey::from_hex(rest.trim())
        } else if trimmed.starts_with('{') {
            serde_json::from_str::<serde_json::Value>(trimmed)
                .ok()
                .and_then(|v| v.get("id").and_then(|id| id.as_str()).and_then(DedupKey::from_hex))
        } else {
            None
        };
        if let Some(key) = key {
            keys.insert(key);
        }
    }
    Ok(keys)
}

/// Opens the configured destination and prepares the writer.
///
/// In append mode the existing file is read for known keys first and the
/// header is only written when the file is new or empty.
///
/// # Errors
/// Returns [`AppError::Output`] when the file cannot be read or opened.
pub fn open(settings: &OutputConfig) -> Result<IndexWriter<Box<dyn Write>>> {
    let Some(path) = &settings.path else {
        let mut writer = IndexWriter::new(
            Box::new(BufWriter::new(io::stdout().lock())) as Box<dyn Write>,
            settings,
            HashSet::new(),
        );
        writer.write_header()?;
        return Ok(writer);
    };

    let output_err = |source| AppError::Output {
        path: path.clone(),
        source,
    };

    let existing = settings.append && fs::metadata(path).is_ok_and(|m| m.len() > 0);
    let known = if existing {
        load_known_keys(path).map_err(output_err)?
    } else {
        HashSet::new()
    };
    if existing {
        log::info!("appending to {} ({} known entries)", path.display(), known.len());
    }

    let file = if settings.append {
        OpenOptions::new().create(true).append(true).open(path)
    } else {
        File::create(path)
    }
    .map_err(output_err)?;

    let mut writer = IndexWriter::new(
        Box::new(BufWriter::new(file)) as Box<dyn Write>,
        settings,
        known,
    );
    if !existing {
        writer.write_header()?;
    }
    Ok(writer)
}
