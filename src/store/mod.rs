use log::{info, warn};
use rust_decimal::Decimal;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{self, Record, RecordDraft, RecordError};

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error(transparent)]
    Invalid(#[from] RecordError),
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A line that could not be turned into a record during the last load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SkippedLine {
    /// 1-based line number in the file.
    pub(crate) line_number: usize,
    pub(crate) content: String,
    pub(crate) reason: RecordError,
}

/// Owns the records file and the records last loaded from it.
///
/// The file is opened and closed inside each call; nothing is held between calls.
pub(crate) struct RecordStore {
    path: PathBuf,
    records: Vec<Record>,
    skipped: Vec<SkippedLine>,
}

impl RecordStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read every record from disk, creating the file if it does not exist.
    ///
    /// Lines that do not form a valid record are skipped and reported through
    /// [`RecordStore::skipped`]. On I/O failure the previously loaded state is kept.
    pub(crate) fn load(&mut self) -> Result<&[Record], StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(StoreError::io("create directory for", &self.path))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(StoreError::io("open", &self.path))?;

        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for (i, raw) in BufReader::new(file).split(b'\n').enumerate() {
            let raw = raw.map_err(StoreError::io("read", &self.path))?;
            let line_number = i + 1;
            let text = match String::from_utf8(raw) {
                Ok(text) => text,
                Err(e) => {
                    let reason = RecordError::InvalidEncoding;
                    warn!(
                        "Skipping line {line_number} of {}: {reason}",
                        self.path.display()
                    );
                    skipped.push(SkippedLine {
                        line_number,
                        content: String::from_utf8_lossy(e.as_bytes()).trim().to_string(),
                        reason,
                    });
                    continue;
                }
            };
            let line = text.trim();
            if line.is_empty() {
                continue;
            }
            match Record::parse_line(line) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    warn!(
                        "Skipping line {line_number} of {}: {reason}: {line}",
                        self.path.display()
                    );
                    skipped.push(SkippedLine {
                        line_number,
                        content: line.to_string(),
                        reason,
                    });
                }
            }
        }

        info!(
            "Loaded {} records from {} ({} skipped)",
            records.len(),
            self.path.display(),
            skipped.len()
        );
        self.records = records;
        self.skipped = skipped;
        Ok(&self.records)
    }

    /// Validate a draft and append it as one line at the end of the file.
    ///
    /// Nothing is written unless validation passes. The in-memory collection is
    /// left alone; call [`RecordStore::load`] to pick the new record up.
    pub(crate) fn append(&self, draft: &RecordDraft) -> Result<Record, StoreError> {
        let record = draft.validate()?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(StoreError::io("open", &self.path))?;

        let mut line = record.to_line();
        let needs_newline =
            missing_trailing_newline(&mut file).map_err(StoreError::io("read", &self.path))?;
        if needs_newline {
            line.insert(0, '\n');
        }
        file.write_all(line.as_bytes())
            .map_err(StoreError::io("write to", &self.path))?;

        info!(
            "Appended {} {} {:.2} {} to {}",
            record.date,
            record.item,
            record.amount,
            record.reimbursed,
            self.path.display()
        );
        Ok(record)
    }

    pub(crate) fn records(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    pub(crate) fn total(&self) -> Decimal {
        models::total(&self.records)
    }

    pub(crate) fn outstanding(&self) -> Decimal {
        models::outstanding(&self.records)
    }
}

/// A hand-edited file may end without a newline; appending straight onto it
/// would glue two records together.
fn missing_trailing_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

#[cfg(test)]
mod tests;
