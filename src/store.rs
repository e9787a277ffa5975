use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::ScrapeError;
use crate::models::{ApplicationStatus, JobRecord};

/// The tracker CSV. Reads see either the previous or the next full file,
/// never a half-written one.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored records. A missing or zero-byte file is an empty tracker;
    /// anything else must carry exactly the tracker header.
    pub fn read(&self) -> Result<Vec<JobRecord>, ScrapeError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.read_error(e)),
        };

        let mut reader = csv::ReaderBuilder::new().from_reader(file);

        // deserialize() swallows header errors, so check the header up front
        let headers = reader.headers().map_err(|e| self.read_error(e))?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        if !headers.iter().map(str::trim).eq(COLUMNS) {
            return Err(self.read_error(format!(
                "unexpected header [{}], expected [{}]",
                headers.iter().collect::<Vec<_>>().join(", "),
                COLUMNS.join(", ")
            )));
        }

        reader
            .deserialize()
            .collect::<Result<Vec<JobRecord>, _>>()
            .map_err(|e| self.read_error(e))
    }

    /// Replace the tracker with `records`.
    pub fn write(&self, records: &[JobRecord]) -> Result<(), ScrapeError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.write_error(e))?;

        // Write beside the target so the final rename stays on one filesystem
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e))?;
        write_csv(tmp.as_file_mut(), records).map_err(|e| self.write_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.write_error(e.error))?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "tracker written");
        Ok(())
    }

    /// Set the status of the job with this identity key. Returns false when
    /// no such job is stored.
    pub fn set_status(
        &self,
        title: &str,
        company: &str,
        status: ApplicationStatus,
    ) -> Result<bool, ScrapeError> {
        let mut records = self.read()?;
        let Some(record) = records
            .iter_mut()
            .find(|r| r.identity_key() == (title, company))
        else {
            return Ok(false);
        };

        if record.status != status {
            record.status = status;
            self.write(&records)?;
        }
        Ok(true)
    }

    fn read_error(&self, e: impl std::fmt::Display) -> ScrapeError {
        ScrapeError::StoreRead {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }

    fn write_error(&self, e: impl std::fmt::Display) -> ScrapeError {
        ScrapeError::StoreWrite {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }
}

/// Serialize records with the tracker header. Also used for exports.
pub fn write_csv<W: Write>(writer: W, records: &[JobRecord]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    if records.is_empty() {
        // serde only emits the header alongside the first row
        csv_writer.write_record(COLUMNS)?;
    }
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub const COLUMNS: [&str; 7] = [
    "Job Title",
    "Company Name",
    "Location",
    "Platform",
    "Company Type",
    "Status",
    "Date Added",
];

/// Union of `existing` and `incoming`, keeping the first record seen for each
/// identity key. Existing records come first, so they always win and keep
/// their status.
pub fn merge(existing: Vec<JobRecord>, incoming: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    existing
        .into_iter()
        .chain(incoming)
        .filter(|record| seen.insert((record.title.clone(), record.company.clone())))
        .collect()
}
