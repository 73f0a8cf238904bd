//! CSV ingestion of assessor observations.
//!
//! Expected headers: `participant_id`, `item_label`, `category`, `error_severity`, and
//! optionally `occurrences` for grouped exports. Severities are not validated here; the
//! scoring engine rejects bad values when the rows are tallied.

mod parser;

use crate::scoring::GroupedObservation;
use parser::ObservationRow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read observation export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid observation CSV data: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct ObservationImporter;

impl ObservationImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ObservationStream<File>, ImportError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> ObservationStream<R> {
        ObservationStream {
            rows: parser::csv_reader(reader).into_deserialize(),
        }
    }
}

/// Lazily parsed rows; nothing is buffered beyond the current record.
pub struct ObservationStream<R> {
    rows: csv::DeserializeRecordsIntoIter<R, ObservationRow>,
}

impl<R: Read> ObservationStream<R> {
    pub fn read_all(self) -> Result<Vec<GroupedObservation>, ImportError> {
        self.collect()
    }
}

impl<R: Read> Iterator for ObservationStream<R> {
    type Item = Result<GroupedObservation, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows
            .next()
            .map(|row| row.map(GroupedObservation::from).map_err(ImportError::from))
    }
}
