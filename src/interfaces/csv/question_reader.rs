use crate::domain::question::{QuestionRecord, REQUIRED_COLUMNS};
use crate::error::{MentorError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads tagged questions from a CSV source.
///
/// The header row must name every column in [`REQUIRED_COLUMNS`]; their order
/// does not matter and extra columns are ignored.
pub struct QuestionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl QuestionReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            MentorError::SchemaError(format!(
                "cannot open dataset {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Ok(Self::new(file))
    }
}

impl<R: Read> QuestionReader<R> {
    /// Creates a new `QuestionReader` from any `Read` source.
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Checks column presence, then deserializes every row.
    ///
    /// The first row that fails to deserialize aborts the load.
    pub fn read_all(mut self) -> Result<Vec<QuestionRecord>> {
        let headers = self.reader.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(MentorError::SchemaError(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        self.reader
            .into_deserialize()
            .map(|result| result.map_err(MentorError::from))
            .collect()
    }
}
