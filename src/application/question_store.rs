use crate::domain::question::QuestionRecord;
use crate::error::Result;
use crate::interfaces::csv::question_reader::QuestionReader;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::path::Path;

/// Read-only, in-memory question dataset.
#[derive(Debug, Clone, Default)]
pub struct QuestionStore {
    records: Vec<QuestionRecord>,
}

impl QuestionStore {
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }

    /// Loads and validates a CSV dataset.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let records = QuestionReader::from_path(path)?.read_all()?;
        Ok(Self::new(records))
    }

    /// Picks one question whose subject equals `category` exactly.
    ///
    /// Every matching record is equally likely. Returns `None` for unknown or
    /// empty categories.
    pub fn lookup(&self, category: &str) -> Option<&QuestionRecord> {
        let matching: Vec<&QuestionRecord> = self
            .records
            .iter()
            .filter(|record| record.subject == category)
            .collect();
        matching.choose(&mut rand::thread_rng()).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of questions per subject, sorted by subject.
    pub fn subject_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.subject.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
