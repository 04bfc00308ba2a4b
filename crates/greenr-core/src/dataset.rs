//! Read-only reference table of labeled tweets.
//!
//! The table is loaded once at startup from a CSV with a `sentiment` and a
//! `message` column (an optional `tweetid` column is kept when present; any
//! other column is ignored) and never mutated afterwards.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::labels::SentimentLabel;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open reference dataset at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse reference dataset at {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// One annotated tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub sentiment: SentimentLabel,
    #[serde(rename = "message")]
    pub text: String,
    #[serde(rename = "tweetid", default)]
    pub tweet_id: Option<u64>,
}

/// Number of reference rows carrying a given label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: SentimentLabel,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    examples: Vec<LabeledExample>,
}

impl ReferenceTable {
    /// Load the table from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be opened and
    /// [`DatasetError::Csv`] if any row is malformed or carries a sentiment
    /// outside `-1..=2`.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_reader(file).map_err(|e| DatasetError::Csv {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Parse the table from any CSV source.
    ///
    /// # Errors
    ///
    /// Returns the underlying `csv::Error` for the first malformed row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let examples = csv_reader
            .deserialize::<LabeledExample>()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { examples })
    }

    #[must_use]
    pub fn from_examples(examples: Vec<LabeledExample>) -> Self {
        Self { examples }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    #[must_use]
    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    /// Rows in file order, restricted to `sentiment` when given.
    pub fn filter(
        &self,
        sentiment: Option<SentimentLabel>,
    ) -> impl Iterator<Item = &LabeledExample> + '_ {
        self.examples
            .iter()
            .filter(move |ex| sentiment.is_none_or(|label| ex.sentiment == label))
    }

    /// Per-label row counts, one entry for every label (zero counts included).
    #[must_use]
    pub fn counts(&self) -> Vec<LabelCount> {
        SentimentLabel::ALL
            .into_iter()
            .map(|label| LabelCount {
                label,
                count: self.examples.iter().filter(|ex| ex.sentiment == label).count(),
            })
            .collect()
    }
}
