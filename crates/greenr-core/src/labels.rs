//! Sentiment classes used by the climate-change tweet dataset.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the four annotated stances a tweet can take on man-made climate change.
///
/// The integer values are the labels used by the training data and the
/// classifier artifacts and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum SentimentLabel {
    Anti,
    Neutral,
    Pro,
    News,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelParseError {
    #[error("unknown sentiment value {0}; expected -1, 0, 1 or 2")]
    UnknownValue(i64),

    #[error("unknown sentiment label '{0}'")]
    UnknownName(String),
}

impl SentimentLabel {
    /// All labels in ascending value order.
    pub const ALL: [SentimentLabel; 4] = [
        SentimentLabel::Anti,
        SentimentLabel::Neutral,
        SentimentLabel::Pro,
        SentimentLabel::News,
    ];

    #[must_use]
    pub fn value(self) -> i8 {
        match self {
            SentimentLabel::Anti => -1,
            SentimentLabel::Neutral => 0,
            SentimentLabel::Pro => 1,
            SentimentLabel::News => 2,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SentimentLabel::Anti => "Anti",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Pro => "Pro",
            SentimentLabel::News => "News",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            SentimentLabel::Anti => "the tweet does not believe in man-made climate change",
            SentimentLabel::Neutral => {
                "the tweet neither supports nor refutes the belief of man-made climate change"
            }
            SentimentLabel::Pro => "the tweet supports the belief of man-made climate change",
            SentimentLabel::News => "the tweet links to factual news about climate change",
        }
    }

    /// Look up a label by its integer value.
    ///
    /// # Errors
    ///
    /// Returns [`LabelParseError::UnknownValue`] for anything outside `-1..=2`.
    pub fn from_value(value: i64) -> Result<Self, LabelParseError> {
        match value {
            -1 => Ok(SentimentLabel::Anti),
            0 => Ok(SentimentLabel::Neutral),
            1 => Ok(SentimentLabel::Pro),
            2 => Ok(SentimentLabel::News),
            other => Err(LabelParseError::UnknownValue(other)),
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i8> for SentimentLabel {
    type Error = LabelParseError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Self::from_value(i64::from(value))
    }
}

impl From<SentimentLabel> for i8 {
    fn from(label: SentimentLabel) -> Self {
        label.value()
    }
}

/// Accepts either the integer value (`"-1"`) or the case-insensitive name (`"anti"`).
impl FromStr for SentimentLabel {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::from_value(value);
        }

        Self::ALL
            .into_iter()
            .find(|label| label.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| LabelParseError::UnknownName(trimmed.to_string()))
    }
}
