//! Fitted bag-of-words vectorizer (raw counts or TF-IDF).
//!
//! Tokenization mirrors the usual word-vectorizer pipeline: optional
//! lowercasing, regex token extraction, stop-word removal, then word
//! n-grams joined by a single space. Terms outside the fitted vocabulary are
//! ignored, so the output width is always the vocabulary size.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::matrix::FeatureMatrix;

pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// On-disk shape of a vectorizer artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVectorizer {
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    pub vocabulary: HashMap<String, usize>,
    /// Per-column inverse document frequency; absent for a plain count vectorizer.
    #[serde(default)]
    pub idf: Option<Vec<f32>>,
    #[serde(default)]
    pub norm: Option<Norm>,
    #[serde(default)]
    pub sublinear_tf: bool,
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f32>>,
    norm: Option<Norm>,
    sublinear_tf: bool,
}

impl Artifact for TfidfVectorizer {
    const KIND: &'static str = "vectorizer";
    type Raw = RawVectorizer;

    fn from_raw(raw: RawVectorizer) -> Result<Self, String> {
        let (min_n, max_n) = raw.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }

        if raw.vocabulary.is_empty() {
            return Err("vocabulary must be non-empty".to_string());
        }

        let width = raw.vocabulary.len();
        let mut seen = vec![false; width];
        for (term, &col) in &raw.vocabulary {
            if col >= width {
                return Err(format!(
                    "vocabulary term '{term}' maps to column {col}, outside width {width}"
                ));
            }
            if seen[col] {
                return Err(format!("vocabulary column {col} is assigned more than once"));
            }
            seen[col] = true;
        }

        if let Some(idf) = &raw.idf {
            if idf.len() != width {
                return Err(format!(
                    "idf has {} entries but vocabulary has {width}",
                    idf.len()
                ));
            }
            if idf.iter().any(|w| !w.is_finite()) {
                return Err("idf contains non-finite weights".to_string());
            }
        }

        let token_pattern = Regex::new(&raw.token_pattern)
            .map_err(|e| format!("invalid token_pattern: {e}"))?;

        let stop_words = raw
            .stop_words
            .into_iter()
            .map(|w| if raw.lowercase { w.to_lowercase() } else { w })
            .collect();

        Ok(Self {
            lowercase: raw.lowercase,
            token_pattern,
            ngram_range: raw.ngram_range,
            stop_words,
            vocabulary: raw.vocabulary,
            idf: raw.idf,
            norm: raw.norm,
            sublinear_tf: raw.sublinear_tf,
        })
    }
}

impl TfidfVectorizer {
    /// Number of output columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.vocabulary.len()
    }

    #[must_use]
    pub fn is_tfidf(&self) -> bool {
        self.idf.is_some()
    }

    #[must_use]
    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    /// Split a document into the terms the vocabulary is keyed by.
    #[must_use]
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Transform a batch of documents into one feature row each.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> FeatureMatrix {
        let mut matrix = FeatureMatrix::new(self.width());
        for doc in documents {
            matrix.push_row(self.transform_one(doc.as_ref()));
        }
        matrix
    }

    #[allow(clippy::cast_precision_loss)]
    fn transform_one(&self, text: &str) -> Vec<(usize, f32)> {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0) += 1;
            }
        }

        let mut row: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(col, count)| {
                let tf = count as f32;
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                let weight = self.idf.as_ref().map_or(1.0, |idf| idf[col]);
                (col, tf * weight)
            })
            .collect();

        if let Some(norm) = self.norm {
            let total = match norm {
                Norm::L1 => row.iter().map(|&(_, v)| v.abs()).sum::<f32>(),
                Norm::L2 => row.iter().map(|&(_, v)| v * v).sum::<f32>().sqrt(),
            };
            if total > 0.0 {
                for (_, v) in &mut row {
                    *v /= total;
                }
            }
        }

        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(json: &str) -> TfidfVectorizer {
        let raw: RawVectorizer = serde_json::from_str(json).expect("raw json");
        TfidfVectorizer::from_raw(raw).expect("valid vectorizer")
    }

    fn dense(m: &FeatureMatrix, index: usize) -> Vec<f32> {
        let mut out = vec![0.0; m.width()];
        for &(col, value) in m.row(index).expect("row") {
            out[col] = value;
        }
        out
    }

    fn counts() -> TfidfVectorizer {
        build(r#"{"vocabulary": {"climate": 0, "change": 1, "hoax": 2}}"#)
    }

    #[test]
    fn analyze_lowercases_and_drops_single_chars() {
        let v = counts();
        assert_eq!(
            v.analyze("Climate CHANGE is a HOAX!"),
            vec!["climate", "change", "is", "hoax"]
        );
    }

    #[test]
    fn analyze_splits_on_apostrophes() {
        let v = counts();
        assert_eq!(v.analyze("Trump's resistance"), vec!["trump", "resistance"]);
        assert_eq!(v.analyze("Trump\u{2019}s resistance"), vec!["trump", "resistance"]);
    }

    #[test]
    fn analyze_removes_stop_words_before_ngrams() {
        let v = build(
            r#"{"ngram_range": [1, 2], "stop_words": ["the", "in"],
                "vocabulary": {"climate change": 0}}"#,
        );
        assert_eq!(
            v.analyze("in the climate change"),
            vec!["climate", "change", "climate change"]
        );
    }

    #[test]
    fn transform_counts_known_terms_only() {
        let v = counts();
        let m = v.transform(&["climate change climate denial"]);
        assert_eq!(m.width(), 3);
        assert_eq!(m.row(0), Some(&[(0, 2.0), (1, 1.0)][..]));
    }

    #[test]
    fn transform_empty_text_gives_empty_row() {
        let v = counts();
        let m = v.transform(&[""]);
        assert_eq!(m.n_rows(), 1);
        assert_eq!(m.row(0), Some(&[][..]));
    }

    #[test]
    fn transform_applies_idf_and_l2_norm() {
        let v = build(
            r#"{"vocabulary": {"polar": 0, "bears": 1}, "idf": [3.0, 4.0], "norm": "l2"}"#,
        );
        let m = v.transform(&["polar bears"]);
        let row = dense(&m, 0);
        assert!((row[0] - 0.6).abs() < 1e-6, "got {row:?}");
        assert!((row[1] - 0.8).abs() < 1e-6, "got {row:?}");
    }

    #[test]
    fn transform_applies_l1_norm() {
        let v = build(r#"{"vocabulary": {"fish": 0, "water": 1}, "norm": "l1"}"#);
        let row = dense(&v.transform(&["fish fish fish water"]), 0);
        assert!((row[0] - 0.75).abs() < 1e-6);
        assert!((row[1] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn sublinear_tf_dampens_repeats() {
        let v = build(r#"{"vocabulary": {"rt": 0}, "sublinear_tf": true}"#);
        let row = dense(&v.transform(&["rt rt rt"]), 0);
        assert!((row[0] - (1.0 + 3.0_f32.ln())).abs() < 1e-6);
    }

    #[test]
    fn batch_produces_one_row_per_document() {
        let v = counts();
        let m = v.transform(&["climate", "hoax", ""]);
        assert_eq!(m.n_rows(), 3);
    }

    fn reject(json: &str) -> String {
        let raw: RawVectorizer = serde_json::from_str(json).expect("raw json");
        TfidfVectorizer::from_raw(raw).expect_err("should be rejected")
    }

    #[test]
    fn rejects_empty_vocabulary() {
        assert!(reject(r#"{"vocabulary": {}}"#).contains("non-empty"));
    }

    #[test]
    fn rejects_out_of_range_column() {
        assert!(reject(r#"{"vocabulary": {"a": 0, "b": 5}}"#).contains("outside width"));
    }

    #[test]
    fn rejects_duplicate_column() {
        assert!(reject(r#"{"vocabulary": {"aa": 0, "bb": 0}}"#).contains("more than once"));
    }

    #[test]
    fn rejects_idf_length_mismatch() {
        assert!(reject(r#"{"vocabulary": {"aa": 0}, "idf": [1.0, 2.0]}"#).contains("idf has 2"));
    }

    #[test]
    fn rejects_bad_ngram_range() {
        assert!(
            reject(r#"{"vocabulary": {"aa": 0}, "ngram_range": [2, 1]}"#)
                .contains("ngram_range")
        );
    }

    #[test]
    fn rejects_invalid_token_pattern() {
        assert!(
            reject(r#"{"vocabulary": {"aa": 0}, "token_pattern": "(unclosed"}"#)
                .contains("token_pattern")
        );
    }
}
