//! Fitted linear classifier (one-vs-rest linear SVM or logistic regression).

use greenr_core::SentimentLabel;
use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::error::ClassifierError;
use crate::matrix::{sparse_dot, FeatureMatrix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    LinearSvc,
    LogisticRegression,
}

impl std::fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifierKind::LinearSvc => write!(f, "linear_svc"),
            ClassifierKind::LogisticRegression => write!(f, "logistic_regression"),
        }
    }
}

/// On-disk shape of a classifier artifact.
///
/// `coef` is `n_classes x n_features`, except for two classes where a single
/// row scores the second class against the first.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLinearClassifier {
    pub kind: ClassifierKind,
    pub classes: Vec<i64>,
    pub coef: Vec<Vec<f32>>,
    pub intercept: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct LinearClassifier {
    kind: ClassifierKind,
    classes: Vec<SentimentLabel>,
    coef: Vec<Vec<f32>>,
    intercept: Vec<f32>,
    n_features: usize,
}

impl Artifact for LinearClassifier {
    const KIND: &'static str = "classifier";
    type Raw = RawLinearClassifier;

    fn from_raw(raw: RawLinearClassifier) -> Result<Self, String> {
        if raw.classes.len() < 2 {
            return Err(format!(
                "at least two classes are required, found {}",
                raw.classes.len()
            ));
        }

        let mut classes = Vec::with_capacity(raw.classes.len());
        for &value in &raw.classes {
            let label = SentimentLabel::from_value(value).map_err(|e| e.to_string())?;
            if classes.contains(&label) {
                return Err(format!("class {value} is listed more than once"));
            }
            classes.push(label);
        }

        let expected_rows = if classes.len() == 2 { 1 } else { classes.len() };
        if raw.coef.len() != expected_rows {
            return Err(format!(
                "coef has {} rows, expected {expected_rows} for {} classes",
                raw.coef.len(),
                classes.len()
            ));
        }
        if raw.intercept.len() != expected_rows {
            return Err(format!(
                "intercept has {} entries, expected {expected_rows}",
                raw.intercept.len()
            ));
        }

        let n_features = raw.coef[0].len();
        if n_features == 0 {
            return Err("coef rows must be non-empty".to_string());
        }
        if raw.coef.iter().any(|row| row.len() != n_features) {
            return Err("coef rows have differing lengths".to_string());
        }
        if raw
            .coef
            .iter()
            .flatten()
            .chain(raw.intercept.iter())
            .any(|w| !w.is_finite())
        {
            return Err("coef or intercept contains non-finite weights".to_string());
        }

        Ok(Self {
            kind: raw.kind,
            classes,
            coef: raw.coef,
            intercept: raw.intercept,
            n_features,
        })
    }
}

impl LinearClassifier {
    #[must_use]
    pub fn kind(&self) -> ClassifierKind {
        self.kind
    }

    #[must_use]
    pub fn classes(&self) -> &[SentimentLabel] {
        &self.classes
    }

    /// Feature width the classifier was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Raw decision scores, one vector per input row.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::FeatureWidthMismatch`] if the matrix width
    /// differs from [`Self::n_features`].
    pub fn decision_function(
        &self,
        features: &FeatureMatrix,
    ) -> Result<Vec<Vec<f32>>, ClassifierError> {
        if features.width() != self.n_features {
            return Err(ClassifierError::FeatureWidthMismatch {
                expected: self.n_features,
                actual: features.width(),
            });
        }

        Ok(features
            .rows()
            .map(|row| {
                self.coef
                    .iter()
                    .zip(&self.intercept)
                    .map(|(weights, bias)| sparse_dot(row, weights) + bias)
                    .collect()
            })
            .collect())
    }

    /// Predict one label per input row.
    ///
    /// Ties between classes resolve to the class listed first.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::FeatureWidthMismatch`] for a matrix from a
    /// different feature space and [`ClassifierError::Inference`] if a
    /// decision score is not finite.
    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<SentimentLabel>, ClassifierError> {
        self.decision_function(features)?
            .into_iter()
            .map(|scores| self.pick(&scores))
            .collect()
    }

    fn pick(&self, scores: &[f32]) -> Result<SentimentLabel, ClassifierError> {
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ClassifierError::Inference(
                "decision function produced a non-finite score".to_string(),
            ));
        }

        if let [score] = scores {
            let index = usize::from(*score > 0.0);
            return Ok(self.classes[index]);
        }

        let mut best = 0;
        for (i, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = i;
            }
        }
        self.classes
            .get(best)
            .copied()
            .ok_or_else(|| ClassifierError::Inference(format!("no class at index {best}")))
    }
}
