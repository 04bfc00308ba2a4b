//! Text-to-sentiment inference for climate-change tweets.
//!
//! Loads fitted vectorizer and linear classifier artifacts from disk, binds
//! them into named [`Model`]s held by a read-only [`ModelRegistry`], and runs
//! the single-text inference path in [`classify`].

pub mod artifact;
pub mod error;
pub mod linear;
pub mod matrix;
pub mod model;
pub mod pipeline;
pub mod types;
pub mod vectorizer;

pub use artifact::{load_artifact, Artifact, Loaded};
pub use error::ClassifierError;
pub use linear::{ClassifierKind, LinearClassifier};
pub use matrix::FeatureMatrix;
pub use model::{Fingerprints, Model, ModelRegistry};
pub use pipeline::{classify, classify_with};
pub use types::Prediction;
pub use vectorizer::{Norm, TfidfVectorizer};
