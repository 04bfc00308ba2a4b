//! Loading of serialized model artifacts from disk.

use std::path::Path;

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::error::ClassifierError;

/// A fitted object that can be decoded from a JSON artifact file.
pub trait Artifact: Sized {
    /// Short name used in log lines.
    const KIND: &'static str;

    /// On-disk JSON shape.
    type Raw: DeserializeOwned;

    /// Build the runtime object, checking what deserialization alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the decoded value is unusable.
    fn from_raw(raw: Self::Raw) -> Result<Self, String>;
}

/// A decoded artifact together with the digest of the bytes it came from.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub sha256: String,
}

/// Read, fingerprint, decode and validate an artifact.
///
/// When `expected_sha256` is given the file must hash to it (case-insensitive hex).
///
/// # Errors
///
/// - [`ClassifierError::ArtifactNotFound`] if `path` does not exist.
/// - [`ClassifierError::ArtifactIo`] for any other read failure.
/// - [`ClassifierError::ArtifactCorrupt`] on digest mismatch, decode failure,
///   or failed validation.
pub fn load_artifact<T: Artifact>(
    path: &Path,
    expected_sha256: Option<&str>,
) -> Result<Loaded<T>, ClassifierError> {
    let path_str = path.display().to_string();

    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ClassifierError::ArtifactNotFound {
                path: path_str.clone(),
            }
        } else {
            ClassifierError::ArtifactIo {
                path: path_str.clone(),
                source: e,
            }
        }
    })?;

    let sha256 = format!("{:x}", Sha256::digest(&bytes));

    if let Some(expected) = expected_sha256 {
        if !expected.eq_ignore_ascii_case(&sha256) {
            return Err(ClassifierError::ArtifactCorrupt {
                path: path_str,
                reason: format!("sha256 mismatch: expected {expected}, found {sha256}"),
            });
        }
    }

    let raw: T::Raw =
        serde_json::from_slice(&bytes).map_err(|e| ClassifierError::ArtifactCorrupt {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;

    let value = T::from_raw(raw).map_err(|reason| ClassifierError::ArtifactCorrupt {
        path: path_str.clone(),
        reason,
    })?;

    tracing::debug!(kind = T::KIND, path = %path_str, sha256 = %sha256, "artifact loaded");

    Ok(Loaded { value, sha256 })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct RawWeights {
        values: Vec<f32>,
    }

    #[derive(Debug)]
    struct Weights {
        values: Vec<f32>,
    }

    impl Artifact for Weights {
        const KIND: &'static str = "weights";
        type Raw = RawWeights;

        fn from_raw(raw: RawWeights) -> Result<Self, String> {
            if raw.values.is_empty() {
                return Err("values must be non-empty".to_string());
            }
            Ok(Self { values: raw.values })
        }
    }

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn missing_path_is_not_found() {
        let err = load_artifact::<Weights>(Path::new("/no/such/artifact.json"), None).unwrap_err();
        assert!(
            matches!(err, ClassifierError::ArtifactNotFound { ref path } if path == "/no/such/artifact.json"),
            "got: {err:?}"
        );
    }

    #[test]
    fn valid_artifact_loads_with_digest() {
        let file = write_temp(r#"{"values": [0.5, 1.5]}"#);
        let loaded = load_artifact::<Weights>(file.path(), None).expect("load");
        assert_eq!(loaded.value.values, vec![0.5, 1.5]);
        assert_eq!(loaded.sha256.len(), 64);
    }

    #[test]
    fn matching_pin_is_accepted_case_insensitively() {
        let file = write_temp(r#"{"values": [1.0]}"#);
        let digest = load_artifact::<Weights>(file.path(), None)
            .expect("load")
            .sha256;
        let upper = digest.to_uppercase();
        assert!(load_artifact::<Weights>(file.path(), Some(&upper)).is_ok());
    }

    #[test]
    fn mismatched_pin_is_corrupt() {
        let file = write_temp(r#"{"values": [1.0]}"#);
        let pin = "0".repeat(64);
        let err = load_artifact::<Weights>(file.path(), Some(&pin)).unwrap_err();
        assert!(
            matches!(err, ClassifierError::ArtifactCorrupt { ref reason, .. } if reason.contains("sha256 mismatch")),
            "got: {err:?}"
        );
    }

    #[test]
    fn undecodable_bytes_are_corrupt() {
        let file = write_temp("\u{80}not json at all");
        let err = load_artifact::<Weights>(file.path(), None).unwrap_err();
        assert!(matches!(err, ClassifierError::ArtifactCorrupt { .. }), "got: {err:?}");
    }

    #[test]
    fn failed_validation_is_corrupt() {
        let file = write_temp(r#"{"values": []}"#);
        let err = load_artifact::<Weights>(file.path(), None).unwrap_err();
        assert!(
            matches!(err, ClassifierError::ArtifactCorrupt { ref reason, .. } if reason.contains("non-empty")),
            "got: {err:?}"
        );
    }
}
