//! Data model for the coder agent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// The anomaly-detection library family a script targets.
///
/// The family decides which generation template is used and which
/// data-loading contract the emitted code must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryFamily {
    /// PyOD: tabular/vector anomaly detection.
    PyOd,
    /// PyGOD: graph anomaly detection.
    PyGod,
}

impl fmt::Display for LibraryFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryFamily::PyOd => write!(f, "pyod"),
            LibraryFamily::PyGod => write!(f, "pygod"),
        }
    }
}

impl FromStr for LibraryFamily {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pyod" => Ok(LibraryFamily::PyOd),
            "pygod" => Ok(LibraryFamily::PyGod),
            other => Err(AgentError::UnknownFamily(other.to_string())),
        }
    }
}

/// A request to generate an anomaly-detection analysis script.
///
/// The train/test paths are opaque strings passed through verbatim into the
/// emitted code; this component never validates or resolves them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRequest {
    /// Algorithm class name (e.g. "KNN", "DOMINANT").
    pub algorithm: String,
    /// Target library family.
    pub family: LibraryFamily,
    /// Path string for the training dataset, injected verbatim.
    pub train_path: String,
    /// Path string for the test dataset, injected verbatim.
    pub test_path: String,
    /// Documentation excerpt for the algorithm, injected verbatim.
    pub documentation: String,
    /// Hyperparameters to offer the model; possibly empty. The model applies
    /// only those the documentation confirms applicable.
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

impl ScriptRequest {
    /// Creates a request with no hyperparameters.
    pub fn new(
        algorithm: impl Into<String>,
        family: LibraryFamily,
        train_path: impl Into<String>,
        test_path: impl Into<String>,
        documentation: impl Into<String>,
    ) -> Self {
        Self {
            algorithm: algorithm.into(),
            family,
            train_path: train_path.into(),
            test_path: test_path.into(),
            documentation: documentation.into(),
            parameters: serde_json::Map::new(),
        }
    }

    /// Sets the hyperparameter map.
    pub fn with_parameters(mut self, parameters: serde_json::Map<String, serde_json::Value>) -> Self {
        self.parameters = parameters;
        self
    }
}

/// A generated script and its repair bookkeeping.
///
/// The artifact is owned by the orchestrating caller across its whole repair
/// lifetime; the agent only reads the fields it needs per call and mutates
/// `review_count` on successful repair. Concurrent unsynchronized repair
/// cycles on the same artifact are undefined behavior; callers serialise
/// access (the shared-file orchestration in the wider pipeline uses an
/// advisory file lock for this).
///
/// Serialized field names match the pipeline's shared storage schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeArtifact {
    /// Current source text. Replaced wholesale, never merged.
    pub code: String,
    /// Algorithm class name this script targets.
    pub algorithm: String,
    /// Runtime error reported by the execution collaborator; empty when the
    /// last run succeeded or the script has not run yet.
    #[serde(default)]
    pub error_message: String,
    /// Number of repair cycles completed against this artifact.
    #[serde(default)]
    pub review_count: u32,
}

impl CodeArtifact {
    /// Creates an empty artifact for an algorithm.
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            code: String::new(),
            algorithm: algorithm.into(),
            error_message: String::new(),
            review_count: 0,
        }
    }

    /// Returns whether the artifact carries a runtime failure reason.
    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }

    /// Records a runtime failure reported by the execution collaborator.
    pub fn record_failure(&mut self, error_message: impl Into<String>) {
        self.error_message = error_message.into();
    }

    /// Clears the failure reason after a successful run.
    pub fn clear_error(&mut self) {
        self.error_message.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_str() {
        assert_eq!("pyod".parse::<LibraryFamily>().ok(), Some(LibraryFamily::PyOd));
        assert_eq!("PyGOD".parse::<LibraryFamily>().ok(), Some(LibraryFamily::PyGod));
        assert!("pytorch".parse::<LibraryFamily>().is_err());
    }

    #[test]
    fn test_family_display_round_trip() {
        for family in [LibraryFamily::PyOd, LibraryFamily::PyGod] {
            let parsed: LibraryFamily = family.to_string().parse().expect("round trip");
            assert_eq!(parsed, family);
        }
    }

    #[test]
    fn test_artifact_serde_schema() {
        let mut artifact = CodeArtifact::new("KNN");
        artifact.code = "print('x')".to_string();
        artifact.record_failure("ValueError");
        artifact.review_count = 2;

        let json = serde_json::to_string(&artifact).expect("serialize");
        assert!(json.contains("\"code\":\"print('x')\""));
        assert!(json.contains("\"algorithm\":\"KNN\""));
        assert!(json.contains("\"error_message\":\"ValueError\""));
        assert!(json.contains("\"review_count\":2"));

        let back: CodeArtifact = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, artifact);
    }

    #[test]
    fn test_artifact_defaults_on_partial_json() {
        let artifact: CodeArtifact =
            serde_json::from_str(r#"{"code": "x = 1", "algorithm": "LOF"}"#).expect("deserialize");

        assert_eq!(artifact.review_count, 0);
        assert!(!artifact.has_error());
    }

    #[test]
    fn test_error_bookkeeping() {
        let mut artifact = CodeArtifact::new("KNN");
        assert!(!artifact.has_error());

        artifact.record_failure("IndexError: out of range");
        assert!(artifact.has_error());

        artifact.clear_error();
        assert!(!artifact.has_error());
    }
}
