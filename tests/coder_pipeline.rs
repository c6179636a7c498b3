//! End-to-end tests for the coder agent pipeline with a mock provider.
//!
//! These exercise the full assemble → invoke → sanitize path without any
//! network access, capturing the outbound request so the assembled payload
//! can be inspected.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use adforge::error::LlmError;
use adforge::llm::{Choice, GenerationRequest, GenerationResponse, LlmProvider, Message, Usage};
use adforge::{CodeArtifact, CoderAgent, LibraryFamily, ScriptRequest};

/// Mock provider that records the last request and replies with a canned
/// fenced script.
struct RecordingProvider {
    response: String,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl RecordingProvider {
    fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            last_request: Mutex::new(None),
        }
    }

    fn last_user_message(&self) -> String {
        let guard = self.last_request.lock().expect("lock poisoned");
        let request = guard.as_ref().expect("a request should have been sent");
        request
            .messages
            .iter()
            .find(|m| m.role == "user")
            .expect("request should carry a user message")
            .content
            .clone()
    }

    fn last_temperature(&self) -> Option<f64> {
        let guard = self.last_request.lock().expect("lock poisoned");
        guard.as_ref().and_then(|r| r.temperature)
    }
}

#[async_trait]
impl LlmProvider for RecordingProvider {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        *self.last_request.lock().expect("lock poisoned") = Some(request);

        Ok(GenerationResponse {
            id: "mock-id".to_string(),
            model: "mock-model".to_string(),
            choices: vec![Choice {
                index: 0,
                message: Message::assistant(self.response.clone()),
                finish_reason: "stop".to_string(),
            }],
            usage: Usage {
                prompt_tokens: 200,
                completion_tokens: 400,
                total_tokens: 600,
            },
        })
    }
}

const MOCK_PYOD_SCRIPT: &str = r#"```python
import sys, os
sys.path.append(os.path.abspath(os.path.join(os.path.dirname(__file__), '..')))
from data_loader.data_loader import DataLoader
from pyod.models.knn import KNN
from sklearn.metrics import roc_auc_score, average_precision_score

dataloader_train = DataLoader(filepath = "./data/a_train.csv", store_script=True, store_path = 'train_data_loader.py')
dataloader_test = DataLoader(filepath = "./data/a_test.csv", store_script=True, store_path = 'test_data_loader.py')
X_train, y_train = dataloader_train.load_data(split_data=False)
X_test, y_test = dataloader_test.load_data(split_data=False)

model = KNN(n_neighbors=5)
model.fit(X_train)

train_scores = model.decision_scores_
test_scores = model.decision_function(X_test)

auroc = roc_auc_score(y_test, test_scores)
auprc = average_precision_score(y_test, test_scores)
print(f"AUROC: {auroc}")
print(f"AUPRC: {auprc}")

preds = model.predict(X_test)
for point, pred, label in zip(X_test, preds, y_test):
    if pred != label:
        print(f"Failed prediction at point {point.tolist()} with true label {label}")
```"#;

fn knn_request() -> ScriptRequest {
    let mut parameters = serde_json::Map::new();
    parameters.insert("n_neighbors".to_string(), serde_json::json!(5));

    ScriptRequest::new(
        "KNN",
        LibraryFamily::PyOd,
        "./data/a_train.csv",
        "./data/a_test.csv",
        "<KNN docs>",
    )
    .with_parameters(parameters)
}

#[tokio::test]
async fn test_generate_end_to_end() {
    let provider = Arc::new(RecordingProvider::new(MOCK_PYOD_SCRIPT));
    let agent = CoderAgent::with_defaults(provider.clone());

    let source = agent
        .generate_script(&knn_request())
        .await
        .expect("generation should succeed");

    // The returned source is fence-free and carries the verbatim paths and
    // the two metric print formats.
    assert!(!source.contains("```"));
    assert!(source.contains("./data/a_train.csv"));
    assert!(source.contains("./data/a_test.csv"));
    assert!(source.contains("AUROC"));
    assert!(source.contains("AUPRC"));

    // The assembled payload carried everything verbatim.
    let user = provider.last_user_message();
    assert!(user.contains("<KNN docs>"));
    assert!(user.contains("./data/a_train.csv"));
    assert!(user.contains("./data/a_test.csv"));
    assert!(user.contains(r#"{"n_neighbors":5}"#));
    assert!(user.contains("KNN"));

    // Sampling is pinned to zero.
    assert_eq!(provider.last_temperature(), Some(0.0));
}

#[tokio::test]
async fn test_generate_pygod_family_payload() {
    let provider = Arc::new(RecordingProvider::new("```python\npass\n```"));
    let agent = CoderAgent::with_defaults(provider.clone());

    let request = ScriptRequest::new(
        "DOMINANT",
        LibraryFamily::PyGod,
        "./data/inj_cora_train.pt",
        "./data/inj_cora_test.pt",
        "<DOMINANT docs>",
    );

    agent
        .generate_script(&request)
        .await
        .expect("generation should succeed");

    let user = provider.last_user_message();
    assert!(user.contains("from pygod.detector import DOMINANT"));
    assert!(user.contains("weights_only=False"));
    assert!(user.contains("./data/inj_cora_train.pt"));
    // The tabular loading contract never leaks into the graph template.
    assert!(!user.contains("DataLoader"));
}

#[tokio::test]
async fn test_revise_end_to_end() {
    let provider = Arc::new(RecordingProvider::new("```python\nfixed = True\n```"));
    let agent = CoderAgent::with_defaults(provider.clone());

    let mut artifact = CodeArtifact::new("KNN");
    artifact.code = "<broken script>".to_string();
    artifact.record_failure("ValueError: n_neighbors must be > 0");

    let source = agent
        .revise_script(&mut artifact, "<KNN docs>")
        .await
        .expect("revision should succeed");

    assert_eq!(source, "fixed = True");
    assert_eq!(artifact.review_count, 1);

    let user = provider.last_user_message();
    assert!(user.contains("<broken script>"));
    assert!(user.contains("ValueError: n_neighbors must be > 0"));
    assert!(user.contains("<KNN docs>"));
}

#[tokio::test]
async fn test_repeated_revisions_accumulate() {
    let provider = Arc::new(RecordingProvider::new("attempt = 'next'"));
    let agent = CoderAgent::with_defaults(provider);

    let mut artifact = CodeArtifact::new("KNN");
    artifact.code = "<broken script>".to_string();
    artifact.record_failure("IndexError");
    artifact.review_count = 2;

    let source = agent
        .revise_script(&mut artifact, "<docs>")
        .await
        .expect("revision should succeed");
    artifact.code = source;

    assert_eq!(artifact.review_count, 3);

    artifact.record_failure("still broken");
    agent
        .revise_script(&mut artifact, "<docs>")
        .await
        .expect("revision should succeed");

    assert_eq!(artifact.review_count, 4);
}

#[test]
fn test_artifact_file_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("artifact.json");

    let mut artifact = CodeArtifact::new("KNN");
    artifact.code = "print('AUROC: 0.91')".to_string();
    artifact.record_failure("ValueError");
    artifact.review_count = 1;

    let json = serde_json::to_string_pretty(&artifact).expect("serialize");
    std::fs::write(&path, json).expect("write");

    let raw = std::fs::read_to_string(&path).expect("read");
    let back: CodeArtifact = serde_json::from_str(&raw).expect("deserialize");

    assert_eq!(back, artifact);
}
