//! Placeholder binding and instruction payload assembly.
//!
//! A [`PromptTemplate`] is a fixed ordered list of sections whose bodies may
//! reference named placeholders. [`PromptTemplate::bind`] resolves every
//! placeholder from a [`PlaceholderValues`] map and fails fast with
//! [`AgentError::MissingField`] when a referenced placeholder has no
//! non-empty value — before any model call is made.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::agents::{CodeArtifact, ScriptRequest};
use crate::error::{AgentError, AgentResult};
use crate::prompts::templates::{generation_template, repair_template};

/// The full set of placeholder names templates may reference.
const PLACEHOLDERS: &[&str] = &[
    "algorithm",
    "documentation",
    "train_path",
    "test_path",
    "parameters",
    "code",
    "error_message",
];

/// The role a section plays inside an instruction payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Task statement for the model.
    Objective,
    /// Verbatim documentation excerpt.
    Documentation,
    /// Ordered structural requirements the emitted code must satisfy.
    Checklist,
    /// Hard constraints on the output.
    Constraints,
    /// The failing source being repaired.
    PriorCode,
    /// Runtime error reported by the execution collaborator.
    ErrorReport,
}

/// One slot-pattern section of a template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateSection {
    /// Role of this section.
    pub kind: SectionKind,
    /// Body text, possibly containing `{placeholder}` references.
    pub body: &'static str,
}

/// An immutable named template: system prompt plus ordered sections.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    /// Template name, for logging.
    pub name: &'static str,
    /// System prompt establishing the coder's role.
    pub system: &'static str,
    /// Ordered instruction sections.
    pub sections: &'static [TemplateSection],
}

/// Values to substitute into a template's placeholders.
///
/// Backed by a sorted map so assembly is deterministic regardless of
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderValues {
    values: BTreeMap<&'static str, String>,
}

impl PlaceholderValues {
    /// Creates an empty value set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a placeholder value.
    pub fn set(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(name, value.into());
        self
    }

    /// Gets a placeholder value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// A section with every placeholder resolved.
#[derive(Debug, Clone)]
pub struct RenderedSection {
    /// Role of this section.
    pub kind: SectionKind,
    /// Fully-resolved text.
    pub text: String,
}

/// A fully-resolved instruction payload ready for the generation invoker.
#[derive(Debug, Clone)]
pub struct InstructionPayload {
    /// Template this payload was assembled from.
    pub template_name: &'static str,
    /// System prompt.
    pub system: String,
    /// Rendered sections in template order.
    pub sections: Vec<RenderedSection>,
}

impl InstructionPayload {
    /// Joins the rendered sections into the user message text.
    pub fn user_message(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl PromptTemplate {
    /// Binds placeholder values into this template.
    ///
    /// Pure and deterministic: identical inputs yield byte-identical
    /// payloads. Placeholder substitution never reformats the bound text.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MissingField`] if a placeholder referenced by
    /// any section has no value or an empty value.
    pub fn bind(&self, values: &PlaceholderValues) -> AgentResult<InstructionPayload> {
        let mut sections = Vec::with_capacity(self.sections.len());

        for section in self.sections {
            let mut text = section.body.to_string();

            for &name in PLACEHOLDERS {
                let token = format!("{{{}}}", name);
                if !section.body.contains(&token) {
                    continue;
                }

                let value = values
                    .get(name)
                    .filter(|v| !v.is_empty())
                    .ok_or(AgentError::MissingField(name))?;

                text = text.replace(&token, value);
            }

            sections.push(RenderedSection {
                kind: section.kind,
                text,
            });
        }

        Ok(InstructionPayload {
            template_name: self.name,
            system: self.system.to_string(),
            sections,
        })
    }
}

/// Renders a hyperparameter map as a display string for the model.
///
/// The rendering is JSON object text with stable key order; it is read by
/// the model, never parsed programmatically.
fn render_parameters(parameters: &serde_json::Map<String, Value>) -> String {
    Value::Object(parameters.clone()).to_string()
}

/// Assembles the generation payload for a script request.
///
/// Selects the template matching the request's library family and binds the
/// algorithm name, verbatim documentation excerpt, verbatim train/test path
/// strings, and the serialized hyperparameter map.
pub fn build_generation_prompt(request: &ScriptRequest) -> AgentResult<InstructionPayload> {
    let template = generation_template(request.family);

    let values = PlaceholderValues::new()
        .set("algorithm", &request.algorithm)
        .set("documentation", &request.documentation)
        .set("train_path", &request.train_path)
        .set("test_path", &request.test_path)
        .set("parameters", render_parameters(&request.parameters));

    template.bind(&values)
}

/// Assembles the repair payload for a failed artifact.
///
/// Binds the prior source, the runtime error message, the algorithm name,
/// and the documentation excerpt into the repair template.
pub fn build_repair_prompt(
    artifact: &CodeArtifact,
    documentation: &str,
) -> AgentResult<InstructionPayload> {
    let values = PlaceholderValues::new()
        .set("code", &artifact.code)
        .set("error_message", &artifact.error_message)
        .set("algorithm", &artifact.algorithm)
        .set("documentation", documentation);

    repair_template().bind(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::LibraryFamily;

    fn request() -> ScriptRequest {
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

    #[test]
    fn test_bind_is_deterministic() {
        let req = request();
        let first = build_generation_prompt(&req).expect("assembly should succeed");
        let second = build_generation_prompt(&req).expect("assembly should succeed");

        assert_eq!(first.system, second.system);
        assert_eq!(first.user_message(), second.user_message());
    }

    #[test]
    fn test_verbatim_passthrough() {
        let mut req = request();
        req.documentation = "  line one\n\n\tline two  ".to_string();
        req.train_path = "./odd path/train .csv".to_string();

        let payload = build_generation_prompt(&req).expect("assembly should succeed");
        let user = payload.user_message();

        assert!(user.contains("  line one\n\n\tline two  "));
        assert!(user.contains("./odd path/train .csv"));
        assert!(user.contains("./data/a_test.csv"));
    }

    #[test]
    fn test_parameters_rendering() {
        let payload = build_generation_prompt(&request()).expect("assembly should succeed");
        assert!(payload.user_message().contains(r#"{"n_neighbors":5}"#));
    }

    #[test]
    fn test_empty_parameters_render_as_empty_object() {
        let mut req = request();
        req.parameters = serde_json::Map::new();

        let payload = build_generation_prompt(&req).expect("assembly should succeed");
        assert!(payload.user_message().contains("{}"));
    }

    #[test]
    fn test_missing_documentation_fails_fast() {
        let mut req = request();
        req.documentation = String::new();

        let err = build_generation_prompt(&req).expect_err("should fail");
        assert!(matches!(err, AgentError::MissingField("documentation")));
    }

    #[test]
    fn test_missing_algorithm_fails_fast() {
        let mut req = request();
        req.algorithm = String::new();

        let err = build_generation_prompt(&req).expect_err("should fail");
        assert!(matches!(err, AgentError::MissingField("algorithm")));
    }

    #[test]
    fn test_family_selects_template() {
        let mut req = request();
        let pyod = build_generation_prompt(&req).expect("assembly should succeed");

        req.family = LibraryFamily::PyGod;
        let pygod = build_generation_prompt(&req).expect("assembly should succeed");

        assert_eq!(pyod.template_name, "pyod_generation");
        assert_eq!(pygod.template_name, "pygod_generation");
        assert!(pyod.user_message().contains("PyOD"));
        assert!(pygod.user_message().contains("PyGOD"));
        // No cross-contamination of the family-specific loading contracts.
        assert!(pyod.user_message().contains("DataLoader"));
        assert!(!pygod.user_message().contains("DataLoader"));
        assert!(pygod.user_message().contains("torch.load"));
        assert!(!pyod.user_message().contains("torch.load"));
    }

    #[test]
    fn test_repair_prompt_binding() {
        let mut artifact = CodeArtifact::new("KNN");
        artifact.code = "broken = script".to_string();
        artifact.error_message = "ValueError: n_neighbors must be > 0".to_string();

        let payload = build_repair_prompt(&artifact, "<KNN docs>").expect("assembly");
        let user = payload.user_message();

        assert!(user.contains("broken = script"));
        assert!(user.contains("ValueError: n_neighbors must be > 0"));
        assert!(user.contains("<KNN docs>"));
        assert!(user.contains("KNN"));
    }

    #[test]
    fn test_no_unresolved_placeholders() {
        let pyod = build_generation_prompt(&request()).expect("assembly");

        let mut artifact = CodeArtifact::new("KNN");
        artifact.code = "x = 1".to_string();
        artifact.error_message = "boom".to_string();
        let repair = build_repair_prompt(&artifact, "docs").expect("assembly");

        for payload in [pyod, repair] {
            let user = payload.user_message();
            for name in super::PLACEHOLDERS {
                assert!(
                    !user.contains(&format!("{{{}}}", name)),
                    "unresolved placeholder {{{}}} in {}",
                    name,
                    payload.template_name
                );
            }
        }
    }
}
