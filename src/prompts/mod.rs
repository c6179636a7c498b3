//! Prompt templates and assembly for the coder agent.
//!
//! This module holds the three instruction templates (PyOD generation,
//! PyGOD generation, repair) and the binding machinery that turns a request
//! into a fully-resolved [`InstructionPayload`].
//!
//! Templates are immutable `&'static` data: an ordered list of typed
//! instruction sections plus a system prompt. Binding is a pure function —
//! the same request fields always produce a byte-identical payload, and the
//! documentation excerpt and dataset path strings are injected verbatim so
//! the model's grounding stays faithful to source documentation.
//!
//! The structural checklists inside the templates are instructions *to the
//! model*, not programmatically enforced contracts; whether generated code
//! actually satisfies them is settled by the external execution collaborator
//! and, on failure, the repair cycle.

mod payload;
mod templates;

pub use payload::{
    build_generation_prompt, build_repair_prompt, InstructionPayload, PlaceholderValues,
    PromptTemplate, RenderedSection, SectionKind, TemplateSection,
};
pub use templates::{generation_template, repair_template};
