//! # Template Engine
//!
//! The engine is a pure function from a generator config and a CRD to a set
//! of named documents. It sits behind the [`TemplateEngine`] trait so the
//! pipeline never depends on a particular template language;
//! [`JinjaEngine`] is the default implementation.
//!
//! Templates receive exactly two inputs, both strings:
//!
//! - `config` - the generator descriptor, serialized as JSON
//! - `crd` - the CRD, normalized to JSON
//!
//! and must render a YAML (or JSON) mapping of output name to document:
//!
//! ```text
//! {% set cfg = config | fromjson %}
//! definition:
//!   apiVersion: apiextensions.crossplane.io/v1
//!   kind: CompositeResourceDefinition
//!   metadata:
//!     name: {{ cfg.plural if cfg.plural is defined else cfg.name | lower ~ "s" }}.{{ cfg.group }}
//! ```
//!
//! Output must be deterministic: the writer relies on identical inputs
//! producing identical documents to keep re-runs write-free.

mod jinja;

pub use jinja::JinjaEngine;

use crate::document::{Document, DocumentSet};
use std::path::{Path, PathBuf};

/// Template evaluated when neither the command line nor the descriptor names one.
pub const DEFAULT_SCRIPT_NAME: &str = "generate.j2";

/// The two named external inputs of every template evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInputs {
    /// Descriptor JSON
    pub config: String,
    /// Canonical CRD JSON
    pub crd: String,
}

pub trait TemplateEngine {
    /// Evaluate `script` against `inputs`.
    fn evaluate(&self, script: &Path, inputs: &TemplateInputs) -> anyhow::Result<DocumentSet>;
}

/// Pick the template for one descriptor.
///
/// Priority: command-level override, then the descriptor's `scriptFile`,
/// then [`DEFAULT_SCRIPT_NAME`]. All are relative to `scripts_dir`.
pub fn resolve_script(
    scripts_dir: &Path,
    command_override: Option<&str>,
    descriptor_override: Option<&str>,
) -> PathBuf {
    let name = command_override
        .filter(|s| !s.is_empty())
        .or(descriptor_override.filter(|s| !s.is_empty()))
        .unwrap_or(DEFAULT_SCRIPT_NAME);
    scripts_dir.join(name)
}

/// Decode rendered template text into a document set.
pub fn parse_template_output(rendered: &str) -> anyhow::Result<DocumentSet> {
    let document = Document::from_yaml_str(rendered)
        .map_err(|e| anyhow::anyhow!("Error decoding template output: {e}"))?;
    match document {
        Document::Mapping(map) => Ok(map),
        other => anyhow::bail!(
            "Template output must be a mapping of output name to document, got {}",
            other.kind()
        ),
    }
}
