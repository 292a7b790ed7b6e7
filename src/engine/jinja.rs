use super::{parse_template_output, TemplateEngine, TemplateInputs};
use crate::document::DocumentSet;
use anyhow::Context;
use minijinja::{
    context, path_loader, AutoEscape, Environment, ErrorKind, UndefinedBehavior, Value,
};
use std::path::Path;
use tracing::debug;

/// [`TemplateEngine`] backed by minijinja.
///
/// Templates are loaded from the script's directory, so a template may
/// `{% include %}` or `{% import %}` its siblings. Undefined variables are
/// errors rather than empty strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct JinjaEngine;

impl JinjaEngine {
    pub fn new() -> Self {
        Self
    }

    fn environment(scripts_dir: &Path) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_loader(path_loader(scripts_dir));
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        // Output is YAML whatever the file is called; never HTML/JSON-escape it.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("fromjson", from_json);
        env
    }
}

impl TemplateEngine for JinjaEngine {
    fn evaluate(&self, script: &Path, inputs: &TemplateInputs) -> anyhow::Result<DocumentSet> {
        if !script.is_file() {
            anyhow::bail!("Template not found: {}", script.display());
        }
        let (dir, name) = match (script.parent(), script.file_name()) {
            (Some(dir), Some(name)) => (dir, name.to_string_lossy()),
            _ => anyhow::bail!("Invalid template path: {}", script.display()),
        };

        let env = Self::environment(dir);
        let template = env
            .get_template(&name)
            .with_context(|| format!("Error loading template {}", script.display()))?;
        let rendered = template
            .render(context! {
                config => inputs.config.as_str(),
                crd => inputs.crd.as_str(),
            })
            .with_context(|| format!("Error applying template {}", script.display()))?;
        debug!(script = %script.display(), bytes = rendered.len(), "Rendered template");

        parse_template_output(&rendered)
            .with_context(|| format!("Invalid output from template {}", script.display()))
    }
}

/// `{{ crd | fromjson }}` - parse a JSON string into a template value.
fn from_json(text: String) -> Result<Value, minijinja::Error> {
    serde_json::from_str::<serde_json::Value>(&text)
        .map(|v| Value::from_serialize(&v))
        .map_err(|e| {
            minijinja::Error::new(ErrorKind::InvalidOperation, "fromjson: invalid JSON")
                .with_source(e)
        })
}
