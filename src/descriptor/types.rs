use crate::document::Document;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// A field-level override applied by the template.
///
/// Only carried through; the template decides what `value`/`override` mean.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideField {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Document>,
    #[serde(rename = "override", skip_serializing_if = "Option::is_none")]
    pub override_value: Option<Document>,
    pub ignore: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Composition {
    pub name: String,
    pub provider: String,
    #[serde(rename = "default")]
    pub is_default: bool,
}

/// Everything one `generate.yaml` declares about a generation task.
///
/// Serialized (JSON, camelCase keys) and handed to the template as the
/// `config` input. `override_fields` and `compositions` are always emitted,
/// as empty sequences when the file omits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorDescriptor {
    pub group: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    /// Schema location: a path (relative to the input root) or a URL.
    #[serde(rename = "crd")]
    pub crd_reference: String,
    pub version: String,
    #[serde(
        rename = "scriptFile",
        alias = "scriptFileName",
        skip_serializing_if = "Option::is_none"
    )]
    pub script_file_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_secret_keys: Option<Vec<String>>,
    pub ignore: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_external_name: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid_field_path: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub override_fields: Vec<OverrideField>,
    #[serde(deserialize_with = "null_as_empty")]
    pub compositions: Vec<Composition>,

    /// Directory the descriptor was loaded from.
    #[serde(skip)]
    pub config_directory: PathBuf,
    /// Canonical JSON text of the fetched CRD, once retrieved.
    #[serde(skip)]
    pub resolved_schema_source: Option<String>,
}

impl GeneratorDescriptor {
    /// JSON text passed to the template as the `config` input.
    pub fn to_template_input(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// `overrideFields: ~` must still end up as `[]`, never null.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
