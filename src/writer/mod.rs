//! # Output Writer
//!
//! Reconciles a template's [`DocumentSet`] against the filesystem. Each
//! document lands in `<target_dir>/<name>.yaml`, but only when the file does
//! not already hold the same data:
//!
//! ```text
//! existing file?  ──no──────────────────────────────▶ write header + body
//!      │ yes
//!      ▼
//! decode (comments dropped) ──fails──▶ warn ─────────▶ write header + body
//!      │
//!      ▼
//! equal to new document? ──yes──▶ leave untouched (no write, mtime kept)
//!      │ no
//!      └────────────────────────────────────────────▶ write header + body
//! ```
//!
//! The header carries a timestamp, so comparing raw bytes would rewrite
//! every file on every run. Comparing decoded data keeps re-runs with
//! unchanged inputs write-free.

use crate::document::{Document, DocumentSet};
use anyhow::Context;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension appended to every output name.
pub const OUTPUT_EXTENSION: &str = "yaml";

/// The warning banner prepended to every generated file, ending in a blank line.
pub fn autogen_header(now: &DateTime<Local>) -> String {
    format!(
        "## WARNING: This file was autogenerated!\n\
         ## Manual modifications will be overwritten\n\
         ## unless ignore: true is set in generate.yaml!\n\
         ## Last Modification: {}.\n\
         \n",
        now.format("%H:%M:%S on %m-%d-%Y")
    )
}

/// What is currently on disk at an output path.
#[derive(Debug, Clone, PartialEq)]
pub enum ExistingFileState {
    Absent,
    Present(Document),
    /// The file exists but is not valid YAML.
    Undecodable(String),
}

impl ExistingFileState {
    /// Snapshot `path`. Only a failed read is an error.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::Absent),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Error reading from existing output file {}", path.display())
                })
            }
        };
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => return Ok(Self::Undecodable(e.to_string())),
        };
        Ok(match Document::from_yaml_str(&content) {
            Ok(document) => Self::Present(document),
            Err(e) => Self::Undecodable(e.to_string()),
        })
    }
}

/// Result of reconciling one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    /// The file was (re)written.
    Written,
    /// The file already held equal data; nothing was touched.
    Unchanged,
    /// Dry run: the file would have been written.
    WouldWrite,
    /// Reconciling this document failed; it was skipped.
    Failed(String),
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentStatus::Written => write!(f, "written"),
            DocumentStatus::Unchanged => write!(f, "unchanged"),
            DocumentStatus::WouldWrite => write!(f, "would write"),
            DocumentStatus::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOutcome {
    pub name: String,
    pub path: PathBuf,
    pub status: DocumentStatus,
}

/// Writes generated documents, skipping those already up to date.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutputWriter {
    dry_run: bool,
}

impl OutputWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Reconcile every document in `documents` into `target_dir`.
    ///
    /// A failure on one document is recorded in its outcome; the remaining
    /// documents are still processed.
    pub fn reconcile(
        &self,
        documents: &DocumentSet,
        target_dir: &Path,
        now: &DateTime<Local>,
    ) -> Vec<DocumentOutcome> {
        let header = autogen_header(now);
        documents
            .iter()
            .map(|(name, content)| {
                let path = output_path(target_dir, name);
                let status = match self.reconcile_one(name, content, &path, &header) {
                    Ok(status) => status,
                    Err(e) => {
                        let error = format!("{e:#}");
                        warn!(output = %path.display(), %error, "Skipping output document");
                        DocumentStatus::Failed(error)
                    }
                };
                DocumentOutcome {
                    name: name.clone(),
                    path,
                    status,
                }
            })
            .collect()
    }

    fn reconcile_one(
        &self,
        name: &str,
        content: &Document,
        path: &Path,
        header: &str,
    ) -> anyhow::Result<DocumentStatus> {
        validate_output_name(name)?;

        match ExistingFileState::read(path)? {
            ExistingFileState::Present(existing) if existing == *content => {
                debug!(output = %path.display(), "Output up to date");
                return Ok(DocumentStatus::Unchanged);
            }
            ExistingFileState::Undecodable(reason) => {
                warn!(output = %path.display(), %reason, "Existing output is not valid YAML, replacing it");
            }
            _ => {}
        }

        let body = content
            .to_yaml_string()
            .with_context(|| format!("Error converting {name} to YAML"))?;

        if self.dry_run {
            info!(output = %path.display(), "Would write generated file");
            return Ok(DocumentStatus::WouldWrite);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }
        fs::write(path, format!("{header}{body}"))
            .with_context(|| format!("Error writing generated file {}", path.display()))?;
        info!(output = %path.display(), "Wrote generated file");
        Ok(DocumentStatus::Written)
    }
}

/// `<target_dir>/<name>.yaml`
pub fn output_path(target_dir: &Path, name: &str) -> PathBuf {
    target_dir.join(format!("{name}.{OUTPUT_EXTENSION}"))
}

// Output names come from templates; keep them inside the target directory.
fn validate_output_name(name: &str) -> anyhow::Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
        _ => anyhow::bail!("Invalid output name '{name}': must be a plain file name"),
    }
}
