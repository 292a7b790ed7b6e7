//! Per-run outcome accumulator.
//!
//! The pipeline never aborts on a failed descriptor or document. Instead
//! every outcome is collected here so callers (and tests) can inspect what
//! happened without scraping log output.

use crate::writer::{DocumentOutcome, DocumentStatus};
use std::fmt;
use std::path::PathBuf;

/// Pipeline stage a descriptor failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Fetch,
    Evaluate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Load => write!(f, "load"),
            Stage::Fetch => write!(f, "fetch"),
            Stage::Evaluate => write!(f, "evaluate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorStatus {
    /// `ignore: true`; nothing was fetched, evaluated or written.
    Ignored { name: String },
    Failed { stage: Stage, error: String },
    Generated { documents: Vec<DocumentOutcome> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorOutcome {
    pub config_path: PathBuf,
    pub status: DescriptorStatus,
}

/// Everything one pipeline run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub discovery_errors: Vec<String>,
    pub descriptors: Vec<DescriptorOutcome>,
}

impl GenerationReport {
    /// All document outcomes across every generated descriptor.
    pub fn documents(&self) -> impl Iterator<Item = &DocumentOutcome> {
        let none: &'static [DocumentOutcome] = &[];
        self.descriptors.iter().flat_map(move |d| match &d.status {
            DescriptorStatus::Generated { documents } => documents.iter(),
            _ => none.iter(),
        })
    }

    fn count_documents(&self, wanted: fn(&DocumentStatus) -> bool) -> usize {
        self.documents().filter(|d| wanted(&d.status)).count()
    }

    pub fn written(&self) -> usize {
        self.count_documents(|s| matches!(s, DocumentStatus::Written))
    }

    pub fn unchanged(&self) -> usize {
        self.count_documents(|s| matches!(s, DocumentStatus::Unchanged))
    }

    pub fn would_write(&self) -> usize {
        self.count_documents(|s| matches!(s, DocumentStatus::WouldWrite))
    }

    pub fn ignored(&self) -> usize {
        self.descriptors
            .iter()
            .filter(|d| matches!(d.status, DescriptorStatus::Ignored { .. }))
            .count()
    }

    /// Human-readable failure lines: discovery, descriptor and document failures.
    pub fn failures(&self) -> Vec<String> {
        let mut failures: Vec<String> = self
            .discovery_errors
            .iter()
            .map(|e| format!("[discover] {e}"))
            .collect();
        for descriptor in &self.descriptors {
            match &descriptor.status {
                DescriptorStatus::Failed { stage, error } => failures.push(format!(
                    "[{stage}] {}: {error}",
                    descriptor.config_path.display()
                )),
                DescriptorStatus::Generated { documents } => {
                    for doc in documents {
                        if let DocumentStatus::Failed(error) = &doc.status {
                            failures.push(format!("[write] {}: {error}", doc.path.display()));
                        }
                    }
                }
                DescriptorStatus::Ignored { .. } => {}
            }
        }
        failures
    }

    pub fn has_failures(&self) -> bool {
        !self.failures().is_empty()
    }
}

/// Print a run summary to stdout.
pub fn print_report(report: &GenerationReport) {
    println!("\n📋 Generation Results:");
    println!(
        "   {} config(s), {} ignored, {} written, {} unchanged",
        report.descriptors.len(),
        report.ignored(),
        report.written(),
        report.unchanged()
    );
    if report.would_write() > 0 {
        println!("   {} file(s) would be written (dry run)", report.would_write());
        for doc in report.documents() {
            if doc.status == DocumentStatus::WouldWrite {
                println!("      📝 {}", doc.path.display());
            }
        }
    }

    let failures = report.failures();
    if failures.is_empty() {
        println!("✅ No failures");
    } else {
        println!("\n❌ Failures ({}):", failures.len());
        for failure in &failures {
            println!("   {failure}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, status: DocumentStatus) -> DocumentOutcome {
        DocumentOutcome {
            name: name.to_string(),
            path: PathBuf::from(format!("/out/{name}.yaml")),
            status,
        }
    }

    fn sample() -> GenerationReport {
        GenerationReport {
            discovery_errors: vec!["permission denied".to_string()],
            descriptors: vec![
                DescriptorOutcome {
                    config_path: PathBuf::from("/in/a/generate.yaml"),
                    status: DescriptorStatus::Generated {
                        documents: vec![
                            doc("definition", DocumentStatus::Written),
                            doc("composition", DocumentStatus::Unchanged),
                            doc("bad", DocumentStatus::Failed("disk full".to_string())),
                        ],
                    },
                },
                DescriptorOutcome {
                    config_path: PathBuf::from("/in/b/generate.yaml"),
                    status: DescriptorStatus::Ignored {
                        name: "b".to_string(),
                    },
                },
                DescriptorOutcome {
                    config_path: PathBuf::from("/in/c/generate.yaml"),
                    status: DescriptorStatus::Failed {
                        stage: Stage::Fetch,
                        error: "404".to_string(),
                    },
                },
            ],
        }
    }

    #[test]
    fn test_counts() {
        let report = sample();
        assert_eq!(report.written(), 1);
        assert_eq!(report.unchanged(), 1);
        assert_eq!(report.would_write(), 0);
        assert_eq!(report.ignored(), 1);
        assert_eq!(report.documents().count(), 3);
    }

    #[test]
    fn test_failures_cover_every_category() {
        let failures = sample().failures();
        assert_eq!(
            failures,
            vec![
                "[discover] permission denied".to_string(),
                "[write] /out/bad.yaml: disk full".to_string(),
                "[fetch] /in/c/generate.yaml: 404".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_report_has_no_failures() {
        assert!(!GenerationReport::default().has_failures());
    }
}
