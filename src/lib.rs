//! # crdgen
//!
//! **crdgen** turns Kubernetes CustomResourceDefinitions into Crossplane
//! definitions and compositions. Each API you want to expose gets a small
//! `generate.yaml` describing it; crdgen finds those files, fetches the CRD
//! each one points at, feeds both through a template and writes the
//! resulting manifests next to the config.
//!
//! ## Architecture
//!
//! - **[`document`]** - Structured document values compared by data, not bytes
//! - **[`descriptor`]** - `generate.yaml` model and loader
//! - **[`schema`]** - CRD resolution, retrieval (file or HTTP) and JSON normalization
//! - **[`engine`]** - Template evaluation behind the [`engine::TemplateEngine`] trait
//! - **[`writer`]** - Change-detecting output writer
//! - **[`pipeline`]** - Discovery and per-config orchestration with a run report
//! - **[`cli`]** - Command-line front end
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(crdgen)
//!     participant Orch as pipeline::Orchestrator
//!     participant Load as descriptor::load_descriptor
//!     participant Fetch as schema::SchemaFetcher
//!     participant Engine as engine::TemplateEngine
//!     participant Writer as writer::OutputWriter
//!     participant FS as File System
//!
//!     CLI->>Orch: run()
//!     Orch->>FS: discover <root>/*/generate.yaml
//!     loop every config, sorted
//!         Orch->>Load: load_descriptor(path)
//!         alt ignore: true
//!             Load-->>Orch: skip
//!         end
//!         Orch->>Fetch: fetch(crd, root)
//!         Fetch->>FS: stage in temp dir (removed afterwards)
//!         Fetch-->>Orch: CRD as JSON
//!         Orch->>Engine: evaluate(script, {config, crd})
//!         Engine-->>Orch: name → document
//!         Orch->>Writer: reconcile(documents, dir)
//!         Writer->>FS: write only what changed
//!     end
//!     Orch-->>CLI: GenerationReport
//! ```
//!
//! A failure in any step is logged and recorded in the
//! [`pipeline::GenerationReport`]; the run always continues with the next
//! config.
//!
//! ## Quick Start
//!
//! ```no_run
//! use crdgen::engine::JinjaEngine;
//! use crdgen::pipeline::{print_report, Orchestrator, PipelineConfig};
//! use crdgen::schema::{DefaultTransport, SchemaFetcher};
//!
//! let config = PipelineConfig::new("apis", "functions");
//! let fetcher = SchemaFetcher::new(Box::new(DefaultTransport::new(None).unwrap()));
//! let report = Orchestrator::new(config, fetcher, Box::new(JinjaEngine::new())).run();
//! print_report(&report);
//! ```
//!
//! ## Re-runs
//!
//! Generated files start with a timestamped header, so the writer compares
//! decoded data instead of bytes. Running twice with the same inputs writes
//! nothing the second time. Set `ignore: true` in a `generate.yaml` to stop
//! crdgen from touching that API's files at all.

pub mod cli;
pub mod descriptor;
pub mod document;
pub mod engine;
pub mod logging;
pub mod pipeline;
pub mod schema;
pub mod writer;

pub use descriptor::{load_descriptor, GeneratorDescriptor};
pub use document::{Document, DocumentSet};
pub use pipeline::{GenerationReport, Orchestrator, PipelineConfig};
