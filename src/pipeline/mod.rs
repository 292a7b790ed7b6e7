//! # Pipeline Module
//!
//! Drives one generation run end to end:
//!
//! ```text
//! discover_configs(root, "generate.yaml")
//!   └─ for each config (sorted):
//!        load_descriptor ──ignore: true──▶ Ignored
//!          │
//!        SchemaFetcher::fetch(crd, root)
//!          │
//!        TemplateEngine::evaluate(script, {config, crd})
//!          │
//!        OutputWriter::reconcile(documents, output dir)
//! ```
//!
//! Descriptors are processed sequentially and independently. A failure in
//! any stage is logged, recorded in the [`GenerationReport`] and the run
//! moves on to the next descriptor.

mod discover;
mod report;

pub use discover::{discover_configs, Discovery};
pub use report::{
    print_report, DescriptorOutcome, DescriptorStatus, GenerationReport, Stage,
};

use crate::descriptor::{load_descriptor, GeneratorDescriptor};
use crate::engine::{resolve_script, TemplateEngine, TemplateInputs};
use crate::schema::SchemaFetcher;
use crate::writer::OutputWriter;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{error, info, info_span, warn};

/// Config file name searched for when none is given.
pub const DEFAULT_INPUT_NAME: &str = "generate.yaml";

/// Everything a run needs to know, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Root searched for configs; also the base for relative CRD references.
    pub input_path: PathBuf,
    /// Config file name to search for.
    pub input_name: String,
    /// Directory templates are resolved against.
    pub scripts_dir: PathBuf,
    /// Template used for every descriptor, overriding `scriptFile`.
    pub script_override: Option<String>,
    /// Write all outputs here instead of next to each config.
    pub output_path: Option<PathBuf>,
    pub dry_run: bool,
}

impl PipelineConfig {
    pub fn new(input_path: impl Into<PathBuf>, scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            input_name: DEFAULT_INPUT_NAME.to_string(),
            scripts_dir: scripts_dir.into(),
            script_override: None,
            output_path: None,
            dry_run: false,
        }
    }
}

/// Runs the discover → load → fetch → evaluate → write pipeline.
pub struct Orchestrator {
    config: PipelineConfig,
    fetcher: SchemaFetcher,
    engine: Box<dyn TemplateEngine>,
    writer: OutputWriter,
    clock: fn() -> DateTime<Local>,
}

impl Orchestrator {
    pub fn new(
        config: PipelineConfig,
        fetcher: SchemaFetcher,
        engine: Box<dyn TemplateEngine>,
    ) -> Self {
        let writer = OutputWriter::new(config.dry_run);
        Self {
            config,
            fetcher,
            engine,
            writer,
            clock: Local::now,
        }
    }

    /// Replace the wall clock used for header timestamps.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process every discovered config. Never fails as a whole.
    pub fn run(&self) -> GenerationReport {
        let discovery = discover_configs(&self.config.input_path, &self.config.input_name);
        info!(
            root = %self.config.input_path.display(),
            configs = discovery.configs.len(),
            "Discovered generator configs"
        );

        let descriptors = discovery
            .configs
            .iter()
            .map(|path| DescriptorOutcome {
                config_path: path.clone(),
                status: self.process(path),
            })
            .collect();

        GenerationReport {
            discovery_errors: discovery.errors,
            descriptors,
        }
    }

    /// Run one config through the pipeline.
    pub fn process(&self, config_path: &Path) -> DescriptorStatus {
        let _span = info_span!("generator", config = %config_path.display()).entered();

        let mut descriptor = match load_descriptor(config_path) {
            Ok(descriptor) => descriptor,
            Err(e) => return failed(Stage::Load, e),
        };
        if descriptor.ignore {
            warn!(name = %descriptor.name, "Generator asks to be ignored, skipping");
            return DescriptorStatus::Ignored {
                name: descriptor.name,
            };
        }

        match self
            .fetcher
            .fetch(&descriptor.crd_reference, &self.config.input_path)
        {
            Ok(crd) => descriptor.resolved_schema_source = Some(crd),
            Err(e) => return failed(Stage::Fetch, e),
        }

        let documents = match self.evaluate(&descriptor) {
            Ok(documents) => documents,
            Err(e) => return failed(Stage::Evaluate, e),
        };

        let target_dir = self
            .config
            .output_path
            .as_deref()
            .unwrap_or(&descriptor.config_directory);
        let now = (self.clock)();
        DescriptorStatus::Generated {
            documents: self.writer.reconcile(&documents, target_dir, &now),
        }
    }

    fn evaluate(
        &self,
        descriptor: &GeneratorDescriptor,
    ) -> anyhow::Result<crate::document::DocumentSet> {
        let script = resolve_script(
            &self.config.scripts_dir,
            self.config.script_override.as_deref(),
            descriptor.script_file_override.as_deref(),
        );
        let inputs = TemplateInputs {
            config: descriptor.to_template_input()?,
            crd: descriptor.resolved_schema_source.clone().unwrap_or_default(),
        };
        info!(script = %script.display(), "Evaluating template");
        self.engine.evaluate(&script, &inputs)
    }
}

fn failed(stage: Stage, e: anyhow::Error) -> DescriptorStatus {
    let error = format!("{e:#}");
    error!(%stage, %error, "Generator failed, continuing with next config");
    DescriptorStatus::Failed { stage, error }
}
