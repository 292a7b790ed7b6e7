use crate::engine::JinjaEngine;
use crate::pipeline::{
    print_report, GenerationReport, Orchestrator, PipelineConfig, DEFAULT_INPUT_NAME,
};
use crate::schema::{DefaultTransport, SchemaFetcher};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Directory searched for templates when `--scriptPath` is not given,
/// relative to the directory holding the executable.
pub const DEFAULT_SCRIPTS_DIR_NAME: &str = "functions";

/// Command-line interface for crdgen
///
/// Finds generator configs, fetches the CRD each one names, renders it
/// through a template and writes the resulting manifests.
#[derive(Debug, Parser)]
#[command(name = "crdgen", version)]
#[command(
    about = "Generate Crossplane definitions and compositions from CRDs",
    long_about = None
)]
pub struct Cli {
    /// Config file name to search for
    #[arg(
        long = "inputName",
        alias = "input-name",
        env = "CRDGEN_INPUT_NAME",
        default_value = DEFAULT_INPUT_NAME
    )]
    pub input_name: String,

    /// Root directory to search under (default: current directory)
    #[arg(long = "inputPath", alias = "input-path", env = "CRDGEN_INPUT_PATH")]
    pub input_path: Option<PathBuf>,

    /// Template used for every config, overriding each config's scriptFile
    #[arg(long = "scriptName", alias = "script-name", env = "CRDGEN_SCRIPT_NAME")]
    pub script_name: Option<String>,

    /// Directory templates are loaded from (default: functions/ beside the binary)
    #[arg(long = "scriptPath", alias = "script-path", env = "CRDGEN_SCRIPT_PATH")]
    pub script_path: Option<PathBuf>,

    /// Write all generated files here instead of beside each config
    #[arg(long = "outputPath", alias = "output-path", env = "CRDGEN_OUTPUT_PATH")]
    pub output_path: Option<PathBuf>,

    /// Perform a dry run: show what would change without writing files
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Exit with status 1 if any config or output failed
    #[arg(long, default_value_t = false)]
    pub fail_on_error: bool,
}

impl Cli {
    /// Resolve defaults into a pipeline configuration.
    pub fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let input_path = match non_empty_path(self.input_path.as_ref()) {
            Some(path) => path,
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        let scripts_dir = match non_empty_path(self.script_path.as_ref()) {
            Some(path) => path,
            None => default_scripts_dir()?,
        };
        let input_name = if self.input_name.trim().is_empty() {
            DEFAULT_INPUT_NAME.to_string()
        } else {
            self.input_name.clone()
        };

        Ok(PipelineConfig {
            input_path,
            input_name,
            scripts_dir,
            script_override: self.script_name.clone().filter(|s| !s.is_empty()),
            output_path: non_empty_path(self.output_path.as_ref()),
            dry_run: self.dry_run,
        })
    }

    /// Whether a finished run should end with a non-zero exit status.
    pub fn should_fail(&self, report: &GenerationReport) -> bool {
        self.fail_on_error && report.has_failures()
    }
}

fn non_empty_path(path: Option<&PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty()).cloned()
}

/// `<directory of the running executable>/functions`
pub fn default_scripts_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    let dir = exe
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Executable path has no parent: {}", exe.display()))?;
    Ok(dir.join(DEFAULT_SCRIPTS_DIR_NAME))
}

/// Run one generation pass and print its summary.
///
/// Only setup problems are returned as errors; everything that goes wrong
/// while processing configs ends up in the returned report.
pub fn run_cli(cli: &Cli) -> anyhow::Result<GenerationReport> {
    let config = cli.pipeline_config()?;
    info!(
        input_path = %config.input_path.display(),
        input_name = %config.input_name,
        scripts_dir = %config.scripts_dir.display(),
        script_override = config.script_override.as_deref().unwrap_or(""),
        output_path = ?config.output_path,
        dry_run = config.dry_run,
        "Starting generation"
    );

    let fetcher = SchemaFetcher::new(Box::new(DefaultTransport::new(None)?));
    let orchestrator = Orchestrator::new(config, fetcher, Box::new(JinjaEngine::new()));
    let report = orchestrator.run();

    print_report(&report);
    Ok(report)
}
