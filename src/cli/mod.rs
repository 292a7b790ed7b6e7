//! # CLI Module
//!
//! Command-line front end for the generator. Flags map one to one onto a
//! [`PipelineConfig`](crate::pipeline::PipelineConfig); every flag can also
//! come from a `CRDGEN_*` environment variable.
//!
//! ## Flags
//!
//! - `--inputName <NAME>` - config file name to search for (default: `generate.yaml`)
//! - `--inputPath <DIR>` - root to search under (default: current directory)
//! - `--scriptName <FILE>` - template used for every config, overriding `scriptFile`
//! - `--scriptPath <DIR>` - template directory (default: `functions/` next to the binary)
//! - `--outputPath <DIR>` - write all outputs here instead of beside each config
//! - `--dry-run` - report what would change, write nothing
//! - `--fail-on-error` - exit 1 when anything failed
//!
//! ## Examples
//!
//! ```bash
//! # Regenerate everything under ./apis
//! crdgen --inputPath apis --scriptPath functions
//!
//! # See what a template change would touch
//! crdgen --inputPath apis --scriptName generate-v2.j2 --dry-run
//!
//! # CI: fail the job on any broken config
//! CRDGEN_INPUT_PATH=apis crdgen --fail-on-error
//! ```

mod commands;


pub use commands::{default_scripts_dir, run_cli, Cli};
