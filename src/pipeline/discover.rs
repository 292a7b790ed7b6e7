//! Generator config discovery.
//!
//! Configs live one or two directory levels below the input root:
//!
//! ```text
//! <root>/<provider>/generate.yaml
//! <root>/<provider>/<resource>/generate.yaml
//! ```
//!
//! A config directly in the root is not a match. Symlinked configs and
//! directories are followed.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const MIN_DEPTH: usize = 2;
const MAX_DEPTH: usize = 3;

/// Matches found under a root, plus any entries that could not be read.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Config files, sorted by path.
    pub configs: Vec<PathBuf>,
    pub errors: Vec<String>,
}

/// Find every file named `file_name` under `root`, sorted by path.
pub fn discover_configs(root: &Path, file_name: &str) -> Discovery {
    let mut discovery = Discovery::default();

    if !root.is_dir() {
        discovery
            .errors
            .push(format!("Input path is not a directory: {}", root.display()));
        return discovery;
    }

    let walker = WalkDir::new(root)
        .min_depth(MIN_DEPTH)
        .max_depth(MAX_DEPTH)
        .follow_links(true)
        .sort_by_file_name();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() && entry.file_name() == file_name => {
                debug!(config = %entry.path().display(), "Found generator config");
                discovery.configs.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => {
                warn!(root = %root.display(), error = %e, "Error finding generator files");
                discovery.errors.push(e.to_string());
            }
        }
    }

    discovery.configs.sort();
    discovery
}
