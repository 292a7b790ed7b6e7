use super::types::GeneratorDescriptor;
use anyhow::Context;
use std::path::Path;
use tracing::debug;

/// Load a generator descriptor from a `generate.yaml` file.
///
/// Unknown keys are ignored and missing keys take their defaults. An
/// unreadable, empty, or malformed file is an error: the caller skips the
/// descriptor instead of generating from zero values.
pub fn load_descriptor(path: &Path) -> anyhow::Result<GeneratorDescriptor> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read generator config: {}", path.display()))?;
    if content.trim().is_empty() {
        anyhow::bail!("Generator config is empty: {}", path.display());
    }

    let mut descriptor: GeneratorDescriptor = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse generator config: {}", path.display()))?;
    descriptor.config_directory = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    debug!(
        config = %path.display(),
        name = %descriptor.name,
        group = %descriptor.group,
        crd = %descriptor.crd_reference,
        "Loaded generator config"
    );
    Ok(descriptor)
}
