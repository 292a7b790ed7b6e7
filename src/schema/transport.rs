use super::error::SchemaError;
use super::source::SchemaSource;
use anyhow::Context;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Materializes a schema source at a local destination path.
///
/// The fetcher owns staging and cleanup; a transport only has to put the
/// bytes at `destination`.
pub trait SchemaTransport {
    fn retrieve(&self, source: &SchemaSource, destination: &Path) -> anyhow::Result<()>;
}

/// Local files are copied, `http(s)` URLs are downloaded with a blocking client.
pub struct DefaultTransport {
    client: reqwest::blocking::Client,
}

impl DefaultTransport {
    /// Build a transport. `timeout` of `None` keeps the client default.
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(concat!("crdgen/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl SchemaTransport for DefaultTransport {
    fn retrieve(&self, source: &SchemaSource, destination: &Path) -> anyhow::Result<()> {
        match source {
            SchemaSource::Local(path) => {
                fs::copy(path, destination)
                    .with_context(|| format!("Failed to read CRD file {}", path.display()))?;
            }
            SchemaSource::Remote(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .with_context(|| format!("Failed to fetch CRD from {url}"))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SchemaError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    }
                    .into());
                }
                let body = response
                    .bytes()
                    .with_context(|| format!("Failed to read CRD body from {url}"))?;
                fs::write(destination, &body).with_context(|| {
                    format!("Failed to stage CRD at {}", destination.display())
                })?;
                debug!(%url, bytes = body.len(), "Downloaded CRD");
            }
        }
        Ok(())
    }
}
