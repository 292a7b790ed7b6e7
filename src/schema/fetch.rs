use super::error::SchemaError;
use super::source::SchemaSource;
use super::transport::SchemaTransport;
use anyhow::Context;
use std::path::Path;
use tracing::info;

/// Resolves, retrieves and normalizes CRDs.
pub struct SchemaFetcher {
    transport: Box<dyn SchemaTransport>,
}

impl SchemaFetcher {
    pub fn new(transport: Box<dyn SchemaTransport>) -> Self {
        Self { transport }
    }

    /// Fetch the CRD named by `reference` and return canonical JSON text.
    ///
    /// Relative references resolve against `base_dir`. The artifact is
    /// staged in a private temporary directory which is removed when this
    /// call returns, whether it succeeded or not.
    pub fn fetch(&self, reference: &str, base_dir: &Path) -> anyhow::Result<String> {
        let source = SchemaSource::resolve(reference, base_dir)?;

        let staging = tempfile::Builder::new()
            .prefix("gencrd")
            .tempdir()
            .context("Failed to create CRD staging directory")?;
        let staged = staging.path().join(source.file_name());

        info!(%source, "Retrieving CRD file");
        self.transport
            .retrieve(&source, &staged)
            .with_context(|| format!("Get CRD {reference}"))?;

        let raw = std::fs::read(&staged)
            .with_context(|| format!("Failed to read staged CRD {}", staged.display()))?;
        if raw.is_empty() {
            return Err(SchemaError::EmptyContent {
                reference: reference.to_string(),
            }
            .into());
        }

        normalize_schema(&raw).map_err(|e| match e.downcast::<SchemaError>() {
            Ok(SchemaError::EmptyContent { .. }) => SchemaError::EmptyContent {
                reference: reference.to_string(),
            }
            .into(),
            Ok(other) => other.into(),
            Err(e) => e.context(format!("Convert CRD {reference} to JSON")),
        })
    }
}

/// Convert YAML (or JSON) bytes to compact canonical JSON text.
pub fn normalize_schema(raw: &[u8]) -> anyhow::Result<String> {
    let value: serde_json::Value =
        serde_yaml::from_slice(raw).context("CRD is not valid YAML or JSON")?;
    if value.is_null() {
        return Err(SchemaError::EmptyContent {
            reference: String::new(),
        }
        .into());
    }
    Ok(serde_json::to_string(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DefaultTransport;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;

    /// Records where the fetcher staged the artifact, then delegates.
    struct RecordingTransport {
        staged_at: Rc<RefCell<Option<PathBuf>>>,
        fail: bool,
    }

    impl SchemaTransport for RecordingTransport {
        fn retrieve(&self, source: &SchemaSource, destination: &Path) -> anyhow::Result<()> {
            *self.staged_at.borrow_mut() = Some(destination.to_path_buf());
            if self.fail {
                fs::write(destination, "partial")?;
                anyhow::bail!("connection reset");
            }
            DefaultTransport::new(None)?.retrieve(source, destination)
        }
    }

    const CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: buckets.s3.aws.crossplane.io
spec:
  group: s3.aws.crossplane.io
"#;

    #[test]
    fn test_normalize_yaml_to_compact_json() {
        let json = normalize_schema(b"kind: CRD\nspec:\n  group: g\n").unwrap();
        assert_eq!(json, r#"{"kind":"CRD","spec":{"group":"g"}}"#);
    }

    #[test]
    fn test_normalize_accepts_json() {
        let json = normalize_schema(br#"{ "kind" : "CRD" }"#).unwrap();
        assert_eq!(json, r#"{"kind":"CRD"}"#);
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_schema(b"kind: [broken").is_err());
    }

    #[test]
    fn test_normalize_rejects_comment_only() {
        assert!(normalize_schema(b"# nothing here\n").is_err());
    }

    #[test]
    fn test_fetch_local_relative_reference() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("crds")).unwrap();
        fs::write(root.path().join("crds/bucket.yaml"), CRD).unwrap();

        let fetcher = SchemaFetcher::new(Box::new(DefaultTransport::new(None).unwrap()));
        let json = fetcher.fetch("./crds/bucket.yaml", root.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["spec"]["group"], "s3.aws.crossplane.io");
    }

    #[test]
    fn test_staging_removed_after_success() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("crd.yaml"), CRD).unwrap();
        let staged_at = Rc::new(RefCell::new(None));
        let fetcher = SchemaFetcher::new(Box::new(RecordingTransport {
            staged_at: Rc::clone(&staged_at),
            fail: false,
        }));

        fetcher.fetch("crd.yaml", root.path()).unwrap();

        let staged = staged_at.borrow().clone().unwrap();
        assert_eq!(staged.file_name().unwrap(), "crd.yaml");
        assert!(!staged.parent().unwrap().exists());
    }

    #[test]
    fn test_staging_removed_after_failure() {
        let root = tempfile::tempdir().unwrap();
        let staged_at = Rc::new(RefCell::new(None));
        let fetcher = SchemaFetcher::new(Box::new(RecordingTransport {
            staged_at: Rc::clone(&staged_at),
            fail: true,
        }));

        let err = fetcher.fetch("crd.yaml", root.path()).unwrap_err();
        assert!(format!("{err:#}").contains("connection reset"));

        let staged = staged_at.borrow().clone().unwrap();
        assert!(!staged.parent().unwrap().exists());
    }

    #[test]
    fn test_empty_file_is_reported() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("empty.yaml"), "").unwrap();
        let fetcher = SchemaFetcher::new(Box::new(DefaultTransport::new(None).unwrap()));

        let err = fetcher.fetch("empty.yaml", root.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SchemaError>(),
            Some(&SchemaError::EmptyContent {
                reference: "empty.yaml".to_string()
            })
        );
    }

    #[test]
    fn test_missing_local_file_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let fetcher = SchemaFetcher::new(Box::new(DefaultTransport::new(None).unwrap()));
        assert!(fetcher.fetch("nope.yaml", root.path()).is_err());
    }
}
