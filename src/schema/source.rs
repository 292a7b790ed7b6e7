use super::error::SchemaError;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Where a CRD lives, after resolving the descriptor's `crd` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Local(PathBuf),
    Remote(Url),
}

impl SchemaSource {
    /// Resolve a reference against `base_dir`.
    ///
    /// `http(s)://` URLs are remote, `file://` URLs and plain paths are
    /// local. Relative paths are joined onto `base_dir`; absolute paths are
    /// kept as-is.
    pub fn resolve(reference: &str, base_dir: &Path) -> Result<Self, SchemaError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(SchemaError::EmptyReference);
        }

        match Url::parse(reference) {
            // Single-letter schemes are Windows drive letters, not URLs.
            Ok(url) if url.scheme().len() > 1 => match url.scheme() {
                "http" | "https" => Ok(SchemaSource::Remote(url)),
                "file" => url.to_file_path().map(SchemaSource::Local).map_err(|()| {
                    SchemaError::UnsupportedScheme {
                        reference: reference.to_string(),
                        scheme: "file".to_string(),
                    }
                }),
                scheme => Err(SchemaError::UnsupportedScheme {
                    reference: reference.to_string(),
                    scheme: scheme.to_string(),
                }),
            },
            _ => Ok(SchemaSource::Local(base_dir.join(reference))),
        }
    }

    /// Base name the fetched artifact is staged under.
    pub fn file_name(&self) -> String {
        let name = match self {
            SchemaSource::Local(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            SchemaSource::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .map(str::to_string),
        };
        name.filter(|n| !n.is_empty())
            .unwrap_or_else(|| "crd.yaml".to_string())
    }
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSource::Local(path) => write!(f, "{}", path.display()),
            SchemaSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_is_anchored_at_base() {
        let source = SchemaSource::resolve("./crds/bucket.yaml", Path::new("/work")).unwrap();
        assert_eq!(
            source,
            SchemaSource::Local(PathBuf::from("/work/./crds/bucket.yaml"))
        );
        assert_eq!(source.file_name(), "bucket.yaml");
    }

    #[test]
    fn test_absolute_path_is_kept() {
        let source = SchemaSource::resolve("/abs/crd.yaml", Path::new("/work")).unwrap();
        assert_eq!(source, SchemaSource::Local(PathBuf::from("/abs/crd.yaml")));
    }

    #[test]
    fn test_file_url_is_local() {
        let source = SchemaSource::resolve("file:///abs/crd.json", Path::new("/work")).unwrap();
        assert_eq!(source, SchemaSource::Local(PathBuf::from("/abs/crd.json")));
    }

    #[test]
    fn test_http_urls_are_remote() {
        let source = SchemaSource::resolve(
            "https://raw.githubusercontent.com/org/repo/main/package/crds/s3.yaml",
            Path::new("/work"),
        )
        .unwrap();
        assert!(matches!(source, SchemaSource::Remote(_)));
        assert_eq!(source.file_name(), "s3.yaml");

        let bare = SchemaSource::resolve("http://example.com/", Path::new("/work")).unwrap();
        assert_eq!(bare.file_name(), "crd.yaml");
    }

    #[test]
    fn test_unsupported_scheme() {
        let err = SchemaSource::resolve("s3://bucket/crd.yaml", Path::new("/work")).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnsupportedScheme {
                reference: "s3://bucket/crd.yaml".to_string(),
                scheme: "s3".to_string(),
            }
        );
    }

    #[test]
    fn test_forced_getter_references_are_rejected() {
        for (reference, scheme) in [
            ("git::https://github.com/org/repo//crds/bucket.yaml", "git"),
            ("s3::https://s3.amazonaws.com/bucket/crd.yaml", "s3"),
            ("gcs::https://www.googleapis.com/storage/v1/bucket/crd.yaml", "gcs"),
        ] {
            assert_eq!(
                SchemaSource::resolve(reference, Path::new("/work")).unwrap_err(),
                SchemaError::UnsupportedScheme {
                    reference: reference.to_string(),
                    scheme: scheme.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_blank_reference() {
        assert_eq!(
            SchemaSource::resolve("   ", Path::new("/work")).unwrap_err(),
            SchemaError::EmptyReference
        );
    }
}
