use std::fmt;

/// Schema retrieval error
///
/// Raised while resolving or retrieving a CRD reference. I/O and parse
/// failures are reported through `anyhow` context instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The descriptor has no `crd` reference at all
    EmptyReference,
    /// The reference is a URL with a scheme we cannot retrieve
    UnsupportedScheme {
        /// The reference as written in the descriptor
        reference: String,
        /// The offending scheme
        scheme: String,
    },
    /// The reference resolved, but the retrieved document has no content
    EmptyContent {
        /// The reference as written in the descriptor
        reference: String,
    },
    /// The remote server answered with a non-success status
    HttpStatus {
        /// The requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::EmptyReference => {
                write!(f, "No CRD reference configured (set `crd:` in the generator config)")
            }
            SchemaError::UnsupportedScheme { reference, scheme } => {
                write!(
                    f,
                    "Unsupported CRD location '{}': scheme '{}' is not one of file, http, https",
                    reference, scheme
                )
            }
            SchemaError::EmptyContent { reference } => {
                write!(f, "CRD {} appears to be empty", reference)
            }
            SchemaError::HttpStatus { url, status } => {
                write!(f, "Fetching CRD from {} failed with HTTP status {}", url, status)
            }
        }
    }
}

impl std::error::Error for SchemaError {}
