//! # Schema Module
//!
//! Retrieves the CRD a generator points at and normalizes it to canonical
//! JSON text for the template engine.
//!
//! ```text
//! "crd: ./crds/bucket.yaml"  ──resolve──▶ SchemaSource::Local(/root/crds/bucket.yaml)
//! "crd: https://…/x.yaml"    ──resolve──▶ SchemaSource::Remote(url)
//!                                              │
//!                          SchemaTransport::retrieve → <tmp>/gencrd*/x.yaml
//!                                              │
//!                            normalize_schema → {"apiVersion":"apiextensions…"}
//! ```
//!
//! Callers never distinguish local from remote references; both go through
//! [`SchemaFetcher::fetch`]. The staging directory lives exactly as long as
//! one fetch call.

mod error;
mod fetch;
mod source;
mod transport;

pub use error::SchemaError;
pub use fetch::{normalize_schema, SchemaFetcher};
pub use source::SchemaSource;
pub use transport::{DefaultTransport, SchemaTransport};
