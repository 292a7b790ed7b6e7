//! Generator descriptors: one per discovered `generate.yaml`.

mod load;
mod types;

pub use load::*;
pub use types::*;
