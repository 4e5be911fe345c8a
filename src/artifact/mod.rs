//! Artifact persistence: output directories, file naming and atomic writes.

/// Output layout, descriptors and atomic writes.
pub mod store;
