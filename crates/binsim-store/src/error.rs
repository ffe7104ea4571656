//! Error types for the `binsim-store` crate.

use std::path::PathBuf;

use binsim_types::Tier;

/// Errors that can occur at the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A persisted collection could not be decoded.
    #[error("failed to decode the {tier} collection: {source}")]
    Decode {
        /// The collection being read.
        tier: Tier,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A collection could not be encoded for persistence.
    #[error("failed to encode the {tier} collection: {source}")]
    Encode {
        /// The collection being written.
        tier: Tier,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}
