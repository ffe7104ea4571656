//! Collection persistence boundary for the binsim suburb dataset.
//!
//! The core treats persistence as an opaque keyed collection store: each
//! [`Tier`] maps to one collection of serde-encodable records. The only
//! shipped backend is [`JsonFileStore`] (one JSON array file per tier),
//! but generators and the engine depend solely on [`CollectionStore`].
//!
//! Note on consistency: the store persists whatever it is handed and does
//! not track cross-tier versions. Regenerating an upstream tier (say,
//! houses) without regenerating its dependents (streets) leaves the
//! dependents referencing stale ids. The engine sidesteps this by always
//! regenerating all tiers in one pass; callers writing tiers piecemeal own
//! the cascade.
//!
//! # Modules
//!
//! - [`error`] -- [`StoreError`] for I/O and codec failures
//! - [`json_store`] -- the JSON-file-backed [`JsonFileStore`]

pub mod error;
pub mod json_store;

use async_trait::async_trait;
use binsim_types::Tier;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::StoreError;
pub use json_store::JsonFileStore;

/// Read/write access to the per-tier record collections.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Read the full collection for a tier.
    ///
    /// A collection that was never written reads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read or the stored
    /// data does not decode as `T`.
    async fn read<T>(&self, tier: Tier) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send;

    /// Replace the full collection for a tier.
    ///
    /// Writes are all-or-nothing: a failed write leaves the previously
    /// persisted collection untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or the backend write fails.
    async fn write<T>(&self, tier: Tier, records: &[T]) -> Result<(), StoreError>
    where
        T: Serialize + Sync;
}
