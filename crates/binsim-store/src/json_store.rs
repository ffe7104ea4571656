//! JSON-file-backed implementation of [`CollectionStore`].
//!
//! One pretty-printed JSON array per tier (`driveways.json`, `houses.json`,
//! ...) under a single data directory. Writes go to a temp file first and
//! are renamed into place, so a failed write never leaves a partial
//! collection behind. Reading a collection that was never written yields
//! an empty vector.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use binsim_types::Tier;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::CollectionStore;

/// A directory of per-tier JSON array files.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The backing file for a tier.
    pub fn path_for(&self, tier: Tier) -> PathBuf {
        self.dir.join(format!("{}.json", tier.name()))
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl CollectionStore for JsonFileStore {
    async fn read<T>(&self, tier: Tier) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        let path = self.path_for(tier);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(tier = %tier, path = %path.display(), "collection not present, reading as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(Self::io_error(&path, e)),
        };

        let records: Vec<T> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode { tier, source })?;
        debug!(tier = %tier, count = records.len(), "read collection");
        Ok(records)
    }

    async fn write<T>(&self, tier: Tier, records: &[T]) -> Result<(), StoreError>
    where
        T: Serialize + Sync,
    {
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|source| StoreError::Encode { tier, source })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Self::io_error(&self.dir, e))?;

        // Temp-file-then-rename keeps a crashed write from leaving a
        // truncated collection on disk.
        let path = self.path_for(tier);
        let tmp = self.dir.join(format!("{}.json.tmp", tier.name()));
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| Self::io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Self::io_error(&path, e))?;

        info!(tier = %tier, count = records.len(), path = %path.display(), "wrote collection");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use binsim_types::{Driveway, DrivewayId, Location};
    use rand::Rng as _;

    use super::*;

    /// Unique scratch directory so parallel tests never collide.
    fn scratch_dir() -> PathBuf {
        let tag: u64 = rand::rng().random();
        std::env::temp_dir().join(format!("binsim-store-test-{}-{tag}", std::process::id()))
    }

    fn sample_driveways() -> Vec<Driveway> {
        vec![
            Driveway {
                id: DrivewayId::from("driveway_1_1000"),
                location: Location::new(-37.81, 144.96),
            },
            Driveway {
                id: DrivewayId::from("driveway_2_1000"),
                location: Location::new(-37.80, 144.95),
            },
        ]
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = scratch_dir();
        let store = JsonFileStore::new(&dir);
        let driveways = sample_driveways();

        store.write(Tier::Driveways, &driveways).await.unwrap();
        let back: Vec<Driveway> = store.read(Tier::Driveways).await.unwrap();
        assert_eq!(back, driveways);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn missing_collection_reads_as_empty() {
        let store = JsonFileStore::new(scratch_dir());
        let records: Vec<Driveway> = store.read(Tier::Houses).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn rewrite_replaces_the_collection() {
        let dir = scratch_dir();
        let store = JsonFileStore::new(&dir);
        let driveways = sample_driveways();

        store.write(Tier::Driveways, &driveways).await.unwrap();
        let shorter = &driveways[..1];
        store.write(Tier::Driveways, shorter).await.unwrap();

        let back: Vec<Driveway> = store.read(Tier::Driveways).await.unwrap();
        assert_eq!(back.len(), 1);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn corrupt_collection_surfaces_a_decode_error() {
        let dir = scratch_dir();
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("streets.json"), b"not json")
            .await
            .unwrap();

        let store = JsonFileStore::new(&dir);
        let result: Result<Vec<Driveway>, StoreError> = store.read(Tier::Streets).await;
        assert!(matches!(
            result.unwrap_err(),
            StoreError::Decode {
                tier: Tier::Streets,
                ..
            }
        ));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
