//! Bin labels: where each record physically lives on the shelf.
//!
//! A small JSON object (`id -> label`) kept in memory and rewritten in full
//! on every change.

use recordshelf_core::{Error, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

pub type BinMap = BTreeMap<String, String>;

pub struct BinStore {
    path: PathBuf,
    bins: RwLock<BinMap>,
}

impl BinStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bins = if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| Error::io(&path, e))?
        {
            let contents = tokio::fs::read(&path)
                .await
                .map_err(|e| Error::io(&path, e))?;
            match serde_json::from_slice::<BinMap>(&contents) {
                Ok(bins) => bins,
                Err(e) => {
                    tracing::warn!("Failed to parse bin store {:?} (will start fresh): {}", path, e);
                    BinMap::new()
                }
            }
        } else {
            BinMap::new()
        };

        Ok(Self {
            path,
            bins: RwLock::new(bins),
        })
    }

    pub async fn all(&self) -> BinMap {
        self.bins.read().await.clone()
    }

    /// Sets the label for `id`; an empty label removes the entry.
    pub async fn set(&self, id: &str, bin: &str) -> Result<()> {
        let mut bins = self.bins.write().await;
        let mut updated = bins.clone();
        if bin.is_empty() {
            updated.remove(id);
        } else {
            updated.insert(id.to_string(), bin.to_string());
        }

        // Disk first, then memory, so a failed write changes nothing.
        self.write_to_disk(&updated).await?;
        *bins = updated;
        Ok(())
    }

    async fn write_to_disk(&self, bins: &BinMap) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(bins).map_err(|e| Error::json(&self.path, e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(parent, e))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, serialized)
            .await
            .map_err(|e| Error::io(&temp_path, e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::io(&self.path, e))?;
        Ok(())
    }
}
