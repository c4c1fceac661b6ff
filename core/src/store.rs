//! Disk store for cached artwork.
//!
//! Files live flat under one directory and are addressed by file name
//! (`cover_<id>.<ext>`). Writes go through a temp file in the same
//! directory followed by a rename, so readers only ever see complete files.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Extensions probed for an existing variant, in preference order.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read_path(&self, file_name: &str) -> Result<PathBuf> {
        validate_key(file_name)?;
        Ok(self.root.join(file_name))
    }

    pub async fn exists(&self, file_name: &str) -> Result<bool> {
        let path = self.read_path(file_name)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| Error::io(&path, e))
    }

    pub async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.read_path(file_name)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::io(&self.root, e))?;

        // Temp name is unique per writer so concurrent writes of the same key
        // never share a half-written file.
        let temp_path = self.root.join(format!(
            ".{}.{}-{}.tmp",
            file_name,
            std::process::id(),
            temp_counter()
        ));
        tokio::fs::write(&temp_path, bytes)
            .await
            .map_err(|e| Error::io(&temp_path, e))?;
        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Error::io(&path, e));
        }
        Ok(())
    }

    /// First existing `<stem>.<ext>` among [`SUPPORTED_EXTENSIONS`].
    pub async fn find_variant(&self, stem: &str) -> Result<Option<String>> {
        for ext in SUPPORTED_EXTENSIONS {
            let file_name = format!("{}.{}", stem, ext);
            if self.exists(&file_name).await? {
                return Ok(Some(file_name));
            }
        }
        Ok(None)
    }

    /// Deletes every variant of `stem` except `keep`. Failures are only logged.
    pub async fn remove_other_variants(&self, stem: &str, keep: &str) {
        for ext in SUPPORTED_EXTENSIONS {
            let file_name = format!("{}.{}", stem, ext);
            if file_name == keep {
                continue;
            }
            let path = self.root.join(&file_name);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!("Removed stale variant {}", file_name),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("Failed to remove stale variant {:?}: {}", path, e),
            }
        }
    }
}

fn validate_key(file_name: &str) -> Result<()> {
    let invalid = file_name.is_empty()
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains("..")
        || file_name.contains('\0');
    if invalid {
        return Err(Error::InvalidKey(file_name.to_string()));
    }
    Ok(())
}

fn temp_counter() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}
