//! Rewrites stored album image fields into public paths.
//!
//! Stored records carry several historical shapes: relative upstream paths,
//! `/images/...` cache paths, or legacy `thumb`/`back_thumb` aliases. Records
//! with a release id are pointed at the `/cover/:id` and `/back/:id`
//! endpoints, which populate the cache on first access.

use crate::error::Result;
use crate::models::{Album, FALLBACK_IMAGE, IMAGES_PREFIX, ImageKind};
use crate::store::ImageStore;

pub fn normalize_album(album: &mut Album) {
    match album.release_id() {
        Some(id) => {
            album.cover_image = Some(
                absolutize(album.cover_image.as_deref())
                    .unwrap_or_else(|| ImageKind::Cover.endpoint(id)),
            );
            album.back_image = Some(
                absolutize(album.back_image.as_deref())
                    .unwrap_or_else(|| ImageKind::Back.endpoint(id)),
            );
            album.thumb = Some(ImageKind::Cover.endpoint(id));
            album.back_thumb = Some(ImageKind::Back.endpoint(id));
        }
        None => {
            album.cover_image = absolutize(album.cover_image.as_deref());
            album.back_image = absolutize(album.back_image.as_deref());
            album.thumb = absolutize(album.thumb.as_deref());
            album.back_thumb = absolutize(album.back_thumb.as_deref());
        }
    }

    if album.cover_image.is_none() {
        album.cover_image = Some(FALLBACK_IMAGE.to_string());
    }
}

/// Leaves absolute URLs and rooted paths alone, roots everything else.
/// Blank values become `None`.
pub fn absolutize(path: Option<&str>) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with('/') {
        return Some(path.to_string());
    }
    Some(format!("/{}", path.trim_start_matches('/')))
}

/// Redirects `/images/<file>` references whose file is gone. With a release
/// id the self-healing endpoint takes over; without one a missing cover
/// becomes the fallback and a missing back is dropped.
pub async fn heal_missing_local(album: &mut Album, store: &ImageStore) -> Result<()> {
    let id = album.release_id();

    if is_missing_local(album.cover_image.as_deref(), store).await? {
        album.cover_image = Some(match id {
            Some(id) => ImageKind::Cover.endpoint(id),
            None => FALLBACK_IMAGE.to_string(),
        });
    }

    if is_missing_local(album.back_image.as_deref(), store).await? {
        album.back_image = id.map(|id| ImageKind::Back.endpoint(id));
    }

    Ok(())
}

async fn is_missing_local(path: Option<&str>, store: &ImageStore) -> Result<bool> {
    let Some(file_name) = path.and_then(|path| path.strip_prefix(IMAGES_PREFIX)) else {
        return Ok(false);
    };
    match store.exists(file_name).await {
        Ok(exists) => Ok(!exists),
        // Anything that is not a plain file name cannot be in the cache.
        Err(crate::error::Error::InvalidKey(_)) => Ok(true),
        Err(e) => Err(e),
    }
}
