//! Batch refresh of a single album record's image fields.

use crate::error::Result;
use crate::models::Album;
use crate::resolver::ImageResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStatus {
    /// Record has no release id.
    Skipped,
    /// Cover was already on disk; only the record was updated.
    AlreadyCached,
    /// At least one image was newly cached.
    Downloaded,
    /// Upstream was consulted but nothing new was cached.
    UpdatedRefs,
}

impl RefreshStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RefreshStatus::Skipped => "no id; skipped",
            RefreshStatus::AlreadyCached => "already cached",
            RefreshStatus::Downloaded => "downloaded",
            RefreshStatus::UpdatedRefs => "updated refs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub changed: bool,
    pub status: RefreshStatus,
}

/// Makes sure the album's images are cached and points its fields at them.
///
/// Without `force`, an album whose cover is already cached is not looked up
/// upstream at all. `Downloaded` means a cover or back that was not cached
/// before is now on disk; re-downloading cached files does not count. The legacy `thumb`/`back_thumb` fields mirror the
/// cover/back paths.
pub async fn refresh_album_images(
    album: &mut Album,
    resolver: &ImageResolver,
    force: bool,
) -> Result<RefreshOutcome> {
    let Some(id) = album.release_id() else {
        return Ok(RefreshOutcome {
            changed: false,
            status: RefreshStatus::Skipped,
        });
    };

    let (cover_cached, back_cached) = resolver.cached_paths(id).await?;

    if !force {
        if let Some(cover) = &cover_cached {
            let changed = point_album_at(album, cover, back_cached.as_deref());
            return Ok(RefreshOutcome {
                changed,
                status: RefreshStatus::AlreadyCached,
            });
        }
    }

    let resolved = if force {
        resolver.refresh_images(id).await?
    } else {
        resolver.ensure_images(id).await?
    };

    let changed = point_album_at(album, &resolved.cover, resolved.back.as_deref());
    let new_cover = cover_cached.is_none() && !resolved.is_fallback();
    let new_back = back_cached.is_none() && resolved.back.is_some();
    let status = if new_cover || new_back {
        RefreshStatus::Downloaded
    } else {
        RefreshStatus::UpdatedRefs
    };

    Ok(RefreshOutcome { changed, status })
}

fn point_album_at(album: &mut Album, cover: &str, back: Option<&str>) -> bool {
    let mut changed = false;
    changed |= set_field(&mut album.cover_image, cover);
    changed |= set_field(&mut album.thumb, cover);
    if let Some(back) = back {
        changed |= set_field(&mut album.back_image, back);
        changed |= set_field(&mut album.back_thumb, back);
    }
    changed
}

fn set_field(field: &mut Option<String>, value: &str) -> bool {
    if field.as_deref() == Some(value) {
        return false;
    }
    *field = Some(value.to_string());
    true
}
