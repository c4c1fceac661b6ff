//! Batch passes over the collection: artwork caching and tracklist
//! backfill. Both mutate the albums in place and leave saving to the
//! caller.

use crate::colors::ColorScheme;
use indicatif::ProgressBar;
use recordshelf_core::{
    Album, CatalogClient, ImageResolver, RefreshStatus, ReleaseId, RetryPolicy, fetch_tracklist,
    refresh_album_images,
};
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub processed: usize,
    pub downloaded: usize,
    pub changed: usize,
    pub skipped: usize,
    pub errors: usize,
}

#[derive(Debug, Clone)]
pub struct ImageRun {
    pub force: bool,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct TracklistRun {
    pub delay: Duration,
    pub retry: RetryPolicy,
}

/// Indices of the albums to process. With `ids`, only albums whose release
/// id is listed qualify; ids that are not numbers are ignored. A limit of
/// zero means no limit.
pub fn select_targets(albums: &[Album], ids: &[String], limit: Option<usize>) -> Vec<usize> {
    let wanted: HashSet<ReleaseId> = ids
        .iter()
        .filter_map(|raw| {
            let parsed = raw.trim().parse::<u64>().ok().filter(|id| *id > 0);
            if parsed.is_none() {
                tracing::warn!("Ignoring non-numeric id {:?}", raw);
            }
            parsed.map(ReleaseId)
        })
        .collect();

    albums
        .iter()
        .enumerate()
        .filter(|(_, album)| {
            ids.is_empty() || album.release_id().is_some_and(|id| wanted.contains(&id))
        })
        .map(|(index, _)| index)
        .take(effective_limit(limit))
        .collect()
}

pub async fn import_images(
    albums: &mut [Album],
    targets: &[usize],
    resolver: &ImageResolver,
    run: &ImageRun,
    progress: &ProgressBar,
    colors: &ColorScheme,
) -> ImportSummary {
    let mut summary = ImportSummary::default();
    let total = targets.len();

    for (position, &index) in targets.iter().enumerate() {
        let Some(album) = albums.get_mut(index) else {
            continue;
        };
        summary.processed += 1;
        let name = album.display_name();

        match refresh_album_images(album, resolver, run.force).await {
            Ok(outcome) => {
                if outcome.changed {
                    summary.changed += 1;
                }
                match outcome.status {
                    RefreshStatus::Skipped => summary.skipped += 1,
                    RefreshStatus::Downloaded => summary.downloaded += 1,
                    RefreshStatus::AlreadyCached | RefreshStatus::UpdatedRefs => {}
                }
                progress.println(format!(
                    "[{}/{}] {}: {}",
                    position + 1,
                    total,
                    colors.album(&name),
                    colors.status(outcome.status)
                ));

                if outcome.status == RefreshStatus::Downloaded && !run.delay.is_zero() {
                    tokio::time::sleep(run.delay).await;
                }
            }
            Err(e) => {
                summary.errors += 1;
                tracing::warn!("Failed to refresh images for {}: {}", name, e);
                progress.println(format!(
                    "[{}/{}] {}: {}",
                    position + 1,
                    total,
                    colors.album(&name),
                    colors.error(&format!("error: {}", e))
                ));
            }
        }
        progress.inc(1);
    }

    summary
}

/// Albums that have a release id but no tracklist yet. A limit of zero
/// means no limit.
pub fn tracklist_targets(albums: &[Album], limit: Option<usize>) -> Vec<usize> {
    albums
        .iter()
        .enumerate()
        .filter(|(_, album)| album.release_id().is_some() && !album.has_tracklist())
        .map(|(index, _)| index)
        .take(effective_limit(limit))
        .collect()
}

pub async fn import_tracklists(
    albums: &mut [Album],
    targets: &[usize],
    client: &CatalogClient,
    run: &TracklistRun,
    progress: &ProgressBar,
    colors: &ColorScheme,
) -> ImportSummary {
    let mut summary = ImportSummary::default();
    let total = targets.len();

    for (position, &index) in targets.iter().enumerate() {
        let Some(album) = albums.get_mut(index) else {
            continue;
        };
        let Some(id) = album.release_id() else {
            continue;
        };
        summary.processed += 1;
        let name = album.display_name();

        let line = match fetch_tracklist(client, id, &run.retry).await {
            Ok(titles) if titles.is_empty() => {
                summary.skipped += 1;
                colors.skipped("no tracks listed")
            }
            Ok(titles) => {
                let count = titles.len();
                album.tracklist = Some(titles.into_iter().map(Value::String).collect());
                summary.changed += 1;
                colors.success(&format!("{} tracks", count))
            }
            Err(e) => {
                summary.errors += 1;
                tracing::warn!("Failed to fetch tracklist for release {}: {}", id, e);
                colors.error(&format!("error: {}", e))
            }
        };
        progress.println(format!(
            "[{}/{}] {}: {}",
            position + 1,
            total,
            colors.album(&name),
            line
        ));
        progress.inc(1);

        if position + 1 < total && !run.delay.is_zero() {
            tokio::time::sleep(run.delay).await;
        }
    }

    summary
}

fn effective_limit(limit: Option<usize>) -> usize {
    limit.filter(|limit| *limit > 0).unwrap_or(usize::MAX)
}
