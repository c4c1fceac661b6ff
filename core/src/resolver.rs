//! Self-healing artwork resolution.
//!
//! `ensure_images` answers "where are the cover and back images of release
//! R" with public paths. The disk is probed first; on a miss the release
//! detail is fetched, the best URLs are picked and downloaded into the store.
//! Upstream failures never surface as errors: the caller gets whatever is
//! cached, falling back to [`FALLBACK_IMAGE`] for the cover.
//!
//! Concurrent misses for the same release share one pending resolution.

use crate::client::CatalogClient;
use crate::config::Config;
use crate::error::Result;
use crate::models::{FALLBACK_IMAGE, ImageKind, ReleaseId, ResolvedImages, public_image_path};
use crate::selector::select;
use crate::store::{ImageStore, SUPPORTED_EXTENSIONS};
use futures::future::{BoxFuture, FutureExt, Shared};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

type PendingResolution = Shared<BoxFuture<'static, Result<ResolvedImages>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Keep cached files, only fill the gaps.
    Ensure,
    /// Re-download everything upstream offers.
    Refresh,
}

/// Cached file names for one release.
#[derive(Debug, Clone, Default)]
struct CachedFiles {
    cover: Option<String>,
    back: Option<String>,
}

impl CachedFiles {
    fn slot_mut(&mut self, kind: ImageKind) -> &mut Option<String> {
        match kind {
            ImageKind::Cover => &mut self.cover,
            ImageKind::Back => &mut self.back,
        }
    }

    fn complete(&self) -> Option<ResolvedImages> {
        match (&self.cover, &self.back) {
            (Some(_), Some(_)) => Some(self.respond()),
            _ => None,
        }
    }

    fn respond(&self) -> ResolvedImages {
        ResolvedImages {
            cover: self
                .cover
                .as_deref()
                .map(public_image_path)
                .unwrap_or_else(|| FALLBACK_IMAGE.to_string()),
            back: self.back.as_deref().map(public_image_path),
        }
    }
}

#[derive(Clone)]
pub struct ImageResolver {
    store: ImageStore,
    client: CatalogClient,
    in_flight: Arc<Mutex<FxHashMap<ReleaseId, PendingResolution>>>,
}

impl ImageResolver {
    pub fn new(store: ImageStore, client: CatalogClient) -> Self {
        Self {
            store,
            client,
            in_flight: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = CatalogClient::new(&config.catalog)?;
        Ok(Self::new(ImageStore::new(&config.paths.images_dir), client))
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    /// Public paths for the release's cover and back, downloading whatever
    /// is missing. A fully cached release costs no upstream traffic.
    pub async fn ensure_images(&self, id: ReleaseId) -> Result<ResolvedImages> {
        if let Some(hit) = self.probe(id).await?.complete() {
            tracing::debug!("Cache hit for release {}", id);
            return Ok(hit);
        }
        self.coalesced(id, Mode::Ensure).await
    }

    /// Like [`ensure_images`](Self::ensure_images) but re-downloads files
    /// that are already cached. If a download fails the old file is kept.
    /// A refresh that arrives while a resolution for the same release is
    /// pending receives that pending result.
    pub async fn refresh_images(&self, id: ReleaseId) -> Result<ResolvedImages> {
        self.coalesced(id, Mode::Refresh).await
    }

    /// Public `/images/...` paths of the cached cover and back, without
    /// touching the network.
    pub async fn cached_paths(&self, id: ReleaseId) -> Result<(Option<String>, Option<String>)> {
        let cached = self.probe(id).await?;
        Ok((
            cached.cover.as_deref().map(public_image_path),
            cached.back.as_deref().map(public_image_path),
        ))
    }

    async fn probe(&self, id: ReleaseId) -> Result<CachedFiles> {
        Ok(CachedFiles {
            cover: self.store.find_variant(&ImageKind::Cover.stem(id)).await?,
            back: self.store.find_variant(&ImageKind::Back.stem(id)).await?,
        })
    }

    async fn coalesced(&self, id: ReleaseId, mode: Mode) -> Result<ResolvedImages> {
        let pending = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(&id) {
                Some(pending) => {
                    tracing::debug!("Joining pending resolution for release {}", id);
                    pending.clone()
                }
                None => {
                    let resolver = self.clone();
                    let pending = async move {
                        let result = resolver.resolve(id, mode).await;
                        resolver.in_flight.lock().await.remove(&id);
                        result
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(id, pending.clone());
                    pending
                }
            }
        };
        pending.await
    }

    async fn resolve(&self, id: ReleaseId, mode: Mode) -> Result<ResolvedImages> {
        let mut cached = self.probe(id).await?;
        if mode == Mode::Ensure {
            if let Some(hit) = cached.complete() {
                return Ok(hit);
            }
        }

        let detail = match self.client.fetch_release_detail(id).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!("No release detail for {}: {}", id, e);
                return Ok(cached.respond());
            }
        };

        let selection = select(&detail.image_candidates());
        let wanted = [
            (ImageKind::Cover, selection.front),
            (ImageKind::Back, selection.back),
        ];

        for (kind, url) in wanted {
            let slot = cached.slot_mut(kind);
            if mode == Mode::Ensure && slot.is_some() {
                continue;
            }
            let Some(url) = url else {
                continue;
            };
            if let Some(file_name) = self.materialize(id, kind, &url).await? {
                *slot = Some(file_name);
            }
        }

        Ok(cached.respond())
    }

    /// Downloads one image into the store. A failed download is logged and
    /// yields `None`; a failed write is an error.
    async fn materialize(&self, id: ReleaseId, kind: ImageKind, url: &str) -> Result<Option<String>> {
        let image = match self.client.download_image(url).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("Failed to download {:?} image for release {}: {}", kind, id, e);
                return Ok(None);
            }
        };

        let stem = kind.stem(id);
        let file_name = format!(
            "{}.{}",
            stem,
            extension_for(image.content_type.as_deref(), url)
        );
        self.store.write(&file_name, &image.bytes).await?;
        self.store.remove_other_variants(&stem, &file_name).await;

        tracing::info!(
            "Cached {} ({} bytes) for release {}",
            file_name,
            image.bytes.len(),
            id
        );
        Ok(Some(file_name))
    }
}

/// File extension for a downloaded image: from the content type, else from
/// the URL path, else `jpg`.
pub fn extension_for(content_type: Option<&str>, url: &str) -> &'static str {
    content_type
        .and_then(extension_from_mime)
        .or_else(|| extension_from_url(url))
        .unwrap_or("jpg")
}

fn extension_from_mime(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

fn extension_from_url(url: &str) -> Option<&'static str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = file.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .copied()
        .find(|supported| *supported == ext)
}
