#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use recordshelf_core::config::CatalogConfig;
use recordshelf_core::{CatalogClient, ImageResolver, ImageStore};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path as FsPath;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg";
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-png";

#[derive(Clone)]
pub enum ReleaseReply {
    Json(Value),
    Status(u16),
    RateLimited(Option<u64>),
    Raw(&'static str),
}

#[derive(Default)]
struct Shared {
    releases: Mutex<HashMap<u64, Vec<ReleaseReply>>>,
    images: Mutex<HashMap<String, (String, Vec<u8>)>>,
    image_hits: Mutex<HashMap<String, usize>>,
    release_requests: AtomicUsize,
    release_delay: Mutex<Duration>,
    last_headers: Mutex<Option<HeaderMap>>,
}

/// In-process stand-in for the catalog API.
#[derive(Clone)]
pub struct MockCatalog {
    base_url: String,
    shared: Arc<Shared>,
}

impl MockCatalog {
    pub async fn start() -> Self {
        let shared = Arc::new(Shared::default());
        let app = Router::new()
            .route("/releases/:id", get(release))
            .route("/img/:name", get(image))
            .with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            shared,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn image_url(&self, name: &str) -> String {
        format!("{}/img/{}", self.base_url, name)
    }

    pub fn add_image(&self, name: &str, content_type: &str, bytes: &[u8]) -> String {
        self.shared
            .images
            .lock()
            .unwrap()
            .insert(name.to_string(), (content_type.to_string(), bytes.to_vec()));
        self.image_url(name)
    }

    /// Replies are served in order; the last one repeats.
    pub fn set_release(&self, id: u64, replies: Vec<ReleaseReply>) {
        self.shared.releases.lock().unwrap().insert(id, replies);
    }

    pub fn set_release_json(&self, id: u64, payload: Value) {
        self.set_release(id, vec![ReleaseReply::Json(payload)]);
    }

    pub fn set_release_delay(&self, delay: Duration) {
        *self.shared.release_delay.lock().unwrap() = delay;
    }

    pub fn release_requests(&self) -> usize {
        self.shared.release_requests.load(Ordering::SeqCst)
    }

    pub fn image_hits(&self, name: &str) -> usize {
        self.shared
            .image_hits
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn last_header(&self, name: header::HeaderName) -> Option<String> {
        self.shared
            .last_headers
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|headers| headers.get(name))
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            api_base: self.base_url.clone(),
            token: Some("test-token".to_string()),
            user_agent: Some("recordshelf-tests/1.0".to_string()),
            timeout: Duration::from_secs(5),
            delay: Duration::ZERO,
        }
    }

    pub fn client(&self) -> CatalogClient {
        CatalogClient::new(&self.catalog_config()).unwrap()
    }

    pub fn resolver(&self, images_dir: &FsPath) -> ImageResolver {
        ImageResolver::new(ImageStore::new(images_dir), self.client())
    }
}

async fn release(
    State(shared): State<Arc<Shared>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    shared.release_requests.fetch_add(1, Ordering::SeqCst);
    *shared.last_headers.lock().unwrap() = Some(headers);

    let delay = *shared.release_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let reply = {
        let mut releases = shared.releases.lock().unwrap();
        let queue = releases.entry(id).or_default();
        if queue.is_empty() {
            ReleaseReply::Status(404)
        } else if queue.len() > 1 {
            queue.remove(0)
        } else {
            queue[0].clone()
        }
    };

    match reply {
        ReleaseReply::Json(payload) => Json(payload).into_response(),
        ReleaseReply::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
        ReleaseReply::RateLimited(Some(secs)) => (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, secs.to_string())],
        )
            .into_response(),
        ReleaseReply::RateLimited(None) => StatusCode::TOO_MANY_REQUESTS.into_response(),
        ReleaseReply::Raw(body) => {
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
    }
}

async fn image(State(shared): State<Arc<Shared>>, Path(name): Path<String>) -> Response {
    *shared
        .image_hits
        .lock()
        .unwrap()
        .entry(name.clone())
        .or_default() += 1;

    let found = shared.images.lock().unwrap().get(&name).cloned();
    match found {
        Some((content_type, bytes)) => {
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn files_in(dir: &FsPath) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
