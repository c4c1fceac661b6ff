#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use recordshelf_core::Config;
use recordshelf_core::config::{CatalogConfig, Paths};
use recordshelf_web::{AppState, router};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0cover";
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nback";
pub const FALLBACK_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fallback";

#[derive(Default)]
struct Catalog {
    releases: Mutex<HashMap<u64, Value>>,
    images: Mutex<HashMap<String, (String, Vec<u8>)>>,
    requests: AtomicUsize,
}

/// Catalog API stand-in serving canned releases and image bytes.
pub struct MockCatalog {
    base_url: String,
    catalog: Arc<Catalog>,
}

impl MockCatalog {
    pub async fn start() -> Self {
        let catalog = Arc::new(Catalog::default());
        let app = Router::new()
            .route("/releases/:id", get(release))
            .route("/img/:name", get(image))
            .with_state(catalog.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            catalog,
        }
    }

    pub fn add_image(&self, name: &str, content_type: &str, bytes: &[u8]) -> String {
        self.catalog
            .images
            .lock()
            .unwrap()
            .insert(name.to_string(), (content_type.to_string(), bytes.to_vec()));
        format!("{}/img/{}", self.base_url, name)
    }

    pub fn set_release(&self, id: u64, payload: Value) {
        self.catalog.releases.lock().unwrap().insert(id, payload);
    }

    /// Upstream calls of any kind seen so far.
    pub fn requests(&self) -> usize {
        self.catalog.requests.load(Ordering::SeqCst)
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
}

async fn release(State(catalog): State<Arc<Catalog>>, Path(id): Path<u64>) -> Response {
    catalog.requests.fetch_add(1, Ordering::SeqCst);
    let payload = catalog.releases.lock().unwrap().get(&id).cloned();
    match payload {
        Some(payload) => Json(payload).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn image(State(catalog): State<Arc<Catalog>>, Path(name): Path<String>) -> Response {
    catalog.requests.fetch_add(1, Ordering::SeqCst);
    let found = catalog.images.lock().unwrap().get(&name).cloned();
    match found {
        Some((content_type, bytes)) => {
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A working directory laid out the way the server expects.
pub struct TestShelf {
    pub dir: TempDir,
    pub catalog: MockCatalog,
    pub state: Arc<AppState>,
}

impl TestShelf {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let catalog = MockCatalog::start().await;

        let config = Config {
            catalog: catalog.catalog_config(),
            paths: Paths {
                collection: dir.path().join("collection.json"),
                images_dir: dir.path().join("images"),
                static_dir: dir.path().join("static"),
                bin_store: dir.path().join("bins.json"),
            },
            bind_addr: "127.0.0.1:0".to_string(),
        };
        std::fs::create_dir_all(&config.paths.images_dir).unwrap();
        std::fs::create_dir_all(&config.paths.static_dir).unwrap();

        let state = Arc::new(AppState::new(&config).await.unwrap());
        Self {
            dir,
            catalog,
            state,
        }
    }

    pub fn write_collection(&self, document: &Value) {
        std::fs::write(
            self.dir.path().join("collection.json"),
            serde_json::to_vec(document).unwrap(),
        )
        .unwrap();
    }

    pub fn write_image(&self, name: &str, bytes: &[u8]) {
        std::fs::write(self.dir.path().join("images").join(name), bytes).unwrap();
    }

    pub fn write_fallback(&self) {
        std::fs::write(
            self.dir.path().join("static").join("fallback.jpg"),
            FALLBACK_BYTES,
        )
        .unwrap();
    }

    pub fn image_exists(&self, name: &str) -> bool {
        self.dir.path().join("images").join(name).exists()
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = router(self.state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            content_type,
            body,
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}
