use crate::error::AppError;
use crate::models::{BinResponse, HealthResponse, SetBinRequest};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use recordshelf_core::models::IMAGES_PREFIX;
use recordshelf_core::{ReleaseId, heal_missing_local, normalize_album};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

const STATIC_PREFIX: &str = "/static/";

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Recordshelf API is running".to_string(),
    })
}

pub async fn get_collection(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let mut document = state
        .collection
        .load()
        .await
        .map_err(AppError::Collection)?;

    for album in document.albums.iter_mut() {
        normalize_album(album);
        heal_missing_local(album, state.resolver.store()).await?;
    }

    tracing::debug!("Serving {} albums", document.albums.len());
    Ok(Json(document.into_value()?))
}

pub async fn cover_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_release_id(&id)?;
    let resolved = state.resolver.ensure_images(id).await?;
    serve_public_path(&state, &resolved.cover).await
}

pub async fn back_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_release_id(&id)?;
    let resolved = state.resolver.ensure_images(id).await?;
    let path = resolved.back.as_deref().unwrap_or(&resolved.cover);
    serve_public_path(&state, path).await
}

pub async fn list_bins(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, String>> {
    Json(state.bins.all().await)
}

pub async fn set_bin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<SetBinRequest>,
) -> Result<Json<BinResponse>, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest("Missing record id".to_string()));
    }

    let bin = request.bin.trim();
    state.bins.set(id, bin).await?;
    tracing::info!("Bin for {} set to {:?}", id, bin);

    Ok(Json(BinResponse {
        id: id.to_string(),
        bin: bin.to_string(),
    }))
}

/// Ids that are not positive integers cannot name a release.
fn parse_release_id(raw: &str) -> Result<ReleaseId, AppError> {
    ReleaseId::from_json(&Value::String(raw.to_string())).ok_or(AppError::NotFound)
}

/// Reads a resolver path (`/images/...` or `/static/...`) from disk.
async fn serve_public_path(state: &AppState, public_path: &str) -> Result<Response, AppError> {
    let file_path = if let Some(file_name) = public_path.strip_prefix(IMAGES_PREFIX) {
        state.resolver.store().read_path(file_name)?
    } else if let Some(file_name) = public_path.strip_prefix(STATIC_PREFIX) {
        state.static_dir.join(file_name)
    } else {
        return Err(AppError::NotFound);
    };

    let bytes = match tokio::fs::read(&file_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("Image file missing: {:?}", file_path);
            return Err(AppError::NotFound);
        }
        Err(e) => return Err(recordshelf_core::Error::io(&file_path, e).into()),
    };

    Ok(([(header::CONTENT_TYPE, content_type_for(public_path))], bytes).into_response())
}

fn content_type_for(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}
