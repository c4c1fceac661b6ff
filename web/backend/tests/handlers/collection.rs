use crate::fixtures::{JPEG_BYTES, TestShelf};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn normalizes_records_and_keeps_wrapper() {
    let shelf = TestShelf::new().await;
    shelf.write_collection(&json!({
        "username": "digger",
        "records": [
            {"id": 42, "title": "Blue", "thumb": "oldthumb.jpg", "rating": 5},
            {"title": "White Label", "cover_image": "static/custom.jpg"}
        ]
    }));

    let response = shelf.get("/api/collection").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["username"], "digger");

    let first = &body["records"][0];
    assert_eq!(first["cover_image"], "/cover/42");
    assert_eq!(first["thumb"], "/cover/42");
    assert_eq!(first["back_image"], "/back/42");
    assert_eq!(first["rating"], 5);

    let second = &body["records"][1];
    assert_eq!(second["cover_image"], "/static/custom.jpg");
    assert!(second.get("back_image").is_none());
}

#[tokio::test]
async fn bare_array_stays_an_array() {
    let shelf = TestShelf::new().await;
    shelf.write_collection(&json!([{"id": "7", "title": "Seven"}]));

    let body = shelf.get("/api/collection").await.json();

    assert!(body.is_array());
    assert_eq!(body[0]["cover_image"], "/cover/7");
}

#[tokio::test]
async fn missing_cached_files_are_healed() {
    let shelf = TestShelf::new().await;
    shelf.write_image("cover_5.jpg", JPEG_BYTES);
    shelf.write_collection(&json!([
        {"id": 5, "cover_image": "/images/cover_5.jpg"},
        {"id": 6, "cover_image": "/images/cover_6.jpg", "back_image": "/images/back_6.jpg"},
        {"cover_image": "/images/lost.jpg"}
    ]));

    let body = shelf.get("/api/collection").await.json();

    assert_eq!(body[0]["cover_image"], "/images/cover_5.jpg");
    assert_eq!(body[1]["cover_image"], "/cover/6");
    assert_eq!(body[1]["back_image"], "/back/6");
    assert_eq!(body[2]["cover_image"], "/static/fallback.jpg");
    assert_eq!(shelf.catalog.requests(), 0);
}

#[tokio::test]
async fn unreadable_collection_is_500() {
    let shelf = TestShelf::new().await;

    let missing = shelf.get("/api/collection").await;
    assert_eq!(missing.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(missing.json(), json!({"error": "Failed to read collection"}));

    std::fs::write(shelf.dir.path().join("collection.json"), "{broken").unwrap();
    let broken = shelf.get("/api/collection").await;
    assert_eq!(broken.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(broken.json()["error"], "Failed to read collection");
}
