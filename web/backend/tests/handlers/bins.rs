use crate::fixtures::TestShelf;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn set_and_list_bins() {
    let shelf = TestShelf::new().await;

    let response = shelf.post_json("/api/bin/1626692", &json!({"bin": "A3"})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"id": "1626692", "bin": "A3"}));

    shelf.post_json("/api/bin/77", &json!({"bin": " B1 "})).await;

    let listed = shelf.get("/api/bin").await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.json(), json!({"1626692": "A3", "77": "B1"}));

    let saved: serde_json::Value =
        serde_json::from_slice(&std::fs::read(shelf.dir.path().join("bins.json")).unwrap())
            .unwrap();
    assert_eq!(saved["77"], "B1");
}

#[tokio::test]
async fn empty_bin_clears_label() {
    let shelf = TestShelf::new().await;
    shelf.post_json("/api/bin/5", &json!({"bin": "C2"})).await;

    let response = shelf.post_json("/api/bin/5", &json!({"bin": ""})).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(shelf.get("/api/bin").await.json(), json!({}));
}

#[tokio::test]
async fn missing_bin_field_is_rejected() {
    let shelf = TestShelf::new().await;

    let response = shelf.post_json("/api/bin/5", &json!({"label": "C2"})).await;

    assert!(response.status.is_client_error());
}
