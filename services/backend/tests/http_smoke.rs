mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use backend::app::{AppState, build_router};
use backend::store::memory::InMemoryStore;
use common::read_json;
use http_helpers::json_request;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> axum::routing::RouterIntoService<Body, ()> {
    let store = InMemoryStore::new();
    let state = AppState {
        api_version: "v1".to_string(),
        store: Arc::new(store),
    };
    build_router(state).into_service()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("get")
}

#[tokio::test]
async fn system_info_reports_memory_backend() {
    let app = app();
    let response = app.clone().oneshot(get("/v1/system/info")).await.expect("info");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["service"], "lodge-backend");
    assert_eq!(body["api_version"], "v1");
    assert_eq!(body["storage_backend"], "memory");
    assert_eq!(body["durable"], false);
}

#[tokio::test]
async fn system_health_is_ok() {
    let app = app();
    let response = app
        .clone()
        .oneshot(get("/v1/system/health"))
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app();
    let response = app
        .clone()
        .oneshot(get("/v1/openapi.json"))
        .await
        .expect("openapi");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["info"]["title"], "lodge-backend");
    assert!(body["paths"]["/v1/hotels"].is_object());
    assert!(body["paths"]["/v1/bookings/{id}/balance"].is_object());
}

#[tokio::test]
async fn hotel_crud_smoke() {
    let app = app();

    let create = json_request(
        "POST",
        "/v1/hotels",
        serde_json::json!({
            "name": "Grand Lakeside",
            "address": "1 Shore Road",
            "village": "Ambewela",
            "district": "Nuwara Eliya",
            "province": "Central",
            "phone": "+94-81-555-0101",
            "email": "front@grandlakeside.example",
            "stars": 4,
            "check_in_time": "14:00:00",
            "check_out_time": "11:00:00"
        }),
    );
    let response = app.clone().oneshot(create).await.expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let hotel = read_json(response).await;
    let id = hotel["id"].as_i64().expect("id");
    assert_eq!(hotel["stars"], 4);
    assert_eq!(hotel["is_deleted"], false);

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/hotels/{id}")))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);

    let update = json_request(
        "PUT",
        &format!("/v1/hotels/{id}"),
        serde_json::json!({
            "name": "Grand Lakeside",
            "address": "1 Shore Road",
            "village": "Ambewela",
            "district": "Nuwara Eliya",
            "province": "Central",
            "phone": "+94-81-555-0101",
            "email": "front@grandlakeside.example",
            "stars": 5,
            "check_in_time": "14:00:00",
            "check_out_time": "11:00:00"
        }),
    );
    let response = app.clone().oneshot(update).await.expect("update");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await;
    assert_eq!(updated["stars"], 5);

    let response = app.clone().oneshot(get("/v1/hotels")).await.expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let list = read_json(response).await;
    assert_eq!(list["items"].as_array().expect("items").len(), 1);

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/hotels/{id}"))
        .body(Body::empty())
        .expect("delete");
    let response = app.clone().oneshot(delete).await.expect("delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone from the live view, visible in the deleted view.
    let response = app.clone().oneshot(get("/v1/hotels")).await.expect("list");
    let list = read_json(response).await;
    assert!(list["items"].as_array().expect("items").is_empty());

    let response = app
        .clone()
        .oneshot(get("/v1/hotels?view=deleted"))
        .await
        .expect("deleted list");
    let list = read_json(response).await;
    assert_eq!(list["items"][0]["is_deleted"], true);
}

#[tokio::test]
async fn unknown_view_is_rejected() {
    let app = app();
    let response = app
        .clone()
        .oneshot(get("/v1/hotels?view=archived"))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn missing_hotel_returns_not_found() {
    let app = app();
    let response = app
        .clone()
        .oneshot(get("/v1/hotels/999"))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["code"], "not_found");
}
