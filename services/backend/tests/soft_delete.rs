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
    let state = AppState {
        api_version: "v1".to_string(),
        store: Arc::new(InMemoryStore::new()),
    };
    build_router(state).into_service()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("get")
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("delete")
}

fn restore(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("restore")
}

async fn created_id(
    app: &axum::routing::RouterIntoService<Body, ()>,
    uri: &str,
    body: serde_json::Value,
) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request("POST", uri, body))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED, "create {uri}");
    read_json(response).await["id"].as_i64().expect("id")
}

/// Hotel with one staff member, one room type, and one room. Returns
/// (hotel_id, staff_id, room_id).
async fn seed_hotel(app: &axum::routing::RouterIntoService<Body, ()>) -> (i64, i64, i64) {
    let hotel_id = created_id(
        app,
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
    )
    .await;
    let staff_id = created_id(
        app,
        "/v1/staff",
        serde_json::json!({
            "hotel_id": hotel_id,
            "first_name": "Ravi",
            "last_name": "Silva",
            "position": "Concierge",
            "salary": "1500.00",
            "date_of_birth": "1985-09-02",
            "phone": "+94-77-555-0111",
            "email": "ravi@grandlakeside.example",
            "hire_date": "2020-01-15"
        }),
    )
    .await;
    let room_type_id = created_id(
        app,
        "/v1/room-types",
        serde_json::json!({
            "name": "Deluxe Double",
            "description": "Lake view, queen bed",
            "price_per_night": "100.00",
            "capacity": 2
        }),
    )
    .await;
    let room_id = created_id(
        app,
        "/v1/rooms",
        serde_json::json!({
            "hotel_id": hotel_id,
            "room_type_id": room_type_id,
            "room_number": "101"
        }),
    )
    .await;
    (hotel_id, staff_id, room_id)
}

async fn status_of(app: &axum::routing::RouterIntoService<Body, ()>, uri: &str) -> StatusCode {
    app.clone().oneshot(get(uri)).await.expect("get").status()
}

async fn is_deleted(app: &axum::routing::RouterIntoService<Body, ()>, uri: &str) -> bool {
    let response = app.clone().oneshot(get(uri)).await.expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await["is_deleted"]
        .as_bool()
        .expect("is_deleted")
}

#[tokio::test]
async fn cascade_delete_and_restore_round_trip() {
    let app = app();
    let (hotel_id, staff_id, room_id) = seed_hotel(&app).await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/v1/hotels/{hotel_id}")))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Owned records went with the hotel; single-record lookups still resolve
    // soft-deleted rows.
    assert!(is_deleted(&app, &format!("/v1/hotels/{hotel_id}")).await);
    assert!(is_deleted(&app, &format!("/v1/staff/{staff_id}")).await);
    assert!(is_deleted(&app, &format!("/v1/rooms/{room_id}")).await);

    let response = app.clone().oneshot(get("/v1/staff")).await.expect("list");
    assert!(read_json(response).await["items"]
        .as_array()
        .expect("items")
        .is_empty());

    let response = app
        .clone()
        .oneshot(restore(&format!("/v1/hotels/{hotel_id}/restore")))
        .await
        .expect("restore");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(!is_deleted(&app, &format!("/v1/hotels/{hotel_id}")).await);
    assert!(!is_deleted(&app, &format!("/v1/staff/{staff_id}")).await);
    assert!(!is_deleted(&app, &format!("/v1/rooms/{room_id}")).await);
}

#[tokio::test]
async fn cascade_false_leaves_dependents_alone() {
    let app = app();
    let (hotel_id, staff_id, room_id) = seed_hotel(&app).await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/v1/hotels/{hotel_id}?cascade=false")))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(is_deleted(&app, &format!("/v1/hotels/{hotel_id}")).await);
    assert!(!is_deleted(&app, &format!("/v1/staff/{staff_id}")).await);
    assert!(!is_deleted(&app, &format!("/v1/rooms/{room_id}")).await);
}

#[tokio::test]
async fn delete_is_idempotent_and_restore_of_live_record_is_a_no_op() {
    let app = app();
    let (hotel_id, _, _) = seed_hotel(&app).await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(delete(&format!("/v1/hotels/{hotel_id}")))
            .await
            .expect("delete");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(restore(&format!("/v1/hotels/{hotel_id}/restore")))
            .await
            .expect("restore");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    assert!(!is_deleted(&app, &format!("/v1/hotels/{hotel_id}")).await);
}

#[tokio::test]
async fn hard_delete_removes_record_and_dependents() {
    let app = app();
    let (hotel_id, staff_id, room_id) = seed_hotel(&app).await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/v1/hotels/{hotel_id}/hard")))
        .await
        .expect("hard delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        status_of(&app, &format!("/v1/hotels/{hotel_id}")).await,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_of(&app, &format!("/v1/staff/{staff_id}")).await,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_of(&app, &format!("/v1/rooms/{room_id}")).await,
        StatusCode::NOT_FOUND
    );

    // Nothing left to restore.
    let response = app
        .clone()
        .oneshot(restore(&format!("/v1/hotels/{hotel_id}/restore")))
        .await
        .expect("restore");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn all_view_spans_both_partitions() {
    let app = app();
    let (hotel_id, _, _) = seed_hotel(&app).await;
    let second = created_id(
        &app,
        "/v1/hotels",
        serde_json::json!({
            "name": "Hilltop Rest",
            "address": "9 Summit Lane",
            "village": "Haputale",
            "district": "Badulla",
            "province": "Uva",
            "phone": "+94-57-555-0102",
            "email": "desk@hilltop.example",
            "stars": 3,
            "check_in_time": "13:00:00",
            "check_out_time": "10:00:00"
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/v1/hotels/{hotel_id}")))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let live = read_json(
        app.clone()
            .oneshot(get("/v1/hotels"))
            .await
            .expect("live"),
    )
    .await;
    let deleted = read_json(
        app.clone()
            .oneshot(get("/v1/hotels?view=deleted"))
            .await
            .expect("deleted"),
    )
    .await;
    let all = read_json(
        app.clone()
            .oneshot(get("/v1/hotels?view=all"))
            .await
            .expect("all"),
    )
    .await;

    assert_eq!(live["items"][0]["id"], second);
    assert_eq!(deleted["items"][0]["id"], hotel_id);
    assert_eq!(all["items"].as_array().expect("items").len(), 2);
}

#[tokio::test]
async fn invalid_cascade_value_is_rejected() {
    let app = app();
    let (hotel_id, _, _) = seed_hotel(&app).await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/v1/hotels/{hotel_id}?cascade=maybe")))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "validation_error");

    // The bad parameter left the record untouched.
    assert!(!is_deleted(&app, &format!("/v1/hotels/{hotel_id}")).await);
}
