//! HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and testable.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::observability;
use crate::store::HotelStore;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub store: Arc<dyn HotelStore + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route(
            "/v1/system/info",
            axum::routing::get(api::system::system_info),
        )
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route(
            "/v1/hotels",
            axum::routing::get(api::hotels::list_hotels).post(api::hotels::create_hotel),
        )
        .route(
            "/v1/hotels/:id",
            axum::routing::get(api::hotels::get_hotel)
                .put(api::hotels::update_hotel)
                .delete(api::hotels::delete_hotel),
        )
        .route(
            "/v1/hotels/:id/restore",
            axum::routing::post(api::hotels::restore_hotel),
        )
        .route(
            "/v1/hotels/:id/hard",
            axum::routing::delete(api::hotels::hard_delete_hotel),
        )
        .route(
            "/v1/hotels/:id/summary",
            axum::routing::get(api::hotels::hotel_summary),
        )
        .route(
            "/v1/staff",
            axum::routing::get(api::staff::list_staff).post(api::staff::create_staff),
        )
        .route(
            "/v1/staff/:id",
            axum::routing::get(api::staff::get_staff)
                .put(api::staff::update_staff)
                .delete(api::staff::delete_staff),
        )
        .route(
            "/v1/staff/:id/restore",
            axum::routing::post(api::staff::restore_staff),
        )
        .route(
            "/v1/staff/:id/hard",
            axum::routing::delete(api::staff::hard_delete_staff),
        )
        .route(
            "/v1/guests",
            axum::routing::get(api::guests::list_guests).post(api::guests::create_guest),
        )
        .route(
            "/v1/guests/:id",
            axum::routing::get(api::guests::get_guest)
                .put(api::guests::update_guest)
                .delete(api::guests::delete_guest),
        )
        .route(
            "/v1/guests/:id/restore",
            axum::routing::post(api::guests::restore_guest),
        )
        .route(
            "/v1/guests/:id/hard",
            axum::routing::delete(api::guests::hard_delete_guest),
        )
        .route(
            "/v1/guests/:id/bookings",
            axum::routing::get(api::guests::guest_bookings),
        )
        .route(
            "/v1/room-types",
            axum::routing::get(api::room_types::list_room_types)
                .post(api::room_types::create_room_type),
        )
        .route(
            "/v1/room-types/:id",
            axum::routing::get(api::room_types::get_room_type)
                .put(api::room_types::update_room_type)
                .delete(api::room_types::delete_room_type),
        )
        .route(
            "/v1/room-types/:id/restore",
            axum::routing::post(api::room_types::restore_room_type),
        )
        .route(
            "/v1/room-types/:id/hard",
            axum::routing::delete(api::room_types::hard_delete_room_type),
        )
        .route(
            "/v1/rooms",
            axum::routing::get(api::rooms::list_rooms).post(api::rooms::create_room),
        )
        .route(
            "/v1/rooms/:id",
            axum::routing::get(api::rooms::get_room)
                .put(api::rooms::update_room)
                .delete(api::rooms::delete_room),
        )
        .route(
            "/v1/rooms/:id/restore",
            axum::routing::post(api::rooms::restore_room),
        )
        .route(
            "/v1/rooms/:id/hard",
            axum::routing::delete(api::rooms::hard_delete_room),
        )
        .route(
            "/v1/bookings",
            axum::routing::get(api::bookings::list_bookings).post(api::bookings::create_booking),
        )
        .route(
            "/v1/bookings/release-expired",
            axum::routing::post(api::bookings::release_expired),
        )
        .route(
            "/v1/bookings/:id",
            axum::routing::get(api::bookings::get_booking)
                .put(api::bookings::update_booking)
                .delete(api::bookings::delete_booking),
        )
        .route(
            "/v1/bookings/:id/restore",
            axum::routing::post(api::bookings::restore_booking),
        )
        .route(
            "/v1/bookings/:id/hard",
            axum::routing::delete(api::bookings::hard_delete_booking),
        )
        .route(
            "/v1/bookings/:id/balance",
            axum::routing::get(api::bookings::booking_balance),
        )
        .route(
            "/v1/payments",
            axum::routing::get(api::payments::list_payments).post(api::payments::create_payment),
        )
        .route(
            "/v1/payments/:id",
            axum::routing::get(api::payments::get_payment).delete(api::payments::delete_payment),
        )
        .route(
            "/v1/payments/:id/restore",
            axum::routing::post(api::payments::restore_payment),
        )
        .route(
            "/v1/payments/:id/hard",
            axum::routing::delete(api::payments::hard_delete_payment),
        )
        .route(
            "/v1/users",
            axum::routing::get(api::users::list_users).post(api::users::create_user),
        )
        .route(
            "/v1/users/:id",
            axum::routing::get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .route(
            "/v1/users/:id/restore",
            axum::routing::post(api::users::restore_user),
        )
        .route(
            "/v1/users/:id/hard",
            axum::routing::delete(api::users::hard_delete_user),
        )
        .route(
            "/v1/groups",
            axum::routing::get(api::groups::list_groups).post(api::groups::create_group),
        )
        .route(
            "/v1/groups/:id",
            axum::routing::get(api::groups::get_group)
                .put(api::groups::update_group)
                .delete(api::groups::delete_group),
        )
        .route(
            "/v1/permissions",
            axum::routing::get(api::permissions::list_permissions)
                .post(api::permissions::create_permission),
        )
        .route(
            "/v1/permissions/:id",
            axum::routing::get(api::permissions::get_permission)
                .put(api::permissions::update_permission)
                .delete(api::permissions::delete_permission),
        )
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/v1/openapi.json", ApiDoc::openapi()),
        )
        .layer(trace_layer)
        .with_state(state)
}
