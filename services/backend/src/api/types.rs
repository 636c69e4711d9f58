//! Request and response types shared by the API handlers.
use crate::model::{
    Booking, Group, Guest, Hotel, Payment, Permission, Room, RoomType, Staff, User,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform JSON error body returned by every endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HotelListResponse {
    pub items: Vec<Hotel>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct StaffListResponse {
    pub items: Vec<Staff>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct GuestListResponse {
    pub items: Vec<Guest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RoomTypeListResponse {
    pub items: Vec<RoomType>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RoomListResponse {
    pub items: Vec<Room>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct BookingListResponse {
    pub items: Vec<Booking>,
}

/// A guest's live bookings, split on check-out date relative to today:
/// stays that have not ended yet vs. completed ones.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct GuestBookingsResponse {
    pub current: Vec<Booking>,
    pub historical: Vec<Booking>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct PaymentListResponse {
    pub items: Vec<Payment>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct UserListResponse {
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct GroupListResponse {
    pub items: Vec<Group>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct PermissionListResponse {
    pub items: Vec<Permission>,
}

/// Body for the expired-booking sweep. Without a reference date the server
/// uses today.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct ReleaseExpiredRequest {
    pub reference_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ReleaseExpiredResponse {
    pub released: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub service: String,
    pub api_version: String,
    pub storage_backend: String,
    pub durable: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}
