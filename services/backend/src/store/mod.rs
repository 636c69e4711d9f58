//! Storage layer: the repository trait and its error type.
//!
//! # Purpose
//! [`HotelStore`] is the single repository interface for every resource. All
//! read operations over soft-deletable records take a [`RecordView`]; single
//! record lookups resolve from the live partition first and fall back to the
//! deleted partition so soft-deleted records stay addressable for restore and
//! hard delete. Each mutating operation is atomic: the in-memory store runs
//! under one write lock, the Postgres store inside one transaction, so a
//! cascade walk is observed either fully applied or not at all.
use crate::model::{
    Booking, BookingBalance, BookingUpdate, Group, Guest, Hotel, HotelSummary, NewBooking,
    NewGroup, NewGuest, NewHotel, NewPayment, NewPermission, NewRoom, NewRoomType, NewStaff,
    NewUser, Payment, Permission, RecordKind, RecordView, Room, RoomType, Staff, StayDatesError,
    User,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("room {0} is already occupied")]
    RoomOccupied(i64),
    #[error("booking {0} has no outstanding balance")]
    NoOutstandingBalance(i64),
    #[error("check-in date must be before check-out date")]
    DateOrder,
    #[error("provide either a check-out date or a number of days, not both")]
    AmbiguousDuration,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<StayDatesError> for StoreError {
    fn from(err: StayDatesError) -> Self {
        match err {
            StayDatesError::Ambiguous => StoreError::AmbiguousDuration,
            StayDatesError::Missing => StoreError::AmbiguousDuration,
            StayDatesError::DateOrder => StoreError::DateOrder,
            StayDatesError::NonPositiveNights => StoreError::Validation(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unexpected(err.into())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unexpected(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait HotelStore: Send + Sync {
    // Soft-delete surface, shared by every deletable resource. Deleting an
    // already-deleted record (or restoring a live one) is idempotent.
    async fn soft_delete(&self, kind: RecordKind, id: i64, cascade: bool) -> StoreResult<()>;
    async fn restore(&self, kind: RecordKind, id: i64, cascade: bool) -> StoreResult<()>;
    async fn hard_delete(&self, kind: RecordKind, id: i64) -> StoreResult<()>;

    async fn list_hotels(&self, view: RecordView) -> StoreResult<Vec<Hotel>>;
    async fn get_hotel(&self, id: i64) -> StoreResult<Hotel>;
    async fn create_hotel(&self, new: NewHotel) -> StoreResult<Hotel>;
    async fn update_hotel(&self, id: i64, new: NewHotel) -> StoreResult<Hotel>;
    async fn hotel_summary(&self, id: i64) -> StoreResult<HotelSummary>;

    async fn list_staff(&self, view: RecordView) -> StoreResult<Vec<Staff>>;
    async fn get_staff(&self, id: i64) -> StoreResult<Staff>;
    async fn create_staff(&self, new: NewStaff) -> StoreResult<Staff>;
    async fn update_staff(&self, id: i64, new: NewStaff) -> StoreResult<Staff>;

    async fn list_guests(&self, view: RecordView) -> StoreResult<Vec<Guest>>;
    async fn get_guest(&self, id: i64) -> StoreResult<Guest>;
    async fn create_guest(&self, new: NewGuest) -> StoreResult<Guest>;
    async fn update_guest(&self, id: i64, new: NewGuest) -> StoreResult<Guest>;
    /// Live bookings referencing the guest, most recent check-in first.
    async fn guest_bookings(&self, guest_id: i64) -> StoreResult<Vec<Booking>>;

    async fn list_room_types(&self, view: RecordView) -> StoreResult<Vec<RoomType>>;
    async fn get_room_type(&self, id: i64) -> StoreResult<RoomType>;
    async fn create_room_type(&self, new: NewRoomType) -> StoreResult<RoomType>;
    async fn update_room_type(&self, id: i64, new: NewRoomType) -> StoreResult<RoomType>;

    async fn list_rooms(&self, view: RecordView) -> StoreResult<Vec<Room>>;
    async fn get_room(&self, id: i64) -> StoreResult<Room>;
    async fn create_room(&self, new: NewRoom) -> StoreResult<Room>;
    async fn update_room(&self, id: i64, new: NewRoom) -> StoreResult<Room>;

    async fn list_bookings(&self, view: RecordView) -> StoreResult<Vec<Booking>>;
    async fn get_booking(&self, id: i64) -> StoreResult<Booking>;
    async fn create_booking(&self, new: NewBooking) -> StoreResult<Booking>;
    async fn update_booking(&self, id: i64, update: BookingUpdate) -> StoreResult<Booking>;
    async fn booking_balance(&self, id: i64) -> StoreResult<BookingBalance>;
    /// Flip rooms whose live booking checked out before `reference` back to
    /// available, without touching the bookings. Returns the released count.
    async fn release_expired_bookings(&self, reference: NaiveDate) -> StoreResult<u64>;

    async fn list_payments(
        &self,
        view: RecordView,
        booking_id: Option<i64>,
    ) -> StoreResult<Vec<Payment>>;
    async fn get_payment(&self, id: i64) -> StoreResult<Payment>;
    async fn create_payment(&self, new: NewPayment) -> StoreResult<Payment>;

    async fn list_users(&self, view: RecordView) -> StoreResult<Vec<User>>;
    async fn get_user(&self, id: i64) -> StoreResult<User>;
    async fn create_user(&self, new: NewUser) -> StoreResult<User>;
    async fn update_user(&self, id: i64, new: NewUser) -> StoreResult<User>;

    async fn list_groups(&self) -> StoreResult<Vec<Group>>;
    async fn get_group(&self, id: i64) -> StoreResult<Group>;
    async fn create_group(&self, new: NewGroup) -> StoreResult<Group>;
    async fn update_group(&self, id: i64, new: NewGroup) -> StoreResult<Group>;
    async fn delete_group(&self, id: i64) -> StoreResult<()>;

    async fn list_permissions(&self) -> StoreResult<Vec<Permission>>;
    async fn get_permission(&self, id: i64) -> StoreResult<Permission>;
    async fn create_permission(&self, new: NewPermission) -> StoreResult<Permission>;
    async fn update_permission(&self, id: i64, new: NewPermission) -> StoreResult<Permission>;
    async fn delete_permission(&self, id: i64) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
