//! Room and room-type model definitions, including the occupancy state
//! machine.
//!
//! # Purpose
//! A room's status is not derived from bookings on read; it is flipped
//! explicitly by booking creation/deletion and by the expired-booking sweep,
//! and must stay consistent with those events.
use crate::model::record::Deletable;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Occupancy state. The only transitions are
/// `Available -> Occupied` (booking created) and
/// `Occupied -> Available` (booking deleted/cancelled, or sweep).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Available,
    Occupied,
}

impl RoomStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(RoomStatus::Available),
            "occupied" => Some(RoomStatus::Occupied),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RoomType {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price_per_night: Decimal,
    pub capacity: i32,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct NewRoomType {
    pub name: String,
    pub description: String,
    pub price_per_night: Decimal,
    pub capacity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Room {
    pub id: i64,
    pub hotel_id: i64,
    pub room_type_id: i64,
    pub room_number: String,
    pub status: RoomStatus,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Payload for creating or replacing a room. Status is never client-supplied;
/// rooms start `Available` and are flipped by booking lifecycle events only.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct NewRoom {
    pub hotel_id: i64,
    pub room_type_id: i64,
    pub room_number: String,
}

impl Deletable for RoomType {
    fn id(&self) -> i64 {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(at);
    }

    fn mark_restored(&mut self) {
        self.is_deleted = false;
        self.deleted_at = None;
    }
}

impl Deletable for Room {
    fn id(&self) -> i64 {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(at);
    }

    fn mark_restored(&mut self) {
        self.is_deleted = false;
        self.deleted_at = None;
    }
}
