//! Hotel model definitions.
//!
//! # Purpose
//! Defines hotel records and the aggregate summary returned by the summary
//! endpoint. Hotels own staff and rooms through the cascade edge table.
use crate::model::record::Deletable;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub village: String,
    pub district: String,
    pub province: String,
    pub phone: String,
    pub email: String,
    pub stars: i16,
    pub check_in_time: NaiveTime,
    pub check_out_time: NaiveTime,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Payload for creating or fully replacing a hotel.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct NewHotel {
    pub name: String,
    pub address: String,
    pub village: String,
    pub district: String,
    pub province: String,
    pub phone: String,
    pub email: String,
    pub stars: i16,
    pub check_in_time: NaiveTime,
    pub check_out_time: NaiveTime,
}

/// Occupancy/staffing rollup for one hotel, computed over live records.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HotelSummary {
    pub hotel_id: i64,
    pub available_rooms: u64,
    pub staff_count: u64,
}

impl Deletable for Hotel {
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
