//! Booking model definitions and stay-duration resolution.
//!
//! # Purpose
//! A booking request may carry either an explicit check-out date or a night
//! count, never both. [`StayDates::resolve`] normalizes the two forms into a
//! validated `check_in < check_out` pair; `total_price` is always derived
//! from the resolved nights and the room type's nightly price, never
//! client-supplied.
use crate::model::record::Deletable;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Booking {
    pub id: i64,
    pub guest_id: i64,
    pub room_id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    /// Derived: nights between check-in and check-out. Populated by the
    /// store alongside `total_price`.
    pub number_of_days: i64,
    /// Derived: nights x room type price per night. Populated by the store.
    pub total_price: Decimal,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Payload for creating a booking. Exactly one of `check_out_date` and
/// `number_of_days` must be present.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct NewBooking {
    pub guest_id: i64,
    pub room_id: i64,
    pub check_in_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_days: Option<i64>,
}

/// Payload for updating a booking's stay window. Guest and room references
/// are immutable after creation.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct BookingUpdate {
    pub check_in_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_days: Option<i64>,
}

/// Ledger rollup for one booking over its live payments.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct BookingBalance {
    pub booking_id: i64,
    pub total_price: Decimal,
    pub total_paid: Decimal,
    pub outstanding: Decimal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StayDatesError {
    #[error("provide either a check-out date or a number of days, not both")]
    Ambiguous,
    #[error("either a check-out date or a number of days must be provided")]
    Missing,
    #[error("number of days must be greater than zero")]
    NonPositiveNights,
    #[error("check-in date must be before check-out date")]
    DateOrder,
}

/// A validated check-in/check-out pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayDates {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayDates {
    /// Resolve a raw date/duration pair into an ordered stay window.
    pub fn resolve(
        check_in: NaiveDate,
        check_out: Option<NaiveDate>,
        number_of_days: Option<i64>,
    ) -> Result<Self, StayDatesError> {
        let check_out = match (check_out, number_of_days) {
            (Some(_), Some(_)) => return Err(StayDatesError::Ambiguous),
            (None, None) => return Err(StayDatesError::Missing),
            (Some(date), None) => date,
            (None, Some(days)) => {
                if days <= 0 {
                    return Err(StayDatesError::NonPositiveNights);
                }
                check_in + Duration::days(days)
            }
        };
        if check_in >= check_out {
            return Err(StayDatesError::DateOrder);
        }
        Ok(StayDates {
            check_in,
            check_out,
        })
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Nights multiplied by the nightly rate.
    pub fn total_price(&self, price_per_night: Decimal) -> Decimal {
        price_per_night * Decimal::from(self.nights())
    }
}

impl NewBooking {
    pub fn stay(&self) -> Result<StayDates, StayDatesError> {
        StayDates::resolve(self.check_in_date, self.check_out_date, self.number_of_days)
    }
}

impl BookingUpdate {
    pub fn stay(&self) -> Result<StayDates, StayDatesError> {
        StayDates::resolve(self.check_in_date, self.check_out_date, self.number_of_days)
    }
}

impl Deletable for Booking {
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
