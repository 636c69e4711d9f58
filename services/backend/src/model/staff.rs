//! Staff model definitions.
use crate::model::record::Deletable;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Staff {
    pub id: i64,
    pub hotel_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub salary: Decimal,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub email: String,
    pub hire_date: NaiveDate,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct NewStaff {
    pub hotel_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub salary: Decimal,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub email: String,
    pub hire_date: NaiveDate,
}

impl Deletable for Staff {
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
