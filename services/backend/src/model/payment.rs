//! Payment model definitions.
//!
//! # Purpose
//! Payments are immutable ledger entries: the amount is computed server-side
//! as the booking's outstanding balance at creation time and never updated.
use crate::model::record::Deletable;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cash" => Some(PaymentMethod::Cash),
            "credit_card" => Some(PaymentMethod::CreditCard),
            "debit_card" => Some(PaymentMethod::DebitCard),
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Payment {
    pub id: i64,
    pub booking_id: i64,
    /// Always the outstanding balance at creation time; strictly positive.
    pub amount: Decimal,
    /// Stamped from the server clock at creation.
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Payload for recording a payment. The amount is never client-supplied.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct NewPayment {
    pub booking_id: i64,
    pub method: PaymentMethod,
}

impl Deletable for Payment {
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
