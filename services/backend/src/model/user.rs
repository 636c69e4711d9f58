//! User, group, and permission model definitions for the admin surface.
//!
//! # Purpose
//! Users are soft-deletable like the hotel resources but own nothing, so they
//! never cascade. Groups and permissions are plain records with hard delete
//! only. Authentication and token issuance live outside this service.
use crate::model::record::Deletable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub lastname: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
    pub group_ids: Vec<i64>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct NewUser {
    pub username: String,
    pub lastname: String,
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub group_ids: Vec<i64>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub permission_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub permission_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct NewPermission {
    pub name: String,
    pub code: String,
}

impl Deletable for User {
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
