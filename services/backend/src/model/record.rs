//! Soft-delete record contract and the ownership-edge graph.
//!
//! # Purpose
//! Every persisted resource that supports logical deletion carries the same
//! pair of fields (`is_deleted`, `deleted_at`) and is addressable through a
//! [`RecordKind`]. Cascade delete/restore walks the statically declared
//! ownership edges returned by [`RecordKind::owned_kinds`] instead of
//! reflecting over relations at runtime, so the traversal is a typed graph
//! walk with no unresolvable-edge failure mode.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which partition of a record set a read should see.
///
/// A single repository interface takes this view parameter; there are no
/// separate live/deleted accessors. `Live` is the default everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordView {
    #[default]
    Live,
    Deleted,
    All,
}

impl RecordView {
    /// Whether a record with the given deletion flag belongs to this view.
    pub fn matches(self, is_deleted: bool) -> bool {
        match self {
            RecordView::Live => !is_deleted,
            RecordView::Deleted => is_deleted,
            RecordView::All => true,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "live" => Some(RecordView::Live),
            "deleted" => Some(RecordView::Deleted),
            "all" => Some(RecordView::All),
            _ => None,
        }
    }
}

/// Every soft-deletable resource type the store manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Hotel,
    Staff,
    Guest,
    RoomType,
    Room,
    Booking,
    Payment,
    User,
}

impl RecordKind {
    /// Static ownership-edge table. A soft delete or restore of a record of
    /// this kind cascades to its records of the listed kinds. Edges are
    /// acyclic by construction.
    pub fn owned_kinds(self) -> &'static [RecordKind] {
        match self {
            RecordKind::Hotel => &[RecordKind::Staff, RecordKind::Room],
            RecordKind::RoomType => &[RecordKind::Room],
            RecordKind::Guest => &[RecordKind::Booking],
            RecordKind::Room => &[RecordKind::Booking],
            RecordKind::Booking => &[RecordKind::Payment],
            RecordKind::Staff | RecordKind::Payment | RecordKind::User => &[],
        }
    }

    /// Stable lowercase name, used in error messages and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Hotel => "hotel",
            RecordKind::Staff => "staff",
            RecordKind::Guest => "guest",
            RecordKind::RoomType => "room_type",
            RecordKind::Room => "room",
            RecordKind::Booking => "booking",
            RecordKind::Payment => "payment",
            RecordKind::User => "user",
        }
    }
}

/// Accessors shared by every soft-deletable record.
///
/// Invariant: `is_deleted()` is true iff the deletion timestamp is set.
/// `mark_deleted`/`mark_restored` keep the two fields in lockstep.
pub trait Deletable {
    fn id(&self) -> i64;
    fn is_deleted(&self) -> bool;
    fn mark_deleted(&mut self, at: DateTime<Utc>);
    fn mark_restored(&mut self);
}
