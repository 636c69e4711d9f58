//! Hotel-management HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules and the shared helpers for the soft-delete
//! surface every deletable resource carries: `?view=` parsing on list
//! endpoints and the delete/restore/hard-delete trio keyed by [`RecordKind`].
pub mod bookings;
pub mod error;
pub mod groups;
pub mod guests;
pub mod hotels;
pub mod openapi;
pub mod payments;
pub mod permissions;
pub mod room_types;
pub mod rooms;
pub mod staff;
pub mod system;
pub mod types;
pub mod users;

use crate::api::error::{ApiError, api_validation_error, store_error};
use crate::app::AppState;
use crate::model::{RecordKind, RecordView};
use axum::http::StatusCode;
use std::collections::HashMap;

/// Parse `?view=live|deleted|all` (default live).
pub(crate) fn view_from_params(params: &HashMap<String, String>) -> Result<RecordView, ApiError> {
    match params.get("view") {
        None => Ok(RecordView::Live),
        Some(raw) => RecordView::parse(raw).ok_or_else(|| {
            api_validation_error(&format!("unknown view {raw:?} (live|deleted|all)"))
        }),
    }
}

/// Parse `?cascade=true|false` (default true).
pub(crate) fn cascade_from_params(params: &HashMap<String, String>) -> Result<bool, ApiError> {
    match params.get("cascade").map(String::as_str) {
        None => Ok(true),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(raw) => Err(api_validation_error(&format!(
            "unknown cascade value {raw:?} (true|false)"
        ))),
    }
}

pub(crate) async fn soft_delete_record(
    state: &AppState,
    kind: RecordKind,
    id: i64,
    params: &HashMap<String, String>,
) -> Result<StatusCode, ApiError> {
    let cascade = cascade_from_params(params)?;
    state
        .store
        .soft_delete(kind, id, cascade)
        .await
        .map_err(|err| store_error("failed to delete record", err))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn restore_record(
    state: &AppState,
    kind: RecordKind,
    id: i64,
    params: &HashMap<String, String>,
) -> Result<StatusCode, ApiError> {
    let cascade = cascade_from_params(params)?;
    state
        .store
        .restore(kind, id, cascade)
        .await
        .map_err(|err| store_error("failed to restore record", err))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn hard_delete_record(
    state: &AppState,
    kind: RecordKind,
    id: i64,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .hard_delete(kind, id)
        .await
        .map_err(|err| store_error("failed to hard-delete record", err))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn view_defaults_to_live() {
        assert_eq!(view_from_params(&params(&[])).unwrap(), RecordView::Live);
        assert_eq!(
            view_from_params(&params(&[("view", "deleted")])).unwrap(),
            RecordView::Deleted
        );
        assert_eq!(
            view_from_params(&params(&[("view", "all")])).unwrap(),
            RecordView::All
        );
        assert!(view_from_params(&params(&[("view", "archived")])).is_err());
    }

    #[test]
    fn cascade_defaults_to_true() {
        assert!(cascade_from_params(&params(&[])).unwrap());
        assert!(cascade_from_params(&params(&[("cascade", "true")])).unwrap());
        assert!(!cascade_from_params(&params(&[("cascade", "false")])).unwrap());
        assert!(cascade_from_params(&params(&[("cascade", "yes")])).is_err());
    }
}
