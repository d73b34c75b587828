//! MySQL adapters for the attendance engine's storage contracts.

pub mod attendance;
pub mod employee;

use uuid::Uuid;

use crate::engine::store::StoreError;

fn storage_error(e: sqlx::Error) -> StoreError {
    tracing::error!(error = %e, "Database error");
    StoreError::Unavailable(e.to_string())
}

/// Ids are stored as `CHAR(36)`.
fn parse_uuid(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|e| {
        tracing::error!(error = %e, value = %raw, "Malformed id in database");
        StoreError::Unavailable(format!("malformed id {raw}: {e}"))
    })
}
