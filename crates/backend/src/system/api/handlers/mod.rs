use axum::http::StatusCode;
use sea_orm::DatabaseConnection;

use crate::shared::data::db;
use crate::system::users::error::UserServiceError;

// Authentication handlers
pub mod auth;

// User management handlers
pub mod users;

pub(crate) fn connection() -> Result<&'static DatabaseConnection, StatusCode> {
    db::get_connection().map_err(|e| {
        tracing::error!("{}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Log the failure and turn it into a status code
pub(crate) fn reject(action: &str, err: UserServiceError) -> StatusCode {
    match &err {
        UserServiceError::Internal(e) => tracing::error!("Failed to {}: {:#}", action, e),
        other => tracing::warn!("Rejected {}: {}", action, other),
    }
    err.status_code()
}
