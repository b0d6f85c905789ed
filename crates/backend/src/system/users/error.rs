use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error("Permission denied")]
    Forbidden,
    #[error("User not found")]
    NotFound,
    #[error("Email already registered")]
    Conflict,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = std::result::Result<T, UserServiceError>;

impl UserServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        UserServiceError::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            UserServiceError::Forbidden => StatusCode::FORBIDDEN,
            UserServiceError::NotFound => StatusCode::NOT_FOUND,
            UserServiceError::Conflict => StatusCode::CONFLICT,
            UserServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            UserServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(UserServiceError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(UserServiceError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(UserServiceError::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            UserServiceError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            UserServiceError::from(anyhow::anyhow!("db down")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
