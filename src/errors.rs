use crate::storage::StorageKey;
use axum::http::StatusCode;
use thiserror::Error;

/// Failures of the local key-value store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("failed to read {key}: {source}")]
    Read {
        key: StorageKey,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value for {key} is not valid: {source}")]
    Decode {
        key: StorageKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {key}: {source}")]
    Encode {
        key: StorageKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {key}: {source}")]
    Write {
        key: StorageKey,
        #[source]
        source: std::io::Error,
    },

    #[error("storage quota exceeded writing {key} ({needed} bytes, limit {limit})")]
    QuotaExceeded {
        key: StorageKey,
        needed: usize,
        limit: usize,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
