//! Error types for the gateway.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Gateway error types.
///
/// Rate-limit rejections are not represented here: the request gate
/// short-circuits with its own payload before any handler runs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("connection pool error: {0}")]
    Pool(String),

    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),
}

impl Error {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Pool(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Database(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Full detail stays server-side; clients get a generic body.
        tracing::error!(error = %self, "request failed");

        let body = Json(json!({
            "success": false,
            "error": "data store error",
        }));

        (self.status(), body).into_response()
    }
}
