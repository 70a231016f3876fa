use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures surfaced to API clients.
///
/// Every variant renders as `{"status":"error","message":...}` with the
/// status code from [`ApiError::status`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The body was not a JSON object carrying the four numeric fields.
    #[error("Missing fields")]
    MissingFields,

    /// The body exceeded the configured size cap.
    #[error("Request body too large")]
    BodyTooLarge,

    /// `weather_data` has no rows yet.
    #[error("No readings recorded")]
    NoReadings,

    /// Whatever the database driver reported, verbatim.
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields => StatusCode::BAD_REQUEST,
            Self::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NoReadings => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "status": "error", "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}
