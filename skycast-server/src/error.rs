//! HTTP rendering of query failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use skycast_core::WeatherError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("City '{0}' not found")]
    LocationNotFound(String),

    #[error("Weather service is unavailable")]
    Unavailable(String),

    #[error("{0}")]
    BadRequest(String),
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::LocationNotFound(city) => ApiError::LocationNotFound(city),
            WeatherError::Unavailable(reason) => ApiError::Unavailable(reason),
        }
    }
}

/// Every failure body has the same single key.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::LocationNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(reason) => {
                tracing::error!("Upstream failure: {}", reason);
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
