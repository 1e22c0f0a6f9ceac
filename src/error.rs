//! Error types and handling for the commute service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the commute service
#[derive(Error, Debug)]
pub enum TravelError {
    /// Configuration-related errors, fatal at startup
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Distance-matrix communication errors
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl TravelError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TravelError {
    fn from(err: reqwest::Error) -> Self {
        TravelError::upstream(err.to_string())
    }
}

/// Errors a handler hands back to the HTTP caller.
///
/// Upstream detail never reaches the body; the handler logs it and picks
/// the route-specific message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    DestinationRequired,
    Upstream(&'static str),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::DestinationRequired => (StatusCode::BAD_REQUEST, "Destination required"),
            ApiError::Upstream(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
