//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::classifier::InferenceError;
use crate::models::InputError;
use crate::report::{ReportError, TokenError};

pub type AppResult<T> = Result<T, AppError>;

/// Why a prediction could not be made; shown inline on the result page
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Could not read form: {0}")]
    Form(String),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl PredictionError {
    /// Short kind name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::Form(_) => "form",
            PredictionError::Input(InputError::MissingField(_)) => "missing_field",
            PredictionError::Input(InputError::InvalidNumber { .. }) => "invalid_number",
            PredictionError::Inference(_) => "inference",
            PredictionError::Token(_) => "token",
        }
    }

    /// Offending form field, for input errors
    pub fn field(&self) -> Option<&'static str> {
        match self {
            PredictionError::Input(e) => Some(e.field()),
            _ => None,
        }
    }
}

/// Errors that end a request with a plain-text body
#[derive(Debug, Error)]
pub enum AppError {
    // Input errors
    #[error(transparent)]
    Input(#[from] InputError),

    // Report token errors
    #[error("A signed report token is required")]
    TokenRequired,

    #[error(transparent)]
    Token(#[from] TokenError),

    // Rendering errors
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Failed to render page: {0}")]
    Template(String),
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::Template(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::TokenRequired => StatusCode::UNAUTHORIZED,
            AppError::Token(TokenError::Invalid) => StatusCode::UNAUTHORIZED,
            AppError::Token(TokenError::Mismatch) => StatusCode::FORBIDDEN,
            AppError::Token(TokenError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Report(_) | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}
