// kart/app/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use kart::{ErrorKind, PlacementError};

#[derive(Debug, Error)]
pub enum AppError {
  /// Well-formed request that fails input rules.
  #[error("Validation Error: {0}")]
  Validation(String),

  /// Body or header that could not be parsed at all.
  #[error("Bad Request: {0}")]
  BadRequest(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Placement(#[from] PlacementError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<kart::PipelineError> for AppError {
  fn from(err: kart::PipelineError) -> Self {
    AppError::Placement(err.into())
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Placement(e) => match e.kind() {
        ErrorKind::Validation | ErrorKind::Ineligible => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Storage | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Io(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::info!(application_error = %self, status = status.as_u16(), "Request rejected");
    }

    // Backend details stay in the logs.
    let message = match self {
      AppError::Sqlx(_) => "Database operation failed".to_string(),
      AppError::Placement(e) if e.kind() == ErrorKind::Storage => "Storage failure, please retry".to_string(),
      AppError::Placement(e) if e.kind() == ErrorKind::Internal => "An internal error occurred".to_string(),
      AppError::Config(_) | AppError::Io(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
      AppError::Placement(e) => e.to_string(),
      AppError::Validation(m) | AppError::BadRequest(m) | AppError::Auth(m) | AppError::NotFound(m) => m.clone(),
    };
    HttpResponse::build(status).json(json!({ "error": message }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
