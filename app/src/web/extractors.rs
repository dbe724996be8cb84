// kart/app/src/web/extractors.rs

//! Request extractors for the header-based parts of the API.

use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use kart::model::OrderId;

pub const API_KEY_HEADER: &str = "api_key";
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Proof that the request carried the configured `api_key` header.
#[derive(Debug)]
pub struct ApiKey;

impl FromRequest for ApiKey {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
      return ready(Err(AppError::Internal("application state not configured".to_string())));
    };
    let presented = req.headers().get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if presented == Some(state.config.api_key.as_str()) {
      return ready(Ok(ApiKey));
    }
    warn!(header_present = presented.is_some(), "Rejected request with missing or invalid api_key.");
    ready(Err(AppError::Auth("invalid api_key".to_string())))
  }
}

/// Optional caller-chosen order id taken from the `Idempotency-Key` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdempotencyKey(pub Option<OrderId>);

impl FromRequest for IdempotencyKey {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let Some(raw) = req.headers().get(IDEMPOTENCY_KEY_HEADER) else {
      return ready(Ok(IdempotencyKey(None)));
    };
    let parsed = raw
      .to_str()
      .ok()
      .and_then(|s| Uuid::parse_str(s.trim()).ok())
      .map(OrderId::from_uuid);
    ready(match parsed {
      Some(order_id) => Ok(IdempotencyKey(Some(order_id))),
      None => Err(AppError::BadRequest(format!("{} must be a UUID", IDEMPOTENCY_KEY_HEADER))),
    })
  }
}
