// kart/app/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::dto::{OrderResponse, PlaceOrderPayload};
use crate::web::extractors::{ApiKey, IdempotencyKey};

#[instrument(
  name = "handler::place_order",
  skip(app_state, _api_key, idempotency_key, payload),
  fields(items = payload.items.len(), idempotent = idempotency_key.0.is_some())
)]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  _api_key: ApiKey,
  idempotency_key: IdempotencyKey,
  payload: web::Json<PlaceOrderPayload>,
) -> Result<HttpResponse, AppError> {
  let request = payload.into_inner().into_request(idempotency_key.0)?;

  let placed = app_state.placement.place_order(request).await?;
  info!(order_id = %placed.order_id, "Order accepted.");

  Ok(HttpResponse::Ok().json(OrderResponse::from(placed)))
}
