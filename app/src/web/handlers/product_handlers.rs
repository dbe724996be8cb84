// kart/app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::dto::ProductDto;
use kart::model::ProductId;

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.list().await?;
  info!(count = products.len(), "Products listed.");

  let body: Vec<ProductDto> = products.iter().map(ProductDto::from).collect();
  Ok(HttpResponse::Ok().json(body))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = ProductId::new(path.into_inner());

  match app_state.catalog.get(&product_id).await? {
    Some(product) => Ok(HttpResponse::Ok().json(ProductDto::from(&product))),
    None => {
      warn!("Product not found.");
      Err(AppError::NotFound(format!("Product {} not found", product_id)))
    }
  }
}
