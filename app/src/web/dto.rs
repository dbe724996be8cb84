// kart/app/src/web/dto.rs

//! Wire shapes of the HTTP API. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use kart::model::{OrderId, Product, Quantity};
use kart::placement::{OrderItemInput, PlaceOrderRequest, PlacedOrder};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
  pub id: String,
  pub name: String,
  pub category: String,
  /// Major currency units; the catalog stores cents.
  pub price: f64,
}

impl From<&Product> for ProductDto {
  fn from(p: &Product) -> Self {
    Self {
      id: p.id.to_string(),
      name: p.name.clone(),
      category: p.category.clone(),
      price: p.price_cents as f64 / 100.0,
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlaceOrderPayload {
  pub coupon_code: Option<String>,
  pub items: Vec<OrderItemPayload>,
}

/// Kept loose (plain string and integer) so range problems surface as validation errors, not
/// as unparsable bodies.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderItemPayload {
  pub product_id: String,
  pub quantity: i64,
}

impl PlaceOrderPayload {
  pub fn into_request(self, order_id: Option<OrderId>) -> Result<PlaceOrderRequest, AppError> {
    if self.items.is_empty() {
      return Err(AppError::Validation("validation error: no items".to_string()));
    }
    let items = self
      .items
      .into_iter()
      .enumerate()
      .map(|(index, item)| {
        let quantity = i32::try_from(item.quantity).ok().and_then(|q| Quantity::new(q).ok());
        match quantity {
          Some(quantity) if !item.product_id.is_empty() => Ok(OrderItemInput::new(item.product_id, quantity)),
          _ => Err(AppError::Validation(format!("validation error: invalid item at index {}", index))),
        }
      })
      .collect::<Result<Vec<_>, _>>()?;

    Ok(PlaceOrderRequest {
      coupon_code: self.coupon_code,
      items,
      order_id,
    })
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
  pub product_id: String,
  pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
  pub id: OrderId,
  pub items: Vec<OrderItemDto>,
  pub products: Vec<ProductDto>,
}

impl From<PlacedOrder> for OrderResponse {
  fn from(placed: PlacedOrder) -> Self {
    Self {
      id: placed.order_id,
      items: placed
        .items
        .into_iter()
        .map(|item| OrderItemDto {
          product_id: item.product_id.into_inner(),
          quantity: item.quantity.get(),
        })
        .collect(),
      products: placed.products.iter().map(ProductDto::from).collect(),
    }
  }
}
