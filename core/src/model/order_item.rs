// kart/src/model/order_item.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{OrderId, ProductId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct OrderItemId(Uuid);

impl OrderItemId {
  pub fn generate() -> Self {
    OrderItemId(Uuid::new_v4())
  }

  pub const fn as_uuid(&self) -> Uuid {
    self.0
  }
}

/// Line-item quantity. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Quantity must be at least 1 (got {0})")]
pub struct InvalidQuantity(pub i32);

impl Quantity {
  pub fn new(value: i32) -> Result<Self, InvalidQuantity> {
    if value < 1 {
      return Err(InvalidQuantity(value));
    }
    Ok(Quantity(value))
  }

  pub const fn get(self) -> i32 {
    self.0
  }
}

impl TryFrom<i32> for Quantity {
  type Error = InvalidQuantity;

  fn try_from(value: i32) -> Result<Self, Self::Error> {
    Quantity::new(value)
  }
}

impl From<Quantity> for i32 {
  fn from(q: Quantity) -> Self {
    q.0
  }
}

impl fmt::Display for Quantity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Item row as handed to the order store; the store assigns `order_id` and any missing `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
  pub id: Option<OrderItemId>,
  pub product_id: ProductId,
  pub quantity: Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
  pub id: OrderItemId,
  pub order_id: OrderId,
  pub product_id: ProductId,
  pub quantity: Quantity,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quantity_rejects_non_positive_values() {
    assert_eq!(Quantity::new(0), Err(InvalidQuantity(0)));
    assert_eq!(Quantity::new(-3), Err(InvalidQuantity(-3)));
    assert_eq!(Quantity::new(1).map(Quantity::get), Ok(1));
  }
}
