// kart/src/model/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::CouponCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
  pub fn generate() -> Self {
    OrderId(Uuid::new_v4())
  }

  pub const fn from_uuid(id: Uuid) -> Self {
    OrderId(id)
  }

  pub const fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl fmt::Display for OrderId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Order row as handed to the order store. `id` is generated by the store when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewOrder {
  pub id: Option<OrderId>,
  pub coupon_code: Option<CouponCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
  pub id: OrderId,
  pub coupon_code: Option<CouponCode>,
  pub created_at: DateTime<Utc>,
}
