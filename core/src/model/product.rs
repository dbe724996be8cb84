// kart/src/model/product.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Opaque catalog identifier. The catalog owns its representation; the core only compares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ProductId(String);

impl ProductId {
  pub fn new(id: impl Into<String>) -> Self {
    ProductId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl From<&str> for ProductId {
  fn from(id: &str) -> Self {
    ProductId(id.to_string())
  }
}

impl From<String> for ProductId {
  fn from(id: String) -> Self {
    ProductId(id)
  }
}

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  pub category: String,
  pub price_cents: i64, // minor currency unit, echoed as stored
}
