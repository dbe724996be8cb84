// kart/src/store/postgres/catalog.rs

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

use crate::error::PlacementResult;
use crate::model::{Product, ProductId};
use crate::store::ProductCatalog;

#[derive(Debug, Clone)]
pub struct PgProductCatalog {
  pool: PgPool,
}

impl PgProductCatalog {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProductCatalog for PgProductCatalog {
  #[instrument(name = "catalog::list", skip(self), err)]
  async fn list(&self) -> PlacementResult<Vec<Product>> {
    let products: Vec<Product> = sqlx::query_as("SELECT id, name, category, price_cents FROM products ORDER BY id")
      .fetch_all(&self.pool)
      .await?;
    debug!(count = products.len(), "Listed products.");
    Ok(products)
  }

  #[instrument(name = "catalog::get", skip(self, id), fields(product_id = %id), err)]
  async fn get(&self, id: &ProductId) -> PlacementResult<Option<Product>> {
    let product = sqlx::query_as("SELECT id, name, category, price_cents FROM products WHERE id = $1")
      .bind(id.as_str())
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  #[instrument(name = "catalog::get_many", skip(self, ids), fields(requested = ids.len()), err)]
  async fn get_many(&self, ids: &HashSet<ProductId>) -> PlacementResult<HashMap<ProductId, Product>> {
    if ids.is_empty() {
      return Ok(HashMap::new());
    }
    let wanted: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();
    let rows: Vec<Product> =
      sqlx::query_as("SELECT id, name, category, price_cents FROM products WHERE id = ANY($1)")
        .bind(wanted)
        .fetch_all(&self.pool)
        .await?;
    debug!(found = rows.len(), "Resolved product batch.");
    Ok(rows.into_iter().map(|p| (p.id.clone(), p)).collect())
  }
}
