// kart/app/src/state.rs
use crate::config::AppConfig;
use crate::errors::Result;
use kart::placement::{OrderPlacement, PlacementStores};
use kart::store::postgres::{PgCouponStore, PgOrderStore, PgProductCatalog};
use kart::store::ProductCatalog;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub catalog: Arc<dyn ProductCatalog>,
  pub placement: OrderPlacement,
  pub config: Arc<AppConfig>,
}

impl AppState {
  pub fn new(stores: PlacementStores, config: Arc<AppConfig>) -> Result<Self> {
    Ok(Self {
      catalog: stores.catalog.clone(),
      placement: OrderPlacement::new(stores)?,
      config,
    })
  }

  /// Wires every store to the one shared pool.
  pub fn postgres(pool: PgPool, config: Arc<AppConfig>) -> Result<Self> {
    let stores = PlacementStores::new(
      Arc::new(PgProductCatalog::new(pool.clone())),
      Arc::new(PgCouponStore::new(pool.clone())),
      Arc::new(PgOrderStore::new(pool)),
    );
    Self::new(stores, config)
  }
}
