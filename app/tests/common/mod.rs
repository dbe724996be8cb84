// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every fixture.

use kart::model::{Coupon, CouponCode, PresenceMask, Product, ProductId};
use kart::placement::PlacementStores;
use kart::store::memory::{InMemoryCatalog, InMemoryCoupons, InMemoryOrders};
use kart_app::{AppConfig, AppState};
use std::sync::Arc;
use tracing::Level;

pub const TEST_API_KEY: &str = "test-key";

// --- Tracing Setup ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn test_config() -> Arc<AppConfig> {
  let config = AppConfig::from_lookup(|name| match name {
    "API_KEY" => Some(TEST_API_KEY.to_string()),
    "APP_ENV" => Some("test".to_string()),
    _ => None,
  })
  .expect("test config");
  Arc::new(config)
}

fn product(id: &str, name: &str, category: &str, price_cents: i64) -> Product {
  Product {
    id: ProductId::from(id),
    name: name.to_string(),
    category: category.to_string(),
    price_cents,
  }
}

fn coupon(code: &str, mask: u8) -> Coupon {
  Coupon {
    code: CouponCode::new(code),
    presence_mask: PresenceMask::new(mask),
  }
}

/// App state over in-memory stores, plus the order store for inspection.
pub struct TestApp {
  pub state: AppState,
  pub orders: Arc<InMemoryOrders>,
}

pub fn test_app() -> TestApp {
  let catalog = Arc::new(InMemoryCatalog::new(vec![
    product("1", "Chicken Waffle", "Waffle", 650),
    product("2", "Belgian Waffle", "Waffle", 750),
    product("10", "Crème Brûlée", "Dessert", 1200),
  ]));
  let coupons = Arc::new(InMemoryCoupons::new(vec![
    coupon("SAVE20AA", 0b0000_0011),
    coupon("ONEONLY1", 0b0000_0001),
  ]));
  let orders = Arc::new(InMemoryOrders::new());

  let state = AppState::new(PlacementStores::new(catalog, coupons, orders.clone()), test_config()).expect("app state");
  TestApp { state, orders }
}
