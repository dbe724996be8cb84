// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every fixture.

use kart::model::{Coupon, CouponCode, PresenceMask, Product, ProductId, Quantity};
use kart::pipeline::{ContextData, Handler};
use kart::placement::{OrderItemInput, OrderPlacement, PlaceOrderRequest, PlacementStores};
use kart::store::memory::{InMemoryCatalog, InMemoryCoupons, InMemoryOrders};
use kart::PipelineError;
use std::sync::Arc;
use tracing::Level;

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

// --- Catalog and Coupon Fixtures ---

pub fn product(id: &str, category: &str, price_cents: i64) -> Product {
  Product {
    id: ProductId::from(id),
    name: format!("Product {}", id),
    category: category.to_string(),
    price_cents,
  }
}

pub fn default_products() -> Vec<Product> {
  vec![
    product("1", "Waffle", 650),
    product("2", "Waffle", 700),
    product("10", "Crème Brûlée", 1200),
    product("11", "Cheesecake", 900),
    product("A", "Cake", 450),
    product("B", "Cake", 500),
  ]
}

pub fn coupon(code: &str, mask: u8) -> Coupon {
  Coupon {
    code: CouponCode::new(code),
    presence_mask: PresenceMask::new(mask),
  }
}

/// SAVE20AA covers two categories, ONEONLY1 one, ALLCATS1 eight.
pub fn default_coupons() -> Vec<Coupon> {
  vec![
    coupon("SAVE20AA", 0b0000_0011),
    coupon("ONEONLY1", 0b0000_0100),
    coupon("ALLCATS1", 0b1111_1111),
  ]
}

pub fn qty(n: i32) -> Quantity {
  Quantity::new(n).expect("test quantity must be positive")
}

pub fn item(product_id: &str, quantity: i32) -> OrderItemInput {
  OrderItemInput::new(product_id, qty(quantity))
}

pub fn request(coupon_code: Option<&str>, items: Vec<OrderItemInput>) -> PlaceOrderRequest {
  PlaceOrderRequest {
    coupon_code: coupon_code.map(str::to_string),
    items,
    order_id: None,
  }
}

/// A placement service over in-memory stores, plus handles to inspect them.
pub struct Harness {
  pub catalog: Arc<InMemoryCatalog>,
  pub coupons: Arc<InMemoryCoupons>,
  pub orders: Arc<InMemoryOrders>,
  pub placement: OrderPlacement,
}

impl Harness {
  pub fn new() -> Self {
    Self::with(default_products(), default_coupons())
  }

  pub fn with(products: Vec<Product>, coupons: Vec<Coupon>) -> Self {
    let catalog = Arc::new(InMemoryCatalog::new(products));
    let coupons = Arc::new(InMemoryCoupons::new(coupons));
    let orders = Arc::new(InMemoryOrders::new());
    let placement = OrderPlacement::new(PlacementStores::new(catalog.clone(), coupons.clone(), orders.clone()))
      .expect("placement pipeline wiring");
    Self {
      catalog,
      coupons,
      orders,
      placement,
    }
  }
}

// --- Generic Pipeline Fixtures ---

#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Pipeline error: {0}")]
  Pipeline(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<PipelineError> for TestError {
  fn from(pe: PipelineError) -> Self {
    TestError::Pipeline(pe.to_string())
  }
}

pub fn create_simple_handler(step_name: &'static str, message_to_append: &'static str) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, counter = guard.counter, "executed");
      Ok(())
    })
  })
}

pub fn create_failing_handler(step_name: &'static str, error_message: &'static str) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      tracing::warn!(target: "test_handlers", step = step_name, "failing with: '{}'", error_message);
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}
