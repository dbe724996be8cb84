// kart/src/store/memory.rs

//! In-memory store implementations for tests and local wiring.
//!
//! `InMemoryOrders` keeps every table behind one mutex, so a `create_with_items` call is a
//! single critical section: changes are staged first and applied together only once every
//! step succeeded, which gives the same all-or-nothing visibility as a database transaction.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use super::{CouponStore, OrderStore, ProductCatalog, RedemptionOutcome};
use crate::error::{PlacementError, PlacementResult};
use crate::model::{
  Coupon, CouponCode, NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderItemId, Product, ProductId,
};

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
  products: RwLock<BTreeMap<ProductId, Product>>,
  batch_lookups: AtomicUsize,
}

impl InMemoryCatalog {
  pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
    let catalog = Self::default();
    for product in products {
      catalog.insert(product);
    }
    catalog
  }

  pub fn insert(&self, product: Product) {
    self.products.write().insert(product.id.clone(), product);
  }

  /// Number of `get_many` calls served so far.
  pub fn batch_lookups(&self) -> usize {
    self.batch_lookups.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
  async fn list(&self) -> PlacementResult<Vec<Product>> {
    Ok(self.products.read().values().cloned().collect())
  }

  async fn get(&self, id: &ProductId) -> PlacementResult<Option<Product>> {
    Ok(self.products.read().get(id).cloned())
  }

  async fn get_many(&self, ids: &HashSet<ProductId>) -> PlacementResult<HashMap<ProductId, Product>> {
    self.batch_lookups.fetch_add(1, Ordering::SeqCst);
    let products = self.products.read();
    Ok(
      ids
        .iter()
        .filter_map(|id| products.get(id).map(|p| (p.id.clone(), p.clone())))
        .collect(),
    )
  }
}

#[derive(Debug, Default)]
pub struct InMemoryCoupons {
  coupons: RwLock<HashMap<CouponCode, Coupon>>,
  lookups: AtomicUsize,
}

impl InMemoryCoupons {
  pub fn new(coupons: impl IntoIterator<Item = Coupon>) -> Self {
    let store = Self::default();
    for coupon in coupons {
      store.insert(coupon);
    }
    store
  }

  pub fn insert(&self, coupon: Coupon) {
    self.coupons.write().insert(coupon.code.clone(), coupon);
  }

  /// Number of `get` calls served so far.
  pub fn lookups(&self) -> usize {
    self.lookups.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl CouponStore for InMemoryCoupons {
  async fn get(&self, code: &CouponCode) -> PlacementResult<Option<Coupon>> {
    self.lookups.fetch_add(1, Ordering::SeqCst);
    Ok(self.coupons.read().get(code).cloned())
  }
}

/// Stage of `create_with_items` at which an injected failure fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPoint {
  OrderInsert,
  ItemInsert,
}

#[derive(Debug, Default)]
struct OrderTables {
  redemptions: HashSet<CouponCode>,
  orders: HashMap<OrderId, Order>,
  items: Vec<OrderItem>,
}

impl OrderTables {
  fn try_redeem(&self, code: &CouponCode) -> RedemptionOutcome {
    if self.redemptions.contains(code) {
      RedemptionOutcome::AlreadyRedeemed
    } else {
      RedemptionOutcome::Redeemed
    }
  }
}

#[derive(Debug, Default)]
pub struct InMemoryOrders {
  tables: Mutex<OrderTables>,
  fault: Mutex<Option<FaultPoint>>,
  write_attempts: AtomicUsize,
}

impl InMemoryOrders {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes every subsequent `create_with_items` fail at `point` until cleared with `None`.
  pub fn inject_fault(&self, point: Option<FaultPoint>) {
    *self.fault.lock() = point;
  }

  /// Number of `create_with_items` calls received, successful or not.
  pub fn write_attempts(&self) -> usize {
    self.write_attempts.load(Ordering::SeqCst)
  }

  pub fn orders(&self) -> Vec<Order> {
    self.tables.lock().orders.values().cloned().collect()
  }

  pub fn order(&self, id: OrderId) -> Option<Order> {
    self.tables.lock().orders.get(&id).cloned()
  }

  pub fn items_for(&self, order_id: OrderId) -> Vec<OrderItem> {
    self
      .tables
      .lock()
      .items
      .iter()
      .filter(|item| item.order_id == order_id)
      .cloned()
      .collect()
  }

  pub fn is_redeemed(&self, code: &CouponCode) -> bool {
    self.tables.lock().redemptions.contains(code)
  }

  pub fn redemption_count(&self) -> usize {
    self.tables.lock().redemptions.len()
  }

  fn check_fault(&self, point: FaultPoint) -> PlacementResult<()> {
    if *self.fault.lock() == Some(point) {
      return Err(PlacementError::storage(anyhow::anyhow!("injected failure at {:?}", point)));
    }
    Ok(())
  }
}

#[async_trait]
impl OrderStore for InMemoryOrders {
  async fn create_with_items(&self, order: NewOrder, items: Vec<NewOrderItem>) -> PlacementResult<OrderId> {
    self.write_attempts.fetch_add(1, Ordering::SeqCst);
    if items.is_empty() {
      return Err(PlacementError::EmptyOrder);
    }
    let order_id = order.id.unwrap_or_else(OrderId::generate);

    let mut tables = self.tables.lock();

    if let Some(code) = &order.coupon_code {
      if tables.try_redeem(code) == RedemptionOutcome::AlreadyRedeemed {
        debug!(coupon = %code, "Redemption record exists; rolling back.");
        return Err(PlacementError::CouponAlreadyRedeemed(code.clone()));
      }
    }

    self.check_fault(FaultPoint::OrderInsert)?;
    if tables.orders.contains_key(&order_id) {
      return Err(PlacementError::DuplicateOrder(order_id));
    }
    let staged_order = Order {
      id: order_id,
      coupon_code: order.coupon_code.clone(),
      created_at: Utc::now(),
    };

    self.check_fault(FaultPoint::ItemInsert)?;
    let staged_items: Vec<OrderItem> = items
      .into_iter()
      .map(|item| OrderItem {
        id: item.id.unwrap_or_else(OrderItemId::generate),
        order_id,
        product_id: item.product_id,
        quantity: item.quantity,
      })
      .collect();

    // Commit.
    if let Some(code) = order.coupon_code {
      tables.redemptions.insert(code);
    }
    tables.orders.insert(order_id, staged_order);
    tables.items.extend(staged_items);
    debug!(%order_id, "Order committed to in-memory store.");
    Ok(order_id)
  }
}
