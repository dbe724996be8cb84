// kart/src/store/mod.rs

//! Storage capabilities the placement orchestrator depends on.
//!
//! Each store is an object-safe async trait so the orchestrator can hold `Arc<dyn …>` and be
//! wired either to Postgres ([`postgres`]) or to the in-memory fakes ([`memory`]).

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::error::PlacementResult;
use crate::model::{Coupon, CouponCode, NewOrder, NewOrderItem, OrderId, Product, ProductId};

pub mod memory;
pub mod postgres;

/// Read-only product lookups.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
  async fn list(&self) -> PlacementResult<Vec<Product>>;

  async fn get(&self, id: &ProductId) -> PlacementResult<Option<Product>>;

  /// Returns whichever of `ids` exist, keyed by the requested id even when the product's own
  /// id is written differently. Missing ids are simply absent from the map; callers compare the
  /// result against what they asked for.
  async fn get_many(&self, ids: &HashSet<ProductId>) -> PlacementResult<HashMap<ProductId, Product>>;
}

/// Read-only coupon lookups.
#[async_trait]
pub trait CouponStore: Send + Sync {
  async fn get(&self, code: &CouponCode) -> PlacementResult<Option<Coupon>>;
}

/// Transactional order writer.
#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Redeems `order.coupon_code` (when present), inserts the order and all of its items in one
  /// atomic unit, and returns the order id. Nothing is persisted unless everything is.
  ///
  /// Fails with `CouponAlreadyRedeemed` when the redemption record already exists.
  async fn create_with_items(&self, order: NewOrder, items: Vec<NewOrderItem>) -> PlacementResult<OrderId>;
}

/// Result of the storage-level insert-if-absent on a redemption record. Transport failures are
/// the third state and travel in the surrounding `Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionOutcome {
  Redeemed,
  AlreadyRedeemed,
}
