// kart/src/placement/context.rs

//! Underlying data for the order placement pipeline. Handlers receive it wrapped in
//! [`ContextData`](crate::pipeline::ContextData).

use std::collections::HashMap;
use std::sync::Arc;

use super::{OrderItemInput, PlaceOrderRequest};
use crate::model::{CouponCode, NewOrderItem, OrderId, Product, ProductId};
use crate::store::{CouponStore, OrderStore, ProductCatalog};

/// The three store capabilities a placement needs. Cheap to clone.
#[derive(Clone)]
pub struct PlacementStores {
  pub catalog: Arc<dyn ProductCatalog>,
  pub coupons: Arc<dyn CouponStore>,
  pub orders: Arc<dyn OrderStore>,
}

impl PlacementStores {
  pub fn new(
    catalog: Arc<dyn ProductCatalog>,
    coupons: Arc<dyn CouponStore>,
    orders: Arc<dyn OrderStore>,
  ) -> Self {
    Self {
      catalog,
      coupons,
      orders,
    }
  }
}

impl std::fmt::Debug for PlacementStores {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PlacementStores").finish_non_exhaustive()
  }
}

#[derive(Debug)]
pub struct PlacementCtxData {
  pub stores: PlacementStores,

  // --- Request ---
  pub raw_coupon_code: Option<String>,
  pub requested_order_id: Option<OrderId>,
  pub items: Vec<OrderItemInput>,

  // --- Populated by the steps ---
  pub coupon_code: Option<CouponCode>,
  pub products: HashMap<ProductId, Product>,
  pub order_items: Vec<NewOrderItem>,
  pub order_id: Option<OrderId>,
}

impl PlacementCtxData {
  pub fn new(stores: PlacementStores, request: PlaceOrderRequest) -> Self {
    Self {
      stores,
      // An empty code is the same as no code.
      raw_coupon_code: request.coupon_code.filter(|code| !code.is_empty()),
      requested_order_id: request.order_id,
      items: request.items,
      coupon_code: None,
      products: HashMap::new(),
      order_items: Vec::new(),
      order_id: None,
    }
  }
}
