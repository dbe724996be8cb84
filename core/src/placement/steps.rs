// kart/src/placement/steps.rs

//! Step handlers of the order placement pipeline, in execution order.
//!
//! Only `persist_order` writes. Everything before it is a read and may fail without leaving
//! a trace.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::context::PlacementCtxData;
use crate::error::{PipelineError, PlacementError, PlacementResult};
use crate::model::{CouponCode, NewOrder, NewOrderItem, ProductId};
use crate::pipeline::{ContextData, Pipeline, StepDef};

pub const VALIDATE_COUPON: &str = "validate_coupon";
pub const RESOLVE_PRODUCTS: &str = "resolve_products";
pub const BUILD_ORDER_ITEMS: &str = "build_order_items";
pub const PERSIST_ORDER: &str = "persist_order";

pub fn build_pipeline() -> Result<Pipeline<PlacementCtxData, PlacementError>, PipelineError> {
  let mut p = Pipeline::<PlacementCtxData, PlacementError>::new(vec![
    StepDef::required(VALIDATE_COUPON).skip_if(|ctx: &ContextData<PlacementCtxData>| ctx.read().raw_coupon_code.is_none()),
    StepDef::required(RESOLVE_PRODUCTS),
    StepDef::required(BUILD_ORDER_ITEMS),
    StepDef::required(PERSIST_ORDER),
  ]);

  p.on_root(VALIDATE_COUPON, validate_coupon)?;
  p.on_root(RESOLVE_PRODUCTS, resolve_products)?;
  p.on_root(BUILD_ORDER_ITEMS, build_order_items)?;
  p.on_root(PERSIST_ORDER, persist_order)?;
  Ok(p)
}

/// Length check, lookup, then the two-category rule.
pub async fn validate_coupon(ctx_data: ContextData<PlacementCtxData>) -> PlacementResult<()> {
  let (raw_code, coupons) = {
    let guard = ctx_data.read();
    (guard.raw_coupon_code.clone(), guard.stores.coupons.clone())
  };
  let Some(raw_code) = raw_code else {
    return Ok(());
  };

  // Fails before any lookup.
  let code = CouponCode::parse(&raw_code)?;

  let coupon = match coupons.get(&code).await? {
    Some(coupon) => coupon,
    None => {
      warn!(coupon = %code, "Coupon not found.");
      return Err(PlacementError::CouponNotFound(code));
    }
  };
  coupon.ensure_eligible()?;

  debug!(coupon = %code, categories = coupon.presence_mask.categories(), "Coupon accepted.");
  ctx_data.write().coupon_code = Some(code);
  Ok(())
}

/// One batched lookup over the distinct product ids; every id must come back.
pub async fn resolve_products(ctx_data: ContextData<PlacementCtxData>) -> PlacementResult<()> {
  let (distinct_ids, catalog) = {
    let guard = ctx_data.read();
    let ids: HashSet<ProductId> = guard.items.iter().map(|item| item.product_id.clone()).collect();
    (ids, guard.stores.catalog.clone())
  };

  let products = catalog.get_many(&distinct_ids).await?;

  let mut missing: Vec<ProductId> = distinct_ids.into_iter().filter(|id| !products.contains_key(id)).collect();
  if !missing.is_empty() {
    missing.sort();
    warn!(missing = ?missing, "Order references unknown products.");
    return Err(PlacementError::ProductNotFound(missing));
  }

  debug!(distinct = products.len(), "Products resolved.");
  ctx_data.write().products = products;
  Ok(())
}

/// One item per input line, in input order. Repeated products stay repeated.
pub async fn build_order_items(ctx_data: ContextData<PlacementCtxData>) -> PlacementResult<()> {
  let mut guard = ctx_data.write();
  let order_items = guard
    .items
    .iter()
    .map(|input| {
      guard
        .products
        .get(&input.product_id)
        .map(|product| NewOrderItem {
          id: None,
          // The catalog's own id, in case its representation differs from the request's.
          product_id: product.id.clone(),
          quantity: input.quantity,
        })
        .ok_or_else(|| PlacementError::ProductNotFound(vec![input.product_id.clone()]))
    })
    .collect::<PlacementResult<Vec<_>>>()?;
  guard.order_items = order_items;
  Ok(())
}

/// Redemption, order row and item rows in one transaction.
pub async fn persist_order(ctx_data: ContextData<PlacementCtxData>) -> PlacementResult<()> {
  let (order, items, orders) = {
    let mut guard = ctx_data.write();
    let order = NewOrder {
      id: guard.requested_order_id,
      coupon_code: guard.coupon_code.clone(),
    };
    (order, std::mem::take(&mut guard.order_items), guard.stores.orders.clone())
  };

  let order_id = orders.create_with_items(order, items).await?;

  info!(%order_id, "Order placed.");
  ctx_data.write().order_id = Some(order_id);
  Ok(())
}
