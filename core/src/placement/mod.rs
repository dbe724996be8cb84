// kart/src/placement/mod.rs

//! Order placement: the only write path of the service.
//!
//! A placement runs as a four-step [`Pipeline`]: `validate_coupon` (skipped without a code),
//! `resolve_products`, `build_order_items` and `persist_order`. Every failure before
//! `persist_order` leaves the stores untouched, and `persist_order` itself is all-or-nothing.

pub mod context;
pub mod steps;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info_span, instrument, Instrument};

pub use context::{PlacementCtxData, PlacementStores};

use crate::error::{PipelineError, PlacementError, PlacementResult};
use crate::model::{OrderId, Product, ProductId, Quantity};
use crate::pipeline::{ContextData, Pipeline};

/// One requested line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
  pub product_id: ProductId,
  pub quantity: Quantity,
}

impl OrderItemInput {
  pub fn new(product_id: impl Into<ProductId>, quantity: Quantity) -> Self {
    Self {
      product_id: product_id.into(),
      quantity,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct PlaceOrderRequest {
  /// Absent or empty means the order carries no coupon.
  pub coupon_code: Option<String>,
  pub items: Vec<OrderItemInput>,
  /// Caller-chosen id. Retrying with the same id can never place the order twice.
  pub order_id: Option<OrderId>,
}

/// What a successful placement returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedOrder {
  pub order_id: OrderId,
  /// Echo of the request items, in request order.
  pub items: Vec<OrderItemInput>,
  /// One entry per distinct referenced product, ordered by id.
  pub products: Vec<Product>,
}

/// Places orders against a set of stores. Build once and share.
#[derive(Clone)]
pub struct OrderPlacement {
  pipeline: Arc<Pipeline<PlacementCtxData, PlacementError>>,
  stores: PlacementStores,
}

impl OrderPlacement {
  pub fn new(stores: PlacementStores) -> Result<Self, PipelineError> {
    Ok(Self {
      pipeline: Arc::new(steps::build_pipeline()?),
      stores,
    })
  }

  #[instrument(
    name = "OrderPlacement::place_order",
    skip(self, request),
    fields(items = request.items.len(), has_coupon = request.coupon_code.is_some()),
    err(Display)
  )]
  pub async fn place_order(&self, request: PlaceOrderRequest) -> PlacementResult<PlacedOrder> {
    if request.items.is_empty() {
      return Err(PlacementError::EmptyOrder);
    }

    let ctx_data = ContextData::new(PlacementCtxData::new(self.stores.clone(), request));
    self
      .pipeline
      .run(ctx_data.clone())
      .instrument(info_span!("placement_pipeline"))
      .await?;

    let mut guard = ctx_data.write();
    let order_id = guard.order_id.ok_or(PipelineError::ContextIncomplete {
      step_name: steps::PERSIST_ORDER.to_string(),
      field: "order_id",
    })?;
    let mut products: Vec<Product> = guard.products.drain().map(|(_, product)| product).collect();
    products.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(PlacedOrder {
      order_id,
      items: std::mem::take(&mut guard.items),
      products,
    })
  }
}

impl std::fmt::Debug for OrderPlacement {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OrderPlacement")
      .field("steps", &self.pipeline.step_names())
      .finish()
  }
}
