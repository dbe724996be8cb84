// src/lib.rs

//! Kart: order placement core for a small storefront.
//!
//! The crate owns one write path, placing an order, and everything it needs:
//!  - Coupon validation (length, existence, two-category eligibility).
//!  - Single-use redemption that holds under concurrent attempts.
//!  - Batched product resolution with an explicit report of unknown ids.
//!  - Atomic persistence of the redemption, the order row and its item rows.
//!
//! Storage sits behind the async traits in [`store`], with Postgres and in-memory
//! implementations.

pub mod db;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod placement;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::error::{ErrorKind, PipelineError, PlacementError, PlacementResult};

pub use crate::model::{Coupon, CouponCode, NewOrder, NewOrderItem, Order, OrderId, OrderItem, Product, ProductId, Quantity};

pub use crate::placement::{OrderItemInput, OrderPlacement, PlaceOrderRequest, PlacedOrder, PlacementStores};

pub use crate::store::{CouponStore, OrderStore, ProductCatalog, RedemptionOutcome};

/*
    Placement flow:
    1. Reject an empty item list.
    2. `validate_coupon`: skipped without a code. Otherwise length, lookup, eligibility.
    3. `resolve_products`: one batched read over the distinct ids. All must exist.
    4. `build_order_items`: one item per request line, catalog ids.
    5. `persist_order`: redemption, order, items. One transaction.
*/
