// kart/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::model::{CouponCode, OrderId, ProductId};

/// Failures raised by the step pipeline itself rather than by a step's business logic.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Handler missing for step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Context field '{field}' was not populated before step '{step_name}'")]
  ContextIncomplete { step_name: String, field: &'static str },
}

/// Coarse classification of a [`PlacementError`], used by the edge layer to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Malformed input; the caller must change the request.
  Validation,
  /// The coupon exists but fails the eligibility policy.
  Ineligible,
  /// A referenced coupon or product does not exist.
  NotFound,
  /// A concurrency-detected conflict (redeemed coupon, duplicate order id).
  Conflict,
  /// Transport or transaction failure. The whole placement may be retried.
  Storage,
  /// Miswired pipeline; a programming error.
  Internal,
}

#[derive(Debug, Error)]
pub enum PlacementError {
  #[error("Coupon code must be between 8 and 10 characters (got {length})")]
  InvalidCoupon { length: usize },

  #[error("Order must contain at least one item")]
  EmptyOrder,

  #[error("Coupon not found: {0}")]
  CouponNotFound(CouponCode),

  #[error("Coupon {code} must apply to at least two categories (applies to {categories})")]
  CouponIneligible { code: CouponCode, categories: u32 },

  #[error("Coupon already redeemed: {0}")]
  CouponAlreadyRedeemed(CouponCode),

  #[error("Product(s) not found: {}", .0.iter().map(ProductId::as_str).collect::<Vec<_>>().join(", "))]
  ProductNotFound(Vec<ProductId>),

  #[error("Order already exists: {0}")]
  DuplicateOrder(OrderId),

  #[error("Storage failure: {source}")]
  Storage {
    #[source]
    source: AnyhowError,
  },

  #[error("Placement pipeline error: {0}")]
  Pipeline(#[from] PipelineError),
}

impl PlacementError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      PlacementError::InvalidCoupon { .. } | PlacementError::EmptyOrder => ErrorKind::Validation,
      PlacementError::CouponIneligible { .. } => ErrorKind::Ineligible,
      PlacementError::CouponNotFound(_) | PlacementError::ProductNotFound(_) => ErrorKind::NotFound,
      PlacementError::CouponAlreadyRedeemed(_) | PlacementError::DuplicateOrder(_) => ErrorKind::Conflict,
      PlacementError::Storage { .. } => ErrorKind::Storage,
      PlacementError::Pipeline(_) => ErrorKind::Internal,
    }
  }

  /// Wraps any backend failure as a retryable storage error.
  pub fn storage(err: impl Into<AnyhowError>) -> Self {
    PlacementError::Storage { source: err.into() }
  }
}

impl From<sqlx::Error> for PlacementError {
  fn from(err: sqlx::Error) -> Self {
    PlacementError::Storage {
      source: AnyhowError::new(err),
    }
  }
}

pub type PlacementResult<T, E = PlacementError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn product_not_found_lists_every_missing_id() {
    let err = PlacementError::ProductNotFound(vec![ProductId::from("99"), ProductId::from("100")]);
    assert_eq!(err.to_string(), "Product(s) not found: 99, 100");
    assert_eq!(err.kind(), ErrorKind::NotFound);
  }

  #[test]
  fn sqlx_errors_become_storage_kind() {
    let err = PlacementError::from(sqlx::Error::PoolTimedOut);
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert!(err.to_string().starts_with("Storage failure"));
  }
}
