// kart/src/model/coupon.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PlacementError;

/// Shortest coupon code accepted at placement time (inclusive).
pub const COUPON_CODE_MIN_LEN: usize = 8;
/// Longest coupon code accepted at placement time (inclusive).
pub const COUPON_CODE_MAX_LEN: usize = 10;
/// A coupon must touch at least this many category slots to be accepted.
pub const MIN_ELIGIBLE_CATEGORIES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponCode(String);

impl CouponCode {
  /// Wraps a code read back from storage. No length policy is applied; imported rows may be any length.
  pub fn new(code: impl Into<String>) -> Self {
    CouponCode(code.into())
  }

  /// Accepts a caller-supplied code only if its length (in characters) is within
  /// `[COUPON_CODE_MIN_LEN, COUPON_CODE_MAX_LEN]`.
  pub fn parse(raw: &str) -> Result<Self, PlacementError> {
    let length = raw.chars().count();
    if !(COUPON_CODE_MIN_LEN..=COUPON_CODE_MAX_LEN).contains(&length) {
      return Err(PlacementError::InvalidCoupon { length });
    }
    Ok(CouponCode(raw.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for CouponCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// 8-bit category presence mask. Each set bit marks one category slot the coupon covers;
/// which slots are set is irrelevant to order placement, only how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresenceMask(u8);

impl PresenceMask {
  pub const fn new(bits: u8) -> Self {
    PresenceMask(bits)
  }

  pub const fn bits(self) -> u8 {
    self.0
  }

  pub const fn categories(self) -> u32 {
    self.0.count_ones()
  }
}

impl TryFrom<i16> for PresenceMask {
  type Error = std::num::TryFromIntError;

  fn try_from(raw: i16) -> Result<Self, Self::Error> {
    u8::try_from(raw).map(PresenceMask)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
  pub code: CouponCode,
  pub presence_mask: PresenceMask,
}

impl Coupon {
  /// Coarse category-coverage check. This is not a discount calculation.
  pub fn ensure_eligible(&self) -> Result<(), PlacementError> {
    let categories = self.presence_mask.categories();
    if categories < MIN_ELIGIBLE_CATEGORIES {
      return Err(PlacementError::CouponIneligible {
        code: self.code.clone(),
        categories,
      });
    }
    Ok(())
  }
}
