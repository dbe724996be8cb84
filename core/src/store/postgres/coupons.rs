// kart/src/store/postgres/coupons.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use crate::error::{PlacementError, PlacementResult};
use crate::model::{Coupon, CouponCode, PresenceMask};
use crate::store::CouponStore;

// presence_mask is SMALLINT constrained to 0..=255 by the schema.
#[derive(Debug, FromRow)]
struct CouponRow {
  code: String,
  presence_mask: i16,
}

impl TryFrom<CouponRow> for Coupon {
  type Error = PlacementError;

  fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
    let presence_mask = PresenceMask::try_from(row.presence_mask).map_err(|e| {
      PlacementError::storage(anyhow::Error::new(e).context(format!(
        "coupon {} has out-of-range presence_mask {}",
        row.code, row.presence_mask
      )))
    })?;
    Ok(Coupon {
      code: CouponCode::new(row.code),
      presence_mask,
    })
  }
}

#[derive(Debug, Clone)]
pub struct PgCouponStore {
  pool: PgPool,
}

impl PgCouponStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CouponStore for PgCouponStore {
  #[instrument(name = "coupons::get", skip(self, code), fields(coupon = %code), err)]
  async fn get(&self, code: &CouponCode) -> PlacementResult<Option<Coupon>> {
    let row: Option<CouponRow> = sqlx::query_as("SELECT code, presence_mask FROM coupons WHERE code = $1")
      .bind(code.as_str())
      .fetch_optional(&self.pool)
      .await?;
    row.map(Coupon::try_from).transpose()
  }
}
