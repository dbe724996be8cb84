// kart/src/store/postgres/orders.rs

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{PlacementError, PlacementResult};
use crate::model::{CouponCode, NewOrder, NewOrderItem, OrderId, OrderItemId};
use crate::store::{OrderStore, RedemptionOutcome};

const TRY_REDEEM_SINGLE_USE: &str =
  "INSERT INTO coupon_redemptions (code) VALUES ($1) ON CONFLICT (code) DO NOTHING RETURNING code";

const INSERT_ORDER: &str = "INSERT INTO orders (id, coupon_code) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING";

const INSERT_ORDER_ITEMS: &str = "INSERT INTO order_items (id, order_id, product_id, quantity) \
   SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::text[], $4::int4[])";

/// Insert-if-absent on the redemption record. The primary key on `coupon_redemptions.code`
/// makes concurrent attempts on one code serialize: exactly one sees an empty slot.
pub(crate) async fn try_redeem_single_use(
  conn: &mut PgConnection,
  code: &CouponCode,
) -> Result<RedemptionOutcome, sqlx::Error> {
  let inserted: Option<String> = sqlx::query_scalar(TRY_REDEEM_SINGLE_USE)
    .bind(code.as_str())
    .fetch_optional(conn)
    .await?;
  Ok(match inserted {
    Some(_) => RedemptionOutcome::Redeemed,
    None => RedemptionOutcome::AlreadyRedeemed,
  })
}

#[derive(Debug, Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderStore for PgOrderStore {
  /// Every early return drops `tx` uncommitted, which rolls it back. The same holds when the
  /// caller's future is dropped mid-flight, so a cancelled placement leaves nothing behind.
  #[instrument(
    name = "orders::create_with_items",
    skip(self, order, items),
    fields(coupon = order.coupon_code.as_ref().map(CouponCode::as_str), item_count = items.len()),
    err
  )]
  async fn create_with_items(&self, order: NewOrder, items: Vec<NewOrderItem>) -> PlacementResult<OrderId> {
    if items.is_empty() {
      return Err(PlacementError::EmptyOrder);
    }
    let order_id = order.id.unwrap_or_else(OrderId::generate);

    let mut tx = self.pool.begin().await?;

    if let Some(code) = &order.coupon_code {
      match try_redeem_single_use(&mut tx, code).await? {
        RedemptionOutcome::Redeemed => debug!(coupon = %code, "Coupon redemption recorded."),
        RedemptionOutcome::AlreadyRedeemed => {
          warn!(coupon = %code, "Coupon already redeemed; rolling back.");
          return Err(PlacementError::CouponAlreadyRedeemed(code.clone()));
        }
      }
    }

    let inserted = sqlx::query(INSERT_ORDER)
      .bind(order_id)
      .bind(order.coupon_code.as_ref().map(CouponCode::as_str))
      .execute(&mut *tx)
      .await?;
    if inserted.rows_affected() == 0 {
      warn!(%order_id, "Order id already present; rolling back.");
      return Err(PlacementError::DuplicateOrder(order_id));
    }

    let mut ids: Vec<Uuid> = Vec::with_capacity(items.len());
    let mut product_ids: Vec<String> = Vec::with_capacity(items.len());
    let mut quantities: Vec<i32> = Vec::with_capacity(items.len());
    for item in items {
      ids.push(item.id.unwrap_or_else(OrderItemId::generate).as_uuid());
      product_ids.push(item.product_id.into_inner());
      quantities.push(item.quantity.get());
    }
    let order_ids = vec![order_id.as_uuid(); ids.len()];

    sqlx::query(INSERT_ORDER_ITEMS)
      .bind(ids)
      .bind(order_ids)
      .bind(product_ids)
      .bind(quantities)
      .execute(&mut *tx)
      .await?;

    tx.commit().await?;
    info!(%order_id, "Order committed.");
    Ok(order_id)
  }
}
