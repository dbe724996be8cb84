// kart/app/src/import.rs

//! Bulk loader for coupon codes from a newline-delimited file.
//!
//! Codes are streamed, never held in full. Each batch is upserted in one transaction:
//! new codes start with a presence mask of 1, and a code seen again has its mask bumped by
//! one, wrapping at 256.

use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::Instant;
use tracing::{debug, info, instrument};

use crate::errors::Result;

pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const PROGRESS_LOG_INTERVAL: Duration = Duration::from_secs(5);

const UPSERT_COUPON: &str = "INSERT INTO coupons (code, presence_mask) VALUES ($1, 1) \
   ON CONFLICT (code) DO UPDATE SET presence_mask = (coupons.presence_mask + 1) % 256";

/// Destination of imported batches. A batch is applied entirely or not at all.
#[async_trait]
pub trait CouponSink: Send + Sync {
  async fn upsert_batch(&self, codes: &[String]) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct PgCouponSink {
  pool: PgPool,
}

impl PgCouponSink {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CouponSink for PgCouponSink {
  #[instrument(name = "import::upsert_batch", skip_all, fields(batch_len = codes.len()), err)]
  async fn upsert_batch(&self, codes: &[String]) -> Result<()> {
    if codes.is_empty() {
      return Ok(());
    }
    let mut tx = self.pool.begin().await?;
    for code in codes {
      sqlx::query(UPSERT_COUPON).bind(code).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
  pub total: u64,
  pub batches: u64,
}

pub struct CouponImporter<S> {
  sink: S,
  batch_size: usize,
}

impl<S: CouponSink> CouponImporter<S> {
  /// A non-positive `batch_size` falls back to [`DEFAULT_BATCH_SIZE`].
  pub fn new(sink: S, batch_size: i64) -> Self {
    let batch_size = usize::try_from(batch_size)
      .ok()
      .filter(|size| *size > 0)
      .unwrap_or(DEFAULT_BATCH_SIZE);
    Self { sink, batch_size }
  }

  pub fn batch_size(&self) -> usize {
    self.batch_size
  }

  pub fn sink(&self) -> &S {
    &self.sink
  }

  /// Reads `reader` to the end. Lines are trimmed; blank lines and `#` comments are skipped.
  /// Stops at the first failing batch; batches committed before it stay committed.
  pub async fn run<R>(&self, reader: R) -> Result<ImportSummary>
  where
    R: AsyncBufRead + Unpin,
  {
    let mut lines = reader.lines();
    let mut batch: Vec<String> = Vec::with_capacity(self.batch_size);
    let mut summary = ImportSummary::default();
    let mut last_log = Instant::now();

    while let Some(line) = lines.next_line().await? {
      let code = line.trim();
      if code.is_empty() || code.starts_with('#') {
        continue;
      }
      batch.push(code.to_string());
      if batch.len() >= self.batch_size {
        self.flush(&mut batch, &mut summary).await?;
        if last_log.elapsed() >= PROGRESS_LOG_INTERVAL {
          info!(imported = summary.total, "Import in progress.");
          last_log = Instant::now();
        }
      }
    }
    self.flush(&mut batch, &mut summary).await?;

    info!(total = summary.total, batches = summary.batches, "Completed coupon import.");
    Ok(summary)
  }

  async fn flush(&self, batch: &mut Vec<String>, summary: &mut ImportSummary) -> Result<()> {
    if batch.is_empty() {
      return Ok(());
    }
    self.sink.upsert_batch(batch).await?;
    summary.total += batch.len() as u64;
    summary.batches += 1;
    debug!(batch_len = batch.len(), total = summary.total, "Batch committed.");
    batch.clear();
    Ok(())
  }
}
