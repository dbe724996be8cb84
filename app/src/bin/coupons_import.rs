// kart/app/src/bin/coupons_import.rs

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::BufReader;

use kart_app::import::{CouponImporter, PgCouponSink};
use kart_app::{telemetry, AppConfig};

/// Import coupon codes from a newline-delimited file.
#[derive(Debug, Parser)]
struct ImportArgs {
  /// Path to the coupon codes file, one code per line
  #[clap(long)]
  file: PathBuf,

  /// Number of rows per transaction
  #[clap(long, default_value_t = 2000, allow_negative_numbers = true)]
  batch: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let args = ImportArgs::parse();
  let config = AppConfig::from_env().context("loading configuration")?;
  telemetry::init_tracing(config.log_json);

  let pool = config.database.connect().await.context("connecting to the database")?;

  let file = File::open(&args.file)
    .await
    .with_context(|| format!("opening {}", args.file.display()))?;
  let reader = BufReader::with_capacity(1024 * 1024, file);

  let importer = CouponImporter::new(PgCouponSink::new(pool.clone()), args.batch);
  tracing::info!(file = %args.file.display(), batch_size = importer.batch_size(), "Starting coupon import.");
  let summary = importer.run(reader).await.context("import failed")?;

  pool.close().await;
  tracing::info!(total = summary.total, "Coupon import finished.");
  Ok(())
}
