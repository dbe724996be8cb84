// kart/app/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

use kart_app::web::configure_app_routes;
use kart_app::{telemetry, AppConfig, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = Arc::new(AppConfig::from_env().context("loading configuration")?);
  telemetry::init_tracing(app_config.log_json);

  tracing::info!(app_env = %app_config.app_env, "Starting kart order service...");

  let db_pool = app_config
    .database
    .connect()
    .await
    .context("connecting to the database")?;

  if app_config.run_migrations {
    kart::db::migrate(&db_pool).await.context("running migrations")?;
  }

  let app_state = AppState::postgres(db_pool.clone(), app_config.clone())?;

  let server_address = app_config.bind_address();
  tracing::info!("Binding server to {}...", server_address);

  // Actix handles SIGINT/SIGTERM and drains in-flight requests before returning.
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("binding {}", server_address))?
  .run()
  .await?;

  db_pool.close().await;
  tracing::info!("Server stopped.");
  Ok(())
}
