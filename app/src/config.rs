// kart/app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use kart::db::{DbConfig, DEFAULT_DATABASE_URL};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub app_env: String,
  pub server_host: String,
  pub server_port: u16,
  /// Value the `api_key` header must carry on write routes.
  pub api_key: String,
  pub database: DbConfig,
  /// Emit JSON log lines instead of the human-readable format.
  pub log_json: bool,
  /// Apply bundled schema migrations before serving.
  pub run_migrations: bool,
}

impl AppConfig {
  /// Reads `.env` (if present) and then the process environment.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the config from an arbitrary variable source. Unset variables take their defaults;
  /// set but unparsable ones are an error.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_or = |var_name: &str, default: &str| lookup(var_name).unwrap_or_else(|| default.to_string());

    let defaults = DbConfig::default();
    let database = DbConfig {
      url: get_or("DATABASE_URL", DEFAULT_DATABASE_URL),
      max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
      min_connections: parse_var(&lookup, "DB_MIN_CONNECTIONS", defaults.min_connections)?,
      acquire_timeout: Duration::from_secs(parse_var(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
      max_lifetime: secs_or_disabled(parse_var(&lookup, "DB_MAX_LIFETIME_SECS", 1800)?),
      idle_timeout: secs_or_disabled(parse_var(&lookup, "DB_IDLE_TIMEOUT_SECS", 600)?),
    };
    if database.min_connections > database.max_connections {
      return Err(AppError::Config(format!(
        "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
        database.min_connections, database.max_connections
      )));
    }

    let config = Self {
      app_env: get_or("APP_ENV", "dev"),
      server_host: get_or("SERVER_HOST", "127.0.0.1"),
      server_port: parse_var(&lookup, "SERVER_PORT", 8080)?,
      api_key: get_or("API_KEY", "apitest"),
      database,
      log_json: parse_var(&lookup, "LOG_JSON", false)?,
      run_migrations: parse_var(&lookup, "RUN_MIGRATIONS", false)?,
    };

    // Secrets are left out on purpose.
    tracing::info!(
      app_env = %config.app_env,
      server_host = %config.server_host,
      server_port = config.server_port,
      db_max_connections = config.database.max_connections,
      "Application configuration loaded successfully."
    );
    Ok(config)
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, var_name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match lookup(var_name) {
    None => Ok(default),
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e))),
  }
}

// 0 turns the limit off.
fn secs_or_disabled(secs: u64) -> Option<Duration> {
  (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| vars.get(name).cloned()
  }

  #[test]
  fn defaults_apply_when_nothing_is_set() {
    let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(config.app_env, "dev");
    assert_eq!(config.bind_address(), "127.0.0.1:8080");
    assert_eq!(config.api_key, "apitest");
    assert_eq!(config.database, DbConfig::default());
    assert!(!config.log_json);
    assert!(!config.run_migrations);
  }

  #[test]
  fn overrides_are_parsed() {
    let config = AppConfig::from_lookup(lookup_from(&[
      ("SERVER_PORT", "9090"),
      ("API_KEY", "s3cret"),
      ("DATABASE_URL", "postgres://kart@db/kart"),
      ("DB_MAX_CONNECTIONS", "32"),
      ("DB_ACQUIRE_TIMEOUT_SECS", "2"),
      ("DB_MAX_LIFETIME_SECS", "0"),
      ("LOG_JSON", "true"),
    ]))
    .unwrap();

    assert_eq!(config.server_port, 9090);
    assert_eq!(config.api_key, "s3cret");
    assert_eq!(config.database.url, "postgres://kart@db/kart");
    assert_eq!(config.database.max_connections, 32);
    assert_eq!(config.database.acquire_timeout, Duration::from_secs(2));
    assert_eq!(config.database.max_lifetime, None);
    assert!(config.log_json);
  }

  #[test]
  fn invalid_values_are_config_errors() {
    for (name, value) in [("SERVER_PORT", "http"), ("DB_MAX_CONNECTIONS", "-1"), ("LOG_JSON", "yes")] {
      match AppConfig::from_lookup(lookup_from(&[(name, value)])) {
        Err(AppError::Config(msg)) => assert!(msg.contains(name), "{}", msg),
        other => panic!("expected config error for {}, got {:?}", name, other.map(|_| ())),
      }
    }
  }

  #[test]
  fn min_connections_cannot_exceed_max() {
    let result = AppConfig::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "2"), ("DB_MIN_CONNECTIONS", "5")]));
    assert!(matches!(result, Err(AppError::Config(_))));
  }
}
