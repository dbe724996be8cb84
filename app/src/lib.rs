// kart/app/src/lib.rs

//! HTTP edge and operational tooling around the `kart` placement core.

pub mod config;
pub mod errors;
pub mod import;
pub mod state;
pub mod telemetry;
pub mod web;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;
