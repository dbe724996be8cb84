// kart/src/store/postgres/mod.rs

//! Postgres-backed stores. All three share one `PgPool`, built by [`crate::db::DbConfig`]
//! and passed in explicitly.

mod catalog;
mod coupons;
mod orders;

pub use catalog::PgProductCatalog;
pub use coupons::PgCouponStore;
pub use orders::PgOrderStore;
