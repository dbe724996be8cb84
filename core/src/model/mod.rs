// kart/src/model/mod.rs

//! Data structures for catalog, coupon and order entities.

pub mod coupon;
pub mod order;
pub mod order_item;
pub mod product;

pub use coupon::{Coupon, CouponCode, PresenceMask};
pub use order::{NewOrder, Order, OrderId};
pub use order_item::{InvalidQuantity, NewOrderItem, OrderItem, OrderItemId, Quantity};
pub use product::{Product, ProductId};
