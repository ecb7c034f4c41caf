//! Domain types for the reconciliation engine.
//!
//! These are validated domain objects, deliberately separate from the wire
//! types in [`crate::api::types`]; conversions between the two live in
//! [`crate::api::conversions`].

pub mod cart;
pub mod catalog;
pub mod favorite;
pub mod order;
pub mod user;

pub use cart::CartEntry;
pub use catalog::{CatalogItem, CatalogView};
pub use favorite::FavoriteEntry;
pub use order::Order;
pub use user::User;
