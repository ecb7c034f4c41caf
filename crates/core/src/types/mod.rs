//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod item;
pub mod price;
pub mod provenance;

pub use email::{Email, EmailError};
pub use id::*;
pub use item::{ItemKind, ItemRef};
pub use price::{CurrencyCode, Price};
pub use provenance::{DataSource, Provenance};
