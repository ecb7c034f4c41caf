//! Engine error taxonomy.
//!
//! Local precondition failures abort an operation before any remote call.
//! Remote failures mostly do NOT surface here: the engine applies the
//! mutation locally and reports a degraded success instead (see
//! [`crate::engine::Applied`]). Nothing in this crate is fatal; every error
//! path leaves a consistent, persisted state behind.

use thiserror::Error;

use vitrine_core::{EmailError, ItemRef};

use crate::api::ApiError;

/// Errors surfaced by the reconciliation engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Remote API call failed and no local fallback applies (favorites
    /// cannot exist without a remote record).
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Email failed validation before any remote call.
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    /// The operation requires an authenticated session.
    #[error("Not signed in")]
    NotAuthenticated,

    /// The referenced item is not in the cart.
    #[error("Not in cart: {0}")]
    NotInCart(ItemRef),

    /// Quantity must be at least 1 for this operation.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    /// Checkout requires a non-empty cart.
    #[error("Cart is empty")]
    EmptyCart,
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
