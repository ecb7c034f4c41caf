//! Vitrine client - cart/favorites reconciliation engine.
//!
//! Keeps a locally persisted cart/favorites model consistent with an
//! unreliable remote storefront API, including degraded/offline operation.
//!
//! # Architecture
//!
//! - [`store`] - durable key-value mirror of in-memory state (never fails,
//!   corrupt data degrades to defaults)
//! - [`api`] - stateless REST adapter over `reqwest`; no retries, failure is
//!   terminal per attempt
//! - [`engine`] - the [`engine::Storefront`] handle owning cart, favorites
//!   and session; every mutation is applied locally even when the remote
//!   call fails, tagged with its [`vitrine_core::Provenance`]
//! - [`models`] - domain types, separate from the wire schema
//!
//! # Example
//!
//! ```rust,no_run
//! use vitrine_client::api::Page;
//! use vitrine_client::config::ClientConfig;
//! use vitrine_client::engine::Storefront;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let mut shop = Storefront::open(&config);
//! shop.restore().await;
//!
//! let catalog = shop.refresh_catalog(Page::default(), true).await;
//! if let Some(item) = catalog.items.first() {
//!     let outcome = shop.add_to_cart(item, 2).await?;
//!     println!("added ({})", outcome.provenance);
//! }
//! println!("total: {}", shop.cart_total().display());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;

pub use engine::Storefront;
pub use error::EngineError;
