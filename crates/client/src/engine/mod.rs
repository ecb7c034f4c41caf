//! The cart/favorites reconciliation engine.
//!
//! [`Storefront`] is the single, explicitly owned state handle: it holds the
//! in-memory cart and favorites, the session, the remote adapter and the
//! local store. Every mutation goes through one of its methods; there are no
//! ambient globals.
//!
//! # Reconciliation policy
//!
//! Each mutating operation takes one of three branches:
//!
//! 1. **Anonymous**: mutate locally, mark the entry `LocalOnly`, persist.
//!    The remote adapter is never called.
//! 2. **Authenticated, remote call succeeds**: adopt the server's canonical
//!    record (server-assigned id), mark `Synced`, persist.
//! 3. **Authenticated, remote call fails**: apply the mutation anyway with a
//!    locally fabricated identifier, mark `Fallback`, persist, and return a
//!    degraded success. The user's action is never dropped.
//!
//! The store is written synchronously after every in-memory mutation, so
//! persisted state never diverges from memory.
//!
//! Execution is single-threaded cooperative: a mutation is one `async fn` on
//! `&mut Storefront` that suspends only while awaiting the adapter, and the
//! borrow checker rules out two mutations running against the same entry.

mod cart;
mod catalog;
mod favorites;
mod session;

use std::collections::HashMap;

use vitrine_core::{ItemRef, Price, Provenance, UserId};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::models::{CartEntry, FavoriteEntry, Order, User};
use crate::store::{LocalStore, keys};

/// Outcome of a reconciled mutation.
///
/// The mutation itself succeeded (the local model changed); `provenance`
/// says how far it got, and `notice` carries a non-blocking message when a
/// remote call failed along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// How the resulting state relates to the server.
    pub provenance: Provenance,
    /// User-facing notice for degraded outcomes.
    pub notice: Option<String>,
}

impl Applied {
    /// The server confirmed the mutation.
    #[must_use]
    pub const fn synced() -> Self {
        Self {
            provenance: Provenance::Synced,
            notice: None,
        }
    }

    /// The mutation was intentionally local (no session).
    #[must_use]
    pub const fn local() -> Self {
        Self {
            provenance: Provenance::LocalOnly,
            notice: None,
        }
    }

    /// A remote call failed; the mutation was applied locally instead.
    #[must_use]
    pub const fn fallback(notice: String) -> Self {
        Self {
            provenance: Provenance::Fallback,
            notice: Some(notice),
        }
    }

    /// Whether this outcome is degraded (not confirmed by the server while a
    /// session was active).
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self.provenance, Provenance::Fallback)
    }
}

/// The storefront state handle.
///
/// Exclusively owns the in-memory cart and favorites collections; everything
/// else reads them through the projection methods.
pub struct Storefront {
    api: ApiClient,
    store: LocalStore,
    session: Option<User>,
    cart: HashMap<ItemRef, CartEntry>,
    favorites: Vec<FavoriteEntry>,
}

impl Storefront {
    /// Open the storefront, restoring persisted state from the data
    /// directory. No network traffic happens here; call
    /// [`restore`](Self::restore) to refresh favorites from the remote.
    #[must_use]
    pub fn open(config: &ClientConfig) -> Self {
        let api = ApiClient::new(config);
        let store = LocalStore::open(&config.data_dir);

        let session: Option<User> = store.get(keys::USER);
        let cart = store
            .load::<Vec<CartEntry>>(keys::CART)
            .into_iter()
            .map(|entry| (entry.item, entry))
            .collect();
        let favorites = store.load(keys::FAVORITES);

        Self {
            api,
            store,
            session,
            cart,
            favorites,
        }
    }

    // =========================================================================
    // Persistence mirrors
    // =========================================================================

    fn persist_cart(&self) {
        let mut entries: Vec<&CartEntry> = self.cart.values().collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        self.store.save(keys::CART, &entries);
    }

    fn persist_favorites(&self) {
        self.store.save(keys::FAVORITES, &self.favorites);
    }

    fn persist_session(&self) {
        match &self.session {
            Some(user) => self.store.save(keys::USER, user),
            None => self.store.remove(keys::USER),
        }
    }

    fn session_user_id(&self) -> Option<UserId> {
        self.session.as_ref().map(|user| user.id)
    }

    // =========================================================================
    // View projections (pure reads)
    // =========================================================================

    /// The authenticated user, if any.
    #[must_use]
    pub fn session(&self) -> Option<&User> {
        self.session.as_ref()
    }

    /// Whether the item is favorited by the current user.
    #[must_use]
    pub fn is_favorited(&self, item: ItemRef) -> bool {
        self.favorites.iter().any(|entry| entry.item == item)
    }

    /// Sum of unit price times quantity over the whole cart.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.cart.values().map(CartEntry::line_total).sum()
    }

    /// Number of distinct cart entries.
    #[must_use]
    pub fn cart_count(&self) -> usize {
        self.cart.len()
    }

    /// Total units across all cart entries (for badge rendering).
    #[must_use]
    pub fn cart_units(&self) -> u32 {
        self.cart.values().map(|entry| entry.quantity).sum()
    }

    /// Number of favorites.
    #[must_use]
    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    /// Cart entries, ordered by title for stable rendering.
    #[must_use]
    pub fn cart_entries(&self) -> Vec<&CartEntry> {
        let mut entries: Vec<&CartEntry> = self.cart.values().collect();
        entries.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        entries
    }

    /// Favorites for the current user.
    #[must_use]
    pub fn favorites(&self) -> &[FavoriteEntry] {
        &self.favorites
    }

    /// Locally recorded order history, oldest first.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.store.load(keys::ORDERS)
    }
}
