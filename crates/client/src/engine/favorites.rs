//! Favorite mutations.
//!
//! Favorites always mirror a remote record, so the anonymous branch does not
//! exist here: without a session these operations fail the precondition
//! instead of creating local-only state.

use tracing::{instrument, warn};

use vitrine_core::ItemRef;

use crate::api::ApiError;
use crate::error::{EngineError, Result};

use super::{Applied, Storefront};

impl Storefront {
    /// Favorite an item for the signed-in user.
    ///
    /// Idempotent: favoriting an already-favorited item reports success both
    /// times and never creates a duplicate entry. On a remote 409 the
    /// pre-existing remote record is canonical and the local list is
    /// refreshed from the server.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotAuthenticated`] without a session, or the
    /// API error when the create call fails (a favorite cannot be demoted to
    /// a local-only record).
    #[instrument(skip(self), fields(item = %item))]
    pub async fn add_favorite(&mut self, item: ItemRef) -> Result<Applied> {
        let Some(user_id) = self.session_user_id() else {
            return Err(EngineError::NotAuthenticated);
        };

        if self.is_favorited(item) {
            return Ok(Applied::synced());
        }

        match self.api.add_favorite(user_id, item).await {
            Ok(entry) => {
                self.favorites.push(entry);
                self.persist_favorites();
                Ok(Applied::synced())
            }
            Err(ApiError::AlreadyExists) => {
                // Favorited on another device or in a previous session; the
                // remote state is canonical, pick up its record.
                match self.api.favorites_for_user(user_id).await {
                    Ok(favorites) => {
                        self.favorites = favorites;
                        self.persist_favorites();
                        Ok(Applied::synced())
                    }
                    Err(e) => {
                        warn!(error = %e, item = %item, "Favorite exists remotely but refresh failed");
                        Ok(Applied::fallback(format!(
                            "Favorited, but the list could not be refreshed: {e}"
                        )))
                    }
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Unfavorite an item.
    ///
    /// Removing something that is not favorited is an idempotent no-op. A
    /// remote 404 counts as success, and any other remote failure still
    /// removes the entry locally so the user's action is kept.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotAuthenticated`] without a session.
    #[instrument(skip(self), fields(item = %item))]
    pub async fn remove_favorite(&mut self, item: ItemRef) -> Result<Applied> {
        if self.session.is_none() {
            return Err(EngineError::NotAuthenticated);
        }

        let Some(position) = self.favorites.iter().position(|entry| entry.item == item) else {
            return Ok(Applied::synced());
        };
        let entry = self.favorites.remove(position);

        let applied = match self.api.remove_favorite(entry.id).await {
            Ok(()) | Err(ApiError::NotFound(_)) => Applied::synced(),
            Err(e) => {
                warn!(error = %e, item = %item, "Remote unfavorite failed, removed locally");
                Applied::fallback(format!("Removed on this device only: {e}"))
            }
        };

        self.persist_favorites();
        Ok(applied)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::{offline_storefront, offline_storefront_with_session};
    use super::*;
    use vitrine_core::{ItemKind, Provenance};

    #[tokio::test]
    async fn test_anonymous_add_favorite_fails_precondition() {
        let (_dir, mut shop) = offline_storefront();
        let item = ItemRef::from_kind(ItemKind::Product, 1);
        assert!(matches!(
            shop.add_favorite(item).await,
            Err(EngineError::NotAuthenticated)
        ));
        assert_eq!(shop.favorite_count(), 0);
    }

    #[tokio::test]
    async fn test_add_favorite_remote_failure_does_not_create_local_record() {
        // Session active but the endpoint is dead: no local-only favorites.
        let (_dir, mut shop) = offline_storefront_with_session();
        let item = ItemRef::from_kind(ItemKind::MarketListing, 2);

        assert!(matches!(
            shop.add_favorite(item).await,
            Err(EngineError::Api(_))
        ));
        assert!(!shop.is_favorited(item));
    }

    #[tokio::test]
    async fn test_remove_missing_favorite_is_noop() {
        let (_dir, mut shop) = offline_storefront_with_session();
        let item = ItemRef::from_kind(ItemKind::Product, 5);

        let applied = shop.remove_favorite(item).await.unwrap();
        assert_eq!(applied.provenance, Provenance::Synced);
    }
}
