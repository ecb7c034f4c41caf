//! Cart mutations and checkout.

use tracing::{instrument, warn};

use vitrine_core::{ItemRef, Provenance};

use crate::api::ApiError;
use crate::error::{EngineError, Result};
use crate::models::{CartEntry, CatalogItem, Order};
use crate::store::keys;

use super::{Applied, Storefront};

impl Storefront {
    /// Add `quantity` units of a catalog item to the cart.
    ///
    /// Adding an item that is already in the cart merges into the existing
    /// entry (an update, remote-side, when the entry has a remote record).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidQuantity`] for a zero quantity. Remote
    /// failures do not error; they produce a [`Applied::fallback`] outcome.
    #[instrument(skip(self, item), fields(item = %item.item, quantity))]
    pub async fn add_to_cart(&mut self, item: &CatalogItem, quantity: u32) -> Result<Applied> {
        if quantity == 0 {
            return Err(EngineError::InvalidQuantity);
        }

        if let Some(existing) = self.cart.get(&item.item).map(|entry| entry.quantity) {
            return self.set_cart_quantity(item.item, existing + quantity).await;
        }

        let applied = match self.session_user_id() {
            None => {
                self.cart.insert(
                    item.item,
                    CartEntry::local(item, quantity, Provenance::LocalOnly),
                );
                Applied::local()
            }
            Some(user_id) => match self.api.add_cart_item(user_id, item, quantity).await {
                Ok(canonical) => {
                    self.cart.insert(item.item, canonical);
                    Applied::synced()
                }
                Err(e) => {
                    warn!(error = %e, item = %item.item, "Remote add-to-cart failed, keeping local entry");
                    self.cart.insert(
                        item.item,
                        CartEntry::local(item, quantity, Provenance::Fallback),
                    );
                    Applied::fallback(format!("Added on this device only: {e}"))
                }
            },
        };

        self.persist_cart();
        Ok(applied)
    }

    /// Set the quantity of a cart entry. A quantity of zero removes the
    /// entry; no entry with quantity ≤ 0 is ever stored.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotInCart`] if the item has no cart entry.
    #[instrument(skip(self), fields(item = %item, quantity))]
    pub async fn set_cart_quantity(&mut self, item: ItemRef, quantity: u32) -> Result<Applied> {
        if quantity == 0 {
            return self.remove_from_cart(item).await;
        }

        let Some(entry) = self.cart.get(&item) else {
            return Err(EngineError::NotInCart(item));
        };
        let remote_id = entry.remote_id;

        let applied = match (self.session_user_id(), remote_id) {
            (Some(user_id), Some(remote_id)) => {
                match self
                    .api
                    .update_cart_item_quantity(user_id, remote_id, quantity)
                    .await
                {
                    Ok(canonical) => {
                        self.cart.insert(item, canonical);
                        Applied::synced()
                    }
                    Err(e) => {
                        warn!(error = %e, item = %item, "Remote quantity update failed, applying locally");
                        self.apply_local_quantity(item, quantity, Provenance::Fallback);
                        Applied::fallback(format!("Updated on this device only: {e}"))
                    }
                }
            }
            (Some(_), None) => {
                // Never synced; keep whatever provenance it already carries.
                let provenance = self
                    .cart
                    .get(&item)
                    .map_or(Provenance::LocalOnly, |entry| entry.provenance);
                self.apply_local_quantity(item, quantity, provenance);
                Applied {
                    provenance,
                    notice: None,
                }
            }
            (None, _) => {
                self.apply_local_quantity(item, quantity, Provenance::LocalOnly);
                Applied::local()
            }
        };

        self.persist_cart();
        Ok(applied)
    }

    fn apply_local_quantity(&mut self, item: ItemRef, quantity: u32, provenance: Provenance) {
        if let Some(entry) = self.cart.get_mut(&item) {
            entry.quantity = quantity;
            entry.provenance = provenance;
        }
    }

    /// Remove a cart entry.
    ///
    /// An entry with no resolvable remote record is removed purely locally,
    /// without a remote call. A remote 404 counts as success: the goal state
    /// is reached.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotInCart`] if the item has no cart entry.
    #[instrument(skip(self), fields(item = %item))]
    pub async fn remove_from_cart(&mut self, item: ItemRef) -> Result<Applied> {
        let Some(entry) = self.cart.get(&item) else {
            return Err(EngineError::NotInCart(item));
        };
        let remote_id = entry.remote_id;

        let applied = match (self.session_user_id(), remote_id) {
            (Some(user_id), Some(remote_id)) => {
                match self.api.remove_cart_item(user_id, remote_id).await {
                    Ok(()) | Err(ApiError::NotFound(_)) => Applied::synced(),
                    Err(e) => {
                        warn!(error = %e, item = %item, "Remote removal failed, removing locally");
                        Applied::fallback(format!("Removed on this device only: {e}"))
                    }
                }
            }
            _ => Applied::local(),
        };

        self.cart.remove(&item);
        self.persist_cart();
        Ok(applied)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Infallible in practice; returns `Result` for symmetry with the other
    /// mutations (remote failure degrades, it does not error).
    #[instrument(skip(self))]
    pub async fn clear_cart(&mut self) -> Result<Applied> {
        let applied = match self.session_user_id() {
            None => Applied::local(),
            Some(user_id) => match self.api.clear_cart(user_id).await {
                Ok(()) => Applied::synced(),
                Err(e) => {
                    warn!(error = %e, "Remote cart clear failed, clearing locally");
                    Applied::fallback(format!("Cleared on this device only: {e}"))
                }
            },
        };

        self.cart.clear();
        self.persist_cart();
        Ok(applied)
    }

    /// Check out: snapshot the cart into the local order history, then clear
    /// it (remotely too, when a session is active).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyCart`] if there is nothing to check out.
    #[instrument(skip(self))]
    pub async fn place_order(&mut self) -> Result<Order> {
        if self.cart.is_empty() {
            return Err(EngineError::EmptyCart);
        }

        let entries = self.cart_entries().into_iter().cloned().collect();
        let order = Order::from_cart(entries);

        let mut orders: Vec<Order> = self.store.load(keys::ORDERS);
        orders.push(order.clone());
        self.store.save(keys::ORDERS, &orders);

        self.clear_cart().await?;
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::{catalog_item, offline_storefront, reopen};
    use super::*;
    use rust_decimal::Decimal;
    use vitrine_core::ItemKind;

    #[tokio::test]
    async fn test_anonymous_add_is_local_only() {
        let (_dir, mut shop) = offline_storefront();
        let item = catalog_item(ItemKind::Product, 1, "Teapot", "12.50");

        let applied = shop.add_to_cart(&item, 1).await.unwrap();

        // No session, so the adapter was never called - even though the
        // endpoint is dead, the outcome is a clean local success.
        assert_eq!(applied, Applied::local());
        let entries = shop.cart_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.first().unwrap().provenance, Provenance::LocalOnly);
        assert!(entries.first().unwrap().remote_id.is_none());
    }

    #[tokio::test]
    async fn test_add_zero_quantity_rejected() {
        let (_dir, mut shop) = offline_storefront();
        let item = catalog_item(ItemKind::Product, 1, "Teapot", "12.50");
        assert!(matches!(
            shop.add_to_cart(&item, 0).await,
            Err(EngineError::InvalidQuantity)
        ));
        assert_eq!(shop.cart_count(), 0);
    }

    #[tokio::test]
    async fn test_add_twice_merges_quantity() {
        let (_dir, mut shop) = offline_storefront();
        let item = catalog_item(ItemKind::Product, 1, "Teapot", "12.50");

        shop.add_to_cart(&item, 1).await.unwrap();
        shop.add_to_cart(&item, 2).await.unwrap();

        assert_eq!(shop.cart_count(), 1);
        assert_eq!(shop.cart_units(), 3);
    }

    #[tokio::test]
    async fn test_quantity_zero_removes_entry() {
        let (_dir, mut shop) = offline_storefront();
        let item = catalog_item(ItemKind::MarketListing, 4, "Lamp", "30");

        shop.add_to_cart(&item, 2).await.unwrap();
        shop.set_cart_quantity(item.item, 0).await.unwrap();

        assert_eq!(shop.cart_count(), 0);
        // The persisted mirror agrees.
        assert_eq!(reopen(&_dir).cart_count(), 0);
    }

    #[tokio::test]
    async fn test_cart_total() {
        let (_dir, mut shop) = offline_storefront();
        let a = catalog_item(ItemKind::Product, 1, "A", "100");
        let b = catalog_item(ItemKind::Product, 2, "B", "50");

        shop.add_to_cart(&a, 2).await.unwrap();
        shop.add_to_cart(&b, 1).await.unwrap();

        assert_eq!(shop.cart_total().amount, Decimal::from(250));
    }

    #[tokio::test]
    async fn test_remove_unknown_item_is_precondition_failure() {
        let (_dir, mut shop) = offline_storefront();
        let item = ItemRef::from_kind(ItemKind::Product, 99);
        assert!(matches!(
            shop.remove_from_cart(item).await,
            Err(EngineError::NotInCart(_))
        ));
    }

    #[tokio::test]
    async fn test_persisted_cart_matches_memory_after_each_operation() {
        let (dir, mut shop) = offline_storefront();
        let a = catalog_item(ItemKind::Product, 1, "A", "10");
        let b = catalog_item(ItemKind::AuthorListing, 2, "B", "20");

        shop.add_to_cart(&a, 1).await.unwrap();
        assert_eq!(reopen(&dir).cart_units(), shop.cart_units());

        shop.add_to_cart(&b, 3).await.unwrap();
        assert_eq!(reopen(&dir).cart_units(), shop.cart_units());

        shop.set_cart_quantity(a.item, 5).await.unwrap();
        assert_eq!(reopen(&dir).cart_units(), shop.cart_units());

        shop.remove_from_cart(b.item).await.unwrap();
        let reopened = reopen(&dir);
        assert_eq!(reopened.cart_units(), shop.cart_units());
        assert_eq!(reopened.cart_total(), shop.cart_total());
    }

    #[tokio::test]
    async fn test_clear_cart() {
        let (dir, mut shop) = offline_storefront();
        shop.add_to_cart(&catalog_item(ItemKind::Product, 1, "A", "10"), 2)
            .await
            .unwrap();

        let applied = shop.clear_cart().await.unwrap();
        assert_eq!(applied, Applied::local());
        assert_eq!(shop.cart_count(), 0);
        assert_eq!(reopen(&dir).cart_count(), 0);
    }

    #[tokio::test]
    async fn test_place_order_snapshots_and_clears() {
        let (dir, mut shop) = offline_storefront();
        shop.add_to_cart(&catalog_item(ItemKind::Product, 1, "A", "100"), 2)
            .await
            .unwrap();
        shop.add_to_cart(&catalog_item(ItemKind::Product, 2, "B", "50"), 1)
            .await
            .unwrap();

        let order = shop.place_order().await.unwrap();

        assert_eq!(order.total.amount, Decimal::from(250));
        assert_eq!(shop.cart_count(), 0);
        let history = reopen(&dir).orders();
        assert_eq!(history.len(), 1);
        assert_eq!(history.first().unwrap().id, order.id);
    }

    #[tokio::test]
    async fn test_authenticated_add_with_dead_remote_falls_back() {
        use super::super::tests::offline_storefront_with_session;

        let (dir, mut shop) = offline_storefront_with_session();
        let item = catalog_item(ItemKind::Product, 3, "Kettle", "25");

        let applied = shop.add_to_cart(&item, 1).await.unwrap();

        // The remote call failed, but the user's action was kept.
        assert!(applied.is_degraded());
        assert!(applied.notice.is_some());
        let entries = shop.cart_entries();
        assert_eq!(entries.first().unwrap().provenance, Provenance::Fallback);
        assert!(entries.first().unwrap().remote_id.is_none());
        assert_eq!(shop.cart_total().amount, Decimal::from(25));

        // And persisted as such.
        let reopened = reopen(&dir);
        assert_eq!(
            reopened.cart_entries().first().unwrap().provenance,
            Provenance::Fallback
        );
    }

    #[tokio::test]
    async fn test_authenticated_clear_with_dead_remote_still_clears() {
        use super::super::tests::offline_storefront_with_session;

        let (_dir, mut shop) = offline_storefront_with_session();
        shop.add_to_cart(&catalog_item(ItemKind::Product, 1, "A", "10"), 1)
            .await
            .unwrap();

        let applied = shop.clear_cart().await.unwrap();
        assert!(applied.is_degraded());
        assert_eq!(shop.cart_count(), 0);
    }

    #[tokio::test]
    async fn test_place_order_on_empty_cart_fails() {
        let (_dir, mut shop) = offline_storefront();
        assert!(matches!(
            shop.place_order().await,
            Err(EngineError::EmptyCart)
        ));
    }
}
