//! Catalog reads with an explicit degraded state.

use tracing::{instrument, warn};

use vitrine_core::{DataSource, ItemRef};

use crate::api::{ApiError, Page};
use crate::models::{CatalogItem, CatalogView};
use crate::store::keys;

use super::Storefront;

impl Storefront {
    /// Fetch the catalog (products, market listings, author listings) from
    /// the remote and persist it as the new snapshot.
    ///
    /// Never fails: when any fetch fails the persisted snapshot is served
    /// instead, tagged [`DataSource::Snapshot`] so callers can render the
    /// degraded state honestly.
    #[instrument(skip(self))]
    pub async fn refresh_catalog(&mut self, page: Page, active_only: bool) -> CatalogView {
        match self.fetch_catalog(page, active_only).await {
            Ok(items) => {
                if page.is_default() {
                    self.store.save(keys::CATALOG, &items);
                }
                CatalogView {
                    items,
                    source: DataSource::Live,
                }
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed, serving persisted snapshot");
                CatalogView {
                    items: self.store.load(keys::CATALOG),
                    source: DataSource::Snapshot,
                }
            }
        }
    }

    async fn fetch_catalog(
        &self,
        page: Page,
        active_only: bool,
    ) -> Result<Vec<CatalogItem>, ApiError> {
        let mut items = self.api.products(page, active_only).await?;
        items.extend(self.api.market_listings(page, active_only).await?);
        items.extend(self.api.author_listings(page, active_only).await?);
        Ok(items)
    }

    /// The persisted catalog snapshot, without touching the network.
    #[must_use]
    pub fn catalog_snapshot(&self) -> Vec<CatalogItem> {
        self.store.load(keys::CATALOG)
    }

    /// Look an item up in the persisted snapshot.
    #[must_use]
    pub fn find_in_snapshot(&self, item: ItemRef) -> Option<CatalogItem> {
        self.catalog_snapshot()
            .into_iter()
            .find(|candidate| candidate.item == item)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::{catalog_item, offline_storefront};
    use vitrine_core::{DataSource, ItemKind};

    use crate::api::Page;
    use crate::store::keys;

    #[tokio::test]
    async fn test_failed_fetch_serves_snapshot_as_degraded() {
        let (_dir, mut shop) = offline_storefront();
        let snapshot = vec![
            catalog_item(ItemKind::Product, 1, "Teapot", "12.50"),
            catalog_item(ItemKind::MarketListing, 2, "Lamp", "30"),
        ];
        shop.store.save(keys::CATALOG, &snapshot);

        let view = shop.refresh_catalog(Page::default(), true).await;

        assert_eq!(view.source, DataSource::Snapshot);
        assert!(view.source.is_degraded());
        assert_eq!(view.items, snapshot);
    }

    #[tokio::test]
    async fn test_failed_fetch_with_no_snapshot_is_empty() {
        let (_dir, mut shop) = offline_storefront();
        let view = shop.refresh_catalog(Page::default(), true).await;
        assert_eq!(view.source, DataSource::Snapshot);
        assert!(view.items.is_empty());
    }

    #[tokio::test]
    async fn test_find_in_snapshot() {
        let (_dir, shop) = offline_storefront();
        let item = catalog_item(ItemKind::AuthorListing, 9, "Sketch", "5");
        shop.store.save(keys::CATALOG, &vec![item.clone()]);

        assert_eq!(shop.find_in_snapshot(item.item), Some(item));
        assert!(
            shop.find_in_snapshot(vitrine_core::ItemRef::from_kind(ItemKind::Product, 1))
                .is_none()
        );
    }
}
