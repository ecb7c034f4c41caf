//! Cart entry domain type.

use serde::{Deserialize, Serialize};

use vitrine_core::{CartItemId, ItemRef, Price, Provenance};

use super::catalog::CatalogItem;

/// One line of the cart.
///
/// Invariant: `quantity >= 1` while the entry exists. An entry whose
/// quantity would drop to zero is removed by the engine, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Entry identifier: the remote record id when synced, otherwise a
    /// locally generated UUID.
    pub id: String,
    /// The sellable item this line refers to.
    pub item: ItemRef,
    /// Display title, denormalized so the cart renders offline.
    pub title: String,
    /// Unit price at the time the item was added.
    pub unit_price: Price,
    /// Number of units, always >= 1.
    pub quantity: u32,
    /// Thumbnail URL, if the catalog had one.
    pub image_url: Option<String>,
    /// Category label, if the catalog had one.
    pub category: Option<String>,
    /// Server-assigned record id, once the entry has synced.
    pub remote_id: Option<CartItemId>,
    /// Whether this entry mirrors the server or only exists locally.
    pub provenance: Provenance,
}

impl CartEntry {
    /// Fabricate an entry from a catalog item, with a locally generated id
    /// and no remote record. Used on the anonymous and fallback paths.
    #[must_use]
    pub fn local(item: &CatalogItem, quantity: u32, provenance: Provenance) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            item: item.item,
            title: item.title.clone(),
            unit_price: item.price,
            quantity,
            image_url: item.image_url.clone(),
            category: item.category.clone(),
            remote_id: None,
            provenance,
        }
    }

    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use vitrine_core::{CurrencyCode, ItemKind};

    fn fixture_item() -> CatalogItem {
        CatalogItem {
            item: ItemRef::from_kind(ItemKind::Product, 1),
            title: "Teapot".into(),
            price: Price::new("12.50".parse().unwrap(), CurrencyCode::USD),
            image_url: None,
            category: Some("kitchen".into()),
            active: true,
        }
    }

    #[test]
    fn test_local_entry_has_no_remote_record() {
        let entry = CartEntry::local(&fixture_item(), 2, Provenance::LocalOnly);
        assert!(entry.remote_id.is_none());
        assert_eq!(entry.provenance, Provenance::LocalOnly);
        assert_eq!(entry.quantity, 2);
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_line_total() {
        let entry = CartEntry::local(&fixture_item(), 3, Provenance::LocalOnly);
        assert_eq!(entry.line_total().amount, "37.50".parse().unwrap());
    }
}
