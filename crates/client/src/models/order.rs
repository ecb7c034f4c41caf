//! Locally recorded order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrine_core::Price;

use super::cart::CartEntry;

/// A checkout snapshot.
///
/// Order history is a device-local record of what the user checked out;
/// payment and fulfilment happen elsewhere and are out of scope here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Locally generated order id.
    pub id: String,
    /// When the order was placed, in UTC.
    pub placed_at: DateTime<Utc>,
    /// The cart entries at checkout time.
    pub entries: Vec<CartEntry>,
    /// Total at checkout time.
    pub total: Price,
}

impl Order {
    /// Snapshot a cart into an order.
    #[must_use]
    pub fn from_cart(entries: Vec<CartEntry>) -> Self {
        let total = entries.iter().map(CartEntry::line_total).sum();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            placed_at: Utc::now(),
            entries,
            total,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::CatalogItem;
    use vitrine_core::{CurrencyCode, ItemKind, ItemRef, Provenance};

    #[test]
    fn test_from_cart_totals() {
        let a = CatalogItem {
            item: ItemRef::from_kind(ItemKind::Product, 1),
            title: "A".into(),
            price: Price::new("100".parse().unwrap(), CurrencyCode::USD),
            image_url: None,
            category: None,
            active: true,
        };
        let entries = vec![
            CartEntry::local(&a, 2, Provenance::LocalOnly),
            CartEntry::local(
                &CatalogItem {
                    item: ItemRef::from_kind(ItemKind::MarketListing, 2),
                    price: Price::new("50".parse().unwrap(), CurrencyCode::USD),
                    title: "B".into(),
                    ..a.clone()
                },
                1,
                Provenance::LocalOnly,
            ),
        ];
        let order = Order::from_cart(entries);
        assert_eq!(order.total.amount, "250".parse().unwrap());
        assert_eq!(order.entries.len(), 2);
    }
}
