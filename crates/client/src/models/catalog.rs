//! Catalog domain types.

use serde::{Deserialize, Serialize};

use vitrine_core::{DataSource, ItemRef, Price};

/// One sellable item from any of the three remote collections.
///
/// Products, market listings and author listings are unified into this shape
/// once converted off the wire; the [`ItemRef`] keeps the origin collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Typed reference back to the source collection.
    pub item: ItemRef,
    /// Display title.
    pub title: String,
    /// Current price.
    pub price: Price,
    /// Thumbnail URL.
    pub image_url: Option<String>,
    /// Category label.
    pub category: Option<String>,
    /// Whether the item is currently offered.
    pub active: bool,
}

/// A catalog read, tagged with where the data came from.
///
/// `source` is [`DataSource::Snapshot`] when the remote fetch failed and the
/// items were served from the persisted snapshot instead. Callers render the
/// degraded state explicitly instead of silently showing stale data as live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    /// The catalog items, read-only from the engine's perspective.
    pub items: Vec<CatalogItem>,
    /// Live fetch or persisted snapshot.
    pub source: DataSource,
}
