//! Item references for cart and favorite entries.
//!
//! The storefront carries three sellable collections: products, market
//! listings, and author listings. A cart or favorite entry points at exactly
//! one of them; [`ItemRef`] makes the "exactly one" rule unrepresentable to
//! violate instead of a runtime check over three nullable columns.

use serde::{Deserialize, Serialize};

use super::id::{AuthorListingId, ListingId, ProductId};

/// Discriminator for the three sellable collections.
///
/// Serialized values match the remote `item_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Product,
    MarketListing,
    AuthorListing,
}

impl ItemKind {
    /// The wire value for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::MarketListing => "market_listing",
            Self::AuthorListing => "author_listing",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(Self::Product),
            "market_listing" | "listing" => Ok(Self::MarketListing),
            "author_listing" => Ok(Self::AuthorListing),
            _ => Err(format!("invalid item kind: {s}")),
        }
    }
}

/// A typed reference to one sellable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ItemRef {
    Product(ProductId),
    MarketListing(ListingId),
    AuthorListing(AuthorListingId),
}

impl ItemRef {
    /// The collection this reference points into.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Product(_) => ItemKind::Product,
            Self::MarketListing(_) => ItemKind::MarketListing,
            Self::AuthorListing(_) => ItemKind::AuthorListing,
        }
    }

    /// The raw integer id of the referenced item.
    #[must_use]
    pub const fn raw_id(&self) -> i32 {
        match self {
            Self::Product(id) => id.as_i32(),
            Self::MarketListing(id) => id.as_i32(),
            Self::AuthorListing(id) => id.as_i32(),
        }
    }

    /// Build a reference from a kind and a raw id.
    #[must_use]
    pub const fn from_kind(kind: ItemKind, id: i32) -> Self {
        match kind {
            ItemKind::Product => Self::Product(ProductId::new(id)),
            ItemKind::MarketListing => Self::MarketListing(ListingId::new(id)),
            ItemKind::AuthorListing => Self::AuthorListing(AuthorListingId::new(id)),
        }
    }
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.raw_id())
    }
}
