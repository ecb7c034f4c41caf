//! Canonical wire schema for the remote storefront API.
//!
//! One serde struct per remote record is the single mapping between internal
//! and remote field names. Earlier client generations disagreed on some
//! spellings (`price` vs `cost`, `category` vs `topic`); `#[serde(alias)]`
//! accepts the variants on the way in while serialization always emits the
//! canonical name.

use serde::{Deserialize, Serialize};

use vitrine_core::{ItemKind, ItemRef};

/// A user record as returned by `/users/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUser {
    pub id: i32,
    pub email: String,
    #[serde(default, alias = "full_name")]
    pub name: String,
    #[serde(default)]
    pub role_id: Option<i32>,
}

/// Registration payload for `POST /users/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role_id: i32,
}

/// A role record from `GET /roles/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRole {
    pub id: i32,
    pub name: String,
}

/// A catalog record from `/products/`, `/listings/` or `/author-listings/`.
///
/// The three collections share one shape; the caller supplies the
/// [`ItemKind`] since the record itself does not carry it.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCatalogRecord {
    pub id: i32,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(alias = "cost")]
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, alias = "topic")]
    pub category: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// A favorite record from `/favorites/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFavorite {
    pub id: i32,
    pub user_id: i32,
    #[serde(default)]
    pub product_id: Option<i32>,
    #[serde(default)]
    pub listing_id: Option<i32>,
    #[serde(default)]
    pub author_listing_id: Option<i32>,
}

/// Payload for `POST /favorites/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewFavorite {
    pub user_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_listing_id: Option<i32>,
}

impl NewFavorite {
    /// Build a favorite payload for one item, setting exactly one id column.
    #[must_use]
    pub fn for_item(user_id: i32, item: ItemRef) -> Self {
        let (product_id, listing_id, author_listing_id) = split_item(item);
        Self {
            user_id,
            product_id,
            listing_id,
            author_listing_id,
        }
    }
}

/// A cart item record from `/carts/my/items/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCartItem {
    pub id: i32,
    pub item_type: ItemKind,
    #[serde(default)]
    pub product_id: Option<i32>,
    #[serde(default)]
    pub listing_id: Option<i32>,
    #[serde(default)]
    pub author_listing_id: Option<i32>,
    pub quantity: i64,
    #[serde(alias = "cost")]
    pub price: f64,
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, alias = "topic")]
    pub category: Option<String>,
}

/// Payload for `POST /carts/my/items/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCartItem {
    pub item_type: ItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_listing_id: Option<i32>,
    pub quantity: u32,
    pub price: f64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Payload for `PUT /carts/my/items/{id}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartItemQuantityUpdate {
    pub quantity: u32,
}

/// Error payload shape shared by all endpoints.
///
/// A missing or malformed body deserializes to the default and the caller
/// falls back to a generic message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default, alias = "message")]
    pub detail: Option<String>,
}

/// Spread an [`ItemRef`] over the remote's three nullable id columns.
#[must_use]
pub const fn split_item(item: ItemRef) -> (Option<i32>, Option<i32>, Option<i32>) {
    match item {
        ItemRef::Product(id) => (Some(id.as_i32()), None, None),
        ItemRef::MarketListing(id) => (None, Some(id.as_i32()), None),
        ItemRef::AuthorListing(id) => (None, None, Some(id.as_i32())),
    }
}
