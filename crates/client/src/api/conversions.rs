//! Wire-to-domain conversion functions.
//!
//! Records that violate domain invariants (no resolvable item reference,
//! negative price, non-positive quantity) are dropped with a warning rather
//! than propagated; a partially wrong collection read should not take the
//! whole storefront down.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::warn;

use vitrine_core::{
    CartItemId, Email, FavoriteId, ItemKind, ItemRef, Price, Provenance, RoleId, UserId,
};

use crate::models::{CartEntry, CatalogItem, FavoriteEntry, User};

use super::types::{RemoteCartItem, RemoteCatalogRecord, RemoteFavorite, RemoteUser};

/// Convert a wire price. `None` for values that are not representable or
/// negative.
pub fn convert_price(raw: f64) -> Option<Price> {
    let amount = Decimal::from_f64(raw)?;
    let price = Price::new(amount, vitrine_core::CurrencyCode::default());
    if price.is_negative() {
        warn!(raw, "Dropping record with negative price");
        return None;
    }
    Some(price)
}

/// Resolve the remote's three nullable id columns into one [`ItemRef`].
///
/// Exactly one column must be set; anything else is a malformed record.
pub fn resolve_item(
    product_id: Option<i32>,
    listing_id: Option<i32>,
    author_listing_id: Option<i32>,
) -> Option<ItemRef> {
    match (product_id, listing_id, author_listing_id) {
        (Some(id), None, None) => Some(ItemRef::from_kind(ItemKind::Product, id)),
        (None, Some(id), None) => Some(ItemRef::from_kind(ItemKind::MarketListing, id)),
        (None, None, Some(id)) => Some(ItemRef::from_kind(ItemKind::AuthorListing, id)),
        _ => {
            warn!(
                ?product_id,
                ?listing_id,
                ?author_listing_id,
                "Record does not reference exactly one item"
            );
            None
        }
    }
}

/// Convert a user record. Fails when the server hands back an address our
/// own validation would have refused to send.
pub fn convert_user(user: RemoteUser) -> Result<User, vitrine_core::EmailError> {
    Ok(User {
        id: UserId::new(user.id),
        email: Email::parse(&user.email)?,
        name: user.name,
        role_id: user.role_id.map(RoleId::new),
    })
}

/// Convert a favorite record, dropping malformed ones.
pub fn convert_favorite(favorite: RemoteFavorite) -> Option<FavoriteEntry> {
    let item = resolve_item(
        favorite.product_id,
        favorite.listing_id,
        favorite.author_listing_id,
    )?;
    Some(FavoriteEntry {
        id: FavoriteId::new(favorite.id),
        user_id: UserId::new(favorite.user_id),
        item,
    })
}

/// Convert a server cart record into a synced entry.
///
/// The server record is canonical: its id becomes the entry identifier and
/// the provenance is [`Provenance::Synced`].
pub fn convert_cart_item(item: RemoteCartItem) -> Option<CartEntry> {
    let item_ref = resolve_item(item.product_id, item.listing_id, item.author_listing_id)?;
    if item_ref.kind() != item.item_type {
        warn!(
            expected = %item.item_type,
            got = %item_ref.kind(),
            "Cart record discriminator disagrees with its id column"
        );
        return None;
    }
    let quantity = u32::try_from(item.quantity).ok().filter(|q| *q >= 1)?;
    let unit_price = convert_price(item.price)?;

    Some(CartEntry {
        id: item.id.to_string(),
        item: item_ref,
        title: item.title,
        unit_price,
        quantity,
        image_url: item.image_url,
        category: item.category,
        remote_id: Some(CartItemId::new(item.id)),
        provenance: Provenance::Synced,
    })
}

/// Convert a catalog record from the collection identified by `kind`.
pub fn convert_catalog_record(kind: ItemKind, record: RemoteCatalogRecord) -> Option<CatalogItem> {
    Some(CatalogItem {
        item: ItemRef::from_kind(kind, record.id),
        title: record.title,
        price: convert_price(record.price)?,
        image_url: record.image_url,
        category: record.category,
        active: record.is_active,
    })
}
