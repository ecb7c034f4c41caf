//! Cart and checkout commands.
//!
//! `add` resolves the item against the local catalog snapshot first and only
//! refreshes from the remote API on a miss, so a previously browsed catalog
//! keeps the cart usable offline.

use thiserror::Error;
use tracing::info;

use vitrine_client::models::CatalogItem;
use vitrine_client::{EngineError, Storefront};
use vitrine_core::{ItemKind, ItemRef};

use super::report;

/// Errors specific to cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The referenced item is in neither the snapshot nor the live catalog.
    #[error("Item not found in catalog: {0}")]
    ItemNotFound(ItemRef),

    /// Engine-level failure.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Add `quantity` units of an item to the cart.
pub async fn add(
    shop: &mut Storefront,
    kind: ItemKind,
    id: i32,
    quantity: u32,
) -> Result<(), CartCommandError> {
    let item = resolve_item(shop, ItemRef::from_kind(kind, id)).await?;
    let applied = shop.add_to_cart(&item, quantity).await?;
    report(&format!("Added {} x{quantity} to cart", item.title), &applied);
    Ok(())
}

/// Set the quantity of a cart entry. Zero removes it.
pub async fn set_quantity(
    shop: &mut Storefront,
    kind: ItemKind,
    id: i32,
    quantity: u32,
) -> Result<(), CartCommandError> {
    let item = ItemRef::from_kind(kind, id);
    let applied = shop.set_cart_quantity(item, quantity).await?;
    report(&format!("Set {item} to {quantity}"), &applied);
    Ok(())
}

/// Remove a cart entry.
pub async fn remove(
    shop: &mut Storefront,
    kind: ItemKind,
    id: i32,
) -> Result<(), CartCommandError> {
    let item = ItemRef::from_kind(kind, id);
    let applied = shop.remove_from_cart(item).await?;
    report(&format!("Removed {item} from cart"), &applied);
    Ok(())
}

/// Empty the cart.
pub async fn clear(shop: &mut Storefront) -> Result<(), CartCommandError> {
    let applied = shop.clear_cart().await?;
    report("Cleared cart", &applied);
    Ok(())
}

/// Print the cart.
#[allow(clippy::print_stdout)]
pub fn list(shop: &Storefront) {
    let entries = shop.cart_entries();
    if entries.is_empty() {
        println!("Cart is empty.");
        return;
    }
    for entry in &entries {
        println!(
            "{:<30} x{:<4} {:>10}  [{}] {}",
            entry.title,
            entry.quantity,
            entry.line_total().display(),
            entry.provenance,
            entry.item,
        );
    }
    println!(
        "{} item(s), {} unit(s), total {}",
        shop.cart_count(),
        shop.cart_units(),
        shop.cart_total().display(),
    );
}

/// Snapshot the cart into the order history and clear it.
pub async fn checkout(shop: &mut Storefront) -> Result<(), CartCommandError> {
    let order = shop.place_order().await?;
    info!(
        "Order {} placed: {} line(s), total {}",
        order.id,
        order.entries.len(),
        order.total.display(),
    );
    Ok(())
}

/// Print the locally recorded order history.
#[allow(clippy::print_stdout)]
pub fn orders(shop: &Storefront) {
    let history = shop.orders();
    if history.is_empty() {
        println!("No orders recorded.");
        return;
    }
    for order in &history {
        println!(
            "{}  {}  {} line(s)  total {}",
            order.placed_at.format("%Y-%m-%d %H:%M"),
            order.id,
            order.entries.len(),
            order.total.display(),
        );
    }
}

async fn resolve_item(
    shop: &mut Storefront,
    item: ItemRef,
) -> Result<CatalogItem, CartCommandError> {
    if let Some(found) = shop.find_in_snapshot(item) {
        return Ok(found);
    }
    shop.refresh_catalog(vitrine_client::api::Page::default(), true)
        .await;
    shop.find_in_snapshot(item)
        .ok_or(CartCommandError::ItemNotFound(item))
}
