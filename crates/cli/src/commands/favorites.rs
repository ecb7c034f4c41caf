//! Favorites commands. All of these require a session.

use vitrine_client::{EngineError, Storefront};
use vitrine_core::{ItemKind, ItemRef};

use super::report;

/// Favorite an item.
pub async fn add(shop: &mut Storefront, kind: ItemKind, id: i32) -> Result<(), EngineError> {
    let item = ItemRef::from_kind(kind, id);
    let applied = shop.add_favorite(item).await?;
    report(&format!("Favorited {item}"), &applied);
    Ok(())
}

/// Unfavorite an item.
pub async fn remove(shop: &mut Storefront, kind: ItemKind, id: i32) -> Result<(), EngineError> {
    let item = ItemRef::from_kind(kind, id);
    let applied = shop.remove_favorite(item).await?;
    report(&format!("Unfavorited {item}"), &applied);
    Ok(())
}

/// Print the favorites list, annotated from the catalog snapshot when the
/// referenced item is present in it.
#[allow(clippy::print_stdout)]
pub fn list(shop: &Storefront) {
    let favorites = shop.favorites();
    if favorites.is_empty() {
        println!("No favorites.");
        return;
    }
    for favorite in favorites {
        match shop.find_in_snapshot(favorite.item) {
            Some(item) => println!("{:<30} {:>10}  {}", item.title, item.price.display(), favorite.item),
            None => println!("{}", favorite.item),
        }
    }
}
