//! Catalog listing.

use vitrine_client::Storefront;
use vitrine_client::api::Page;

/// Print the catalog, refreshing from the remote API when reachable.
///
/// When the remote API is unreachable the last persisted snapshot is shown
/// instead, with a banner saying so.
#[allow(clippy::print_stdout)]
pub async fn list(shop: &mut Storefront, skip: u32, limit: u32, active_only: bool) {
    let view = shop.refresh_catalog(Page { skip, limit }, active_only).await;

    if view.source.is_degraded() {
        println!("(offline - showing the last saved catalog snapshot)");
    }
    if view.items.is_empty() {
        println!("No catalog items.");
        return;
    }
    for item in &view.items {
        let marker = if shop.is_favorited(item.item) { "*" } else { " " };
        println!(
            "{marker} {:<30} {:>10}  {}{}",
            item.title,
            item.price.display(),
            item.item,
            if item.active { "" } else { "  (inactive)" },
        );
    }
}
