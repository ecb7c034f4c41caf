//! Behavior when the remote goes away mid-session.
//!
//! [`vitrine_integration_tests::MockApi::shutdown`] kills the listener, so
//! every request after it fails with a connection error.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use vitrine_core::{DataSource, ItemKind, ItemRef, Provenance};
use vitrine_integration_tests::TestContext;

#[tokio::test]
async fn test_outage_keeps_cart_action_as_fallback() {
    let ctx = TestContext::new().await;
    ctx.api.seed_user("shopper@example.com", "secret", "Shopper");
    ctx.api.seed_catalog(ItemKind::Product, 5, "Teapot", 12.5);

    let mut shop = ctx.storefront();
    shop.login("shopper@example.com", SecretString::from("secret"))
        .await
        .unwrap();
    shop.refresh_catalog(Default::default(), true).await;
    let item = shop
        .find_in_snapshot(ItemRef::from_kind(ItemKind::Product, 5))
        .unwrap();

    ctx.api.shutdown();

    let applied = shop.add_to_cart(&item, 2).await.unwrap();

    assert_eq!(applied.provenance, Provenance::Fallback);
    assert!(applied.notice.is_some());
    let entries = shop.cart_entries();
    assert_eq!(entries.first().unwrap().quantity, 2);
    assert!(entries.first().unwrap().remote_id.is_none());

    // The fallback entry survives a reopen, still marked as unsynced.
    let reopened = ctx.storefront();
    assert_eq!(
        reopened.cart_entries().first().unwrap().provenance,
        Provenance::Fallback
    );
    assert_eq!(reopened.cart_units(), 2);
}

#[tokio::test]
async fn test_synced_entry_degrades_on_update_during_outage() {
    let ctx = TestContext::new().await;
    ctx.api.seed_user("shopper@example.com", "secret", "Shopper");
    ctx.api.seed_catalog(ItemKind::MarketListing, 3, "Lamp", 30.0);

    let mut shop = ctx.storefront();
    shop.login("shopper@example.com", SecretString::from("secret"))
        .await
        .unwrap();
    shop.refresh_catalog(Default::default(), true).await;

    let item_ref = ItemRef::from_kind(ItemKind::MarketListing, 3);
    let item = shop.find_in_snapshot(item_ref).unwrap();
    let applied = shop.add_to_cart(&item, 1).await.unwrap();
    assert_eq!(applied.provenance, Provenance::Synced);

    ctx.api.shutdown();

    let applied = shop.set_cart_quantity(item_ref, 4).await.unwrap();
    assert_eq!(applied.provenance, Provenance::Fallback);
    assert_eq!(shop.cart_units(), 4);
}

#[tokio::test]
async fn test_catalog_snapshot_serves_offline() {
    let ctx = TestContext::new().await;
    ctx.api.seed_catalog(ItemKind::Product, 1, "Teapot", 12.5);
    ctx.api.seed_catalog(ItemKind::AuthorListing, 2, "Sketch", 40.0);

    let mut shop = ctx.storefront();
    let live = shop.refresh_catalog(Default::default(), true).await;
    assert_eq!(live.source, DataSource::Live);
    assert_eq!(live.items.len(), 2);

    ctx.api.shutdown();

    // A fresh tab cannot reach the remote and falls back to the snapshot
    // the first tab persisted.
    let mut offline = ctx.storefront();
    let view = offline.refresh_catalog(Default::default(), true).await;
    assert_eq!(view.source, DataSource::Snapshot);
    assert!(view.source.is_degraded());
    assert_eq!(view.items.len(), 2);
}

#[tokio::test]
async fn test_unfavorite_during_outage_removes_locally() {
    let ctx = TestContext::new().await;
    ctx.api.seed_user("shopper@example.com", "secret", "Shopper");

    let mut shop = ctx.storefront();
    shop.login("shopper@example.com", SecretString::from("secret"))
        .await
        .unwrap();

    let item = ItemRef::from_kind(ItemKind::Product, 9);
    shop.add_favorite(item).await.unwrap();

    ctx.api.shutdown();

    let applied = shop.remove_favorite(item).await.unwrap();
    assert_eq!(applied.provenance, Provenance::Fallback);
    assert!(!shop.is_favorited(item));
}
