//! Cart synchronization against a live (mock) remote.
//!
//! These cover the happy path the unit tests cannot: the remote answers, so
//! entries adopt server-assigned record ids and `Synced` provenance.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use vitrine_core::{ItemKind, ItemRef, Provenance};
use vitrine_integration_tests::TestContext;

#[tokio::test]
async fn test_authenticated_add_adopts_canonical_record() {
    let ctx = TestContext::new().await;
    let user_id = ctx.api.seed_user("shopper@example.com", "secret", "Shopper");
    ctx.api.seed_catalog(ItemKind::Product, 5, "Teapot", 12.5);

    let mut shop = ctx.storefront();
    shop.login("shopper@example.com", SecretString::from("secret"))
        .await
        .unwrap();
    shop.refresh_catalog(Default::default(), true).await;

    let item = shop
        .find_in_snapshot(ItemRef::from_kind(ItemKind::Product, 5))
        .unwrap();
    let applied = shop.add_to_cart(&item, 2).await.unwrap();

    assert_eq!(applied.provenance, Provenance::Synced);
    assert!(applied.notice.is_none());
    let entries = shop.cart_entries();
    assert_eq!(entries.len(), 1);
    assert!(entries.first().unwrap().remote_id.is_some());
    assert_eq!(ctx.api.cart_items_for(user_id), 1);

    // A fresh tab over the same data directory sees the same cart.
    let reopened = ctx.storefront();
    assert_eq!(reopened.cart_units(), 2);
    assert_eq!(
        reopened.cart_entries().first().unwrap().provenance,
        Provenance::Synced
    );
}

#[tokio::test]
async fn test_quantity_update_and_removal_sync() {
    let ctx = TestContext::new().await;
    let user_id = ctx.api.seed_user("shopper@example.com", "secret", "Shopper");
    ctx.api.seed_catalog(ItemKind::MarketListing, 3, "Lamp", 30.0);

    let mut shop = ctx.storefront();
    shop.login("shopper@example.com", SecretString::from("secret"))
        .await
        .unwrap();
    shop.refresh_catalog(Default::default(), true).await;

    let item_ref = ItemRef::from_kind(ItemKind::MarketListing, 3);
    let item = shop.find_in_snapshot(item_ref).unwrap();
    shop.add_to_cart(&item, 1).await.unwrap();

    let applied = shop.set_cart_quantity(item_ref, 5).await.unwrap();
    assert_eq!(applied.provenance, Provenance::Synced);
    assert_eq!(shop.cart_units(), 5);

    let applied = shop.remove_from_cart(item_ref).await.unwrap();
    assert_eq!(applied.provenance, Provenance::Synced);
    assert_eq!(shop.cart_count(), 0);
    assert_eq!(ctx.api.cart_items_for(user_id), 0);
}

#[tokio::test]
async fn test_clear_cart_clears_remote_records() {
    let ctx = TestContext::new().await;
    let user_id = ctx.api.seed_user("shopper@example.com", "secret", "Shopper");
    ctx.api.seed_catalog(ItemKind::Product, 1, "A", 10.0);
    ctx.api.seed_catalog(ItemKind::AuthorListing, 2, "B", 20.0);

    let mut shop = ctx.storefront();
    shop.login("shopper@example.com", SecretString::from("secret"))
        .await
        .unwrap();
    shop.refresh_catalog(Default::default(), true).await;

    for item_ref in [
        ItemRef::from_kind(ItemKind::Product, 1),
        ItemRef::from_kind(ItemKind::AuthorListing, 2),
    ] {
        let item = shop.find_in_snapshot(item_ref).unwrap();
        shop.add_to_cart(&item, 1).await.unwrap();
    }
    assert_eq!(ctx.api.cart_items_for(user_id), 2);

    let applied = shop.clear_cart().await.unwrap();
    assert_eq!(applied.provenance, Provenance::Synced);
    assert_eq!(shop.cart_count(), 0);
    assert_eq!(ctx.api.cart_items_for(user_id), 0);
}

#[tokio::test]
async fn test_anonymous_cart_survives_login() {
    let ctx = TestContext::new().await;
    ctx.api.seed_user("shopper@example.com", "secret", "Shopper");
    ctx.api.seed_catalog(ItemKind::Product, 5, "Teapot", 12.5);

    let mut shop = ctx.storefront();
    shop.refresh_catalog(Default::default(), true).await;
    let item = shop
        .find_in_snapshot(ItemRef::from_kind(ItemKind::Product, 5))
        .unwrap();

    // Added before signing in: a local-only entry.
    let applied = shop.add_to_cart(&item, 3).await.unwrap();
    assert_eq!(applied.provenance, Provenance::LocalOnly);

    shop.login("shopper@example.com", SecretString::from("secret"))
        .await
        .unwrap();

    // Signing in does not touch existing cart entries.
    assert_eq!(shop.cart_units(), 3);
    assert_eq!(
        shop.cart_entries().first().unwrap().provenance,
        Provenance::LocalOnly
    );
}
