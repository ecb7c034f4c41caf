//! Integration tests for Vitrine.
//!
//! The tests run a [`MockApi`] - an in-process axum server speaking the
//! remote storefront's REST dialect over in-memory state - and drive a real
//! [`Storefront`] against it over loopback HTTP. No external services are
//! required.
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! [`MockApi::shutdown`] kills the listener mid-test, which is how the
//! degraded-mode tests simulate an outage: subsequent requests fail with a
//! connection error, exactly like a server going away under a browser tab.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tempfile::TempDir;

use vitrine_client::Storefront;
use vitrine_client::config::ClientConfig;
use vitrine_core::ItemKind;

// =============================================================================
// In-memory records (the mock's wire schema)
// =============================================================================

/// A catalog record as the remote serves it.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogRecord {
    pub id: i32,
    pub title: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
struct UserRecord {
    id: i32,
    email: String,
    name: String,
    role_id: Option<i32>,
    #[serde(skip)]
    password: String,
}

#[derive(Debug, Clone, Serialize)]
struct FavoriteRecord {
    id: i32,
    user_id: i32,
    product_id: Option<i32>,
    listing_id: Option<i32>,
    author_listing_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
struct CartRecord {
    id: i32,
    #[serde(skip)]
    user_id: i32,
    item_type: String,
    product_id: Option<i32>,
    listing_id: Option<i32>,
    author_listing_id: Option<i32>,
    quantity: i64,
    price: f64,
    title: String,
    image_url: Option<String>,
    category: Option<String>,
}

/// Everything the mock server knows, behind one lock.
#[derive(Debug, Default)]
pub struct MockState {
    users: Vec<UserRecord>,
    products: Vec<CatalogRecord>,
    listings: Vec<CatalogRecord>,
    author_listings: Vec<CatalogRecord>,
    favorites: Vec<FavoriteRecord>,
    cart_items: Vec<CartRecord>,
    next_id: i32,
    down: bool,
}

impl MockState {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

type Shared = Arc<Mutex<MockState>>;

// =============================================================================
// MockApi
// =============================================================================

/// An in-process mock of the remote storefront API.
pub struct MockApi {
    addr: SocketAddr,
    state: Shared,
    server: tokio::task::JoinHandle<()>,
}

impl MockApi {
    /// Bind a fresh server on an ephemeral loopback port.
    pub async fn spawn() -> Self {
        let state: Shared = Arc::default();
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener addr");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock API");
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL clients should point at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Take the server down. New connections are refused and requests on
    /// already-pooled connections answer 503, so every client call from
    /// here on fails, simulating an outage.
    pub fn shutdown(&self) {
        self.lock().down = true;
        self.server.abort();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock")
    }

    // -------------------------------------------------------------------------
    // Seeding and inspection
    // -------------------------------------------------------------------------

    /// Register a user directly in the mock, returning its id.
    pub fn seed_user(&self, email: &str, password: &str, name: &str) -> i32 {
        let mut state = self.lock();
        let id = state.next_id();
        state.users.push(UserRecord {
            id,
            email: email.to_string(),
            name: name.to_string(),
            role_id: Some(2),
            password: password.to_string(),
        });
        id
    }

    /// Add a catalog record to the collection for `kind`.
    pub fn seed_catalog(&self, kind: ItemKind, id: i32, title: &str, price: f64) {
        let record = CatalogRecord {
            id,
            title: title.to_string(),
            price,
            image_url: None,
            category: None,
            is_active: true,
        };
        let mut state = self.lock();
        match kind {
            ItemKind::Product => state.products.push(record),
            ItemKind::MarketListing => state.listings.push(record),
            ItemKind::AuthorListing => state.author_listings.push(record),
        }
    }

    /// Create a favorite record directly, as another device would have.
    pub fn seed_favorite(&self, user_id: i32, kind: ItemKind, item_id: i32) {
        let mut state = self.lock();
        let id = state.next_id();
        let (product_id, listing_id, author_listing_id) = match kind {
            ItemKind::Product => (Some(item_id), None, None),
            ItemKind::MarketListing => (None, Some(item_id), None),
            ItemKind::AuthorListing => (None, None, Some(item_id)),
        };
        state.favorites.push(FavoriteRecord {
            id,
            user_id,
            product_id,
            listing_id,
            author_listing_id,
        });
    }

    /// Number of cart item records held for `user_id`.
    #[must_use]
    pub fn cart_items_for(&self, user_id: i32) -> usize {
        self.lock()
            .cart_items
            .iter()
            .filter(|item| item.user_id == user_id)
            .count()
    }

    /// Number of favorite records held for `user_id`.
    #[must_use]
    pub fn favorites_for(&self, user_id: i32) -> usize {
        self.lock()
            .favorites
            .iter()
            .filter(|favorite| favorite.user_id == user_id)
            .count()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// TestContext
// =============================================================================

/// A mock server plus a private data directory, bundled for one test.
pub struct TestContext {
    pub api: MockApi,
    pub dir: TempDir,
}

impl TestContext {
    /// Spawn a mock server and allocate a data directory.
    pub async fn new() -> Self {
        Self {
            api: MockApi::spawn().await,
            dir: tempfile::tempdir().expect("create test data dir"),
        }
    }

    /// Open a storefront against the mock, as one browser tab would.
    #[must_use]
    pub fn storefront(&self) -> Storefront {
        let config = ClientConfig::for_endpoint(&self.api.base_url(), self.dir.path())
            .expect("test endpoint config");
        Storefront::open(&config)
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/users/authenticate", post(authenticate))
        .route("/users/", post(register))
        .route("/roles/", get(roles))
        .route("/products/", get(list_products))
        .route("/listings/", get(list_listings))
        .route("/author-listings/", get(list_author_listings))
        .route("/favorites/", get(list_favorites).post(create_favorite))
        .route("/favorites/{id}", delete(delete_favorite))
        .route("/carts/my/items/", post(create_cart_item))
        .route(
            "/carts/my/items/{id}",
            put(update_cart_item).delete(delete_cart_item),
        )
        .route("/carts/my/clear", delete(clear_cart))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            refuse_when_down,
        ))
        .with_state(state)
}

/// Answer 503 on every route once [`MockApi::shutdown`] has run. Connections
/// pooled before the shutdown stay open, so the accept-loop abort alone is
/// not enough to simulate an outage.
async fn refuse_when_down(
    State(state): State<Shared>,
    request: Request,
    next: Next,
) -> Response {
    if state.lock().expect("mock state lock").down {
        return error(StatusCode::SERVICE_UNAVAILABLE, "Server is down");
    }
    next.run(request).await
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, axum::Json(json!({ "detail": detail }))).into_response()
}

fn user_id_from(headers: &HeaderMap) -> Option<i32> {
    headers
        .get("X-User-Id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

#[derive(Debug, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn authenticate(
    State(state): State<Shared>,
    Query(credentials): Query<Credentials>,
) -> Response {
    let state = state.lock().expect("mock state lock");
    match state
        .users
        .iter()
        .find(|user| user.email == credentials.email && user.password == credentials.password)
    {
        Some(user) => axum::Json(user.clone()).into_response(),
        None => error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

#[derive(Debug, Deserialize)]
struct NewUser {
    email: String,
    password: String,
    name: String,
    role_id: i32,
}

async fn register(State(state): State<Shared>, axum::Json(new): axum::Json<NewUser>) -> Response {
    let mut state = state.lock().expect("mock state lock");
    if state.users.iter().any(|user| user.email == new.email) {
        return error(StatusCode::CONFLICT, "Email already registered");
    }
    let id = state.next_id();
    let user = UserRecord {
        id,
        email: new.email,
        name: new.name,
        role_id: Some(new.role_id),
        password: new.password,
    };
    state.users.push(user.clone());
    axum::Json(user).into_response()
}

async fn roles() -> Response {
    axum::Json(json!([
        { "id": 1, "name": "admin" },
        { "id": 2, "name": "user" },
    ]))
    .into_response()
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    active_only: bool,
}

const fn default_limit() -> usize {
    100
}

fn list_catalog(records: &[CatalogRecord], query: &ListQuery) -> Response {
    let page: Vec<_> = records
        .iter()
        .filter(|record| !query.active_only || record.is_active)
        .skip(query.skip)
        .take(query.limit)
        .cloned()
        .collect();
    axum::Json(page).into_response()
}

async fn list_products(State(state): State<Shared>, Query(query): Query<ListQuery>) -> Response {
    list_catalog(&state.lock().expect("mock state lock").products, &query)
}

async fn list_listings(State(state): State<Shared>, Query(query): Query<ListQuery>) -> Response {
    list_catalog(&state.lock().expect("mock state lock").listings, &query)
}

async fn list_author_listings(
    State(state): State<Shared>,
    Query(query): Query<ListQuery>,
) -> Response {
    list_catalog(
        &state.lock().expect("mock state lock").author_listings,
        &query,
    )
}

#[derive(Debug, Deserialize)]
struct FavoritesQuery {
    user_id: i32,
}

async fn list_favorites(
    State(state): State<Shared>,
    Query(query): Query<FavoritesQuery>,
) -> Response {
    let state = state.lock().expect("mock state lock");
    let favorites: Vec<_> = state
        .favorites
        .iter()
        .filter(|favorite| favorite.user_id == query.user_id)
        .cloned()
        .collect();
    axum::Json(favorites).into_response()
}

#[derive(Debug, Deserialize)]
struct NewFavoritePayload {
    user_id: i32,
    #[serde(default)]
    product_id: Option<i32>,
    #[serde(default)]
    listing_id: Option<i32>,
    #[serde(default)]
    author_listing_id: Option<i32>,
}

async fn create_favorite(
    State(state): State<Shared>,
    axum::Json(new): axum::Json<NewFavoritePayload>,
) -> Response {
    let mut state = state.lock().expect("mock state lock");
    let duplicate = state.favorites.iter().any(|favorite| {
        favorite.user_id == new.user_id
            && favorite.product_id == new.product_id
            && favorite.listing_id == new.listing_id
            && favorite.author_listing_id == new.author_listing_id
    });
    if duplicate {
        return error(StatusCode::CONFLICT, "Already favorited");
    }
    let id = state.next_id();
    let favorite = FavoriteRecord {
        id,
        user_id: new.user_id,
        product_id: new.product_id,
        listing_id: new.listing_id,
        author_listing_id: new.author_listing_id,
    };
    state.favorites.push(favorite.clone());
    axum::Json(favorite).into_response()
}

async fn delete_favorite(State(state): State<Shared>, Path(id): Path<i32>) -> Response {
    let mut state = state.lock().expect("mock state lock");
    let before = state.favorites.len();
    state.favorites.retain(|favorite| favorite.id != id);
    if state.favorites.len() == before {
        return error(StatusCode::NOT_FOUND, "No such favorite");
    }
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Debug, Deserialize)]
struct NewCartItemPayload {
    item_type: String,
    #[serde(default)]
    product_id: Option<i32>,
    #[serde(default)]
    listing_id: Option<i32>,
    #[serde(default)]
    author_listing_id: Option<i32>,
    quantity: i64,
    price: f64,
    title: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

async fn create_cart_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::Json(new): axum::Json<NewCartItemPayload>,
) -> Response {
    let Some(user_id) = user_id_from(&headers) else {
        return error(StatusCode::UNAUTHORIZED, "Missing user header");
    };
    let mut state = state.lock().expect("mock state lock");
    let id = state.next_id();
    let item = CartRecord {
        id,
        user_id,
        item_type: new.item_type,
        product_id: new.product_id,
        listing_id: new.listing_id,
        author_listing_id: new.author_listing_id,
        quantity: new.quantity,
        price: new.price,
        title: new.title,
        image_url: new.image_url,
        category: new.category,
    };
    state.cart_items.push(item.clone());
    axum::Json(item).into_response()
}

#[derive(Debug, Deserialize)]
struct QuantityUpdate {
    quantity: i64,
}

async fn update_cart_item(
    State(state): State<Shared>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    axum::Json(update): axum::Json<QuantityUpdate>,
) -> Response {
    let Some(user_id) = user_id_from(&headers) else {
        return error(StatusCode::UNAUTHORIZED, "Missing user header");
    };
    let mut state = state.lock().expect("mock state lock");
    match state
        .cart_items
        .iter_mut()
        .find(|item| item.id == id && item.user_id == user_id)
    {
        Some(item) => {
            item.quantity = update.quantity;
            axum::Json(item.clone()).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "No such cart item"),
    }
}

async fn delete_cart_item(
    State(state): State<Shared>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    let Some(user_id) = user_id_from(&headers) else {
        return error(StatusCode::UNAUTHORIZED, "Missing user header");
    };
    let mut state = state.lock().expect("mock state lock");
    let before = state.cart_items.len();
    state
        .cart_items
        .retain(|item| !(item.id == id && item.user_id == user_id));
    if state.cart_items.len() == before {
        return error(StatusCode::NOT_FOUND, "No such cart item");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn clear_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let Some(user_id) = user_id_from(&headers) else {
        return error(StatusCode::UNAUTHORIZED, "Missing user header");
    };
    let mut state = state.lock().expect("mock state lock");
    state.cart_items.retain(|item| item.user_id != user_id);
    StatusCode::NO_CONTENT.into_response()
}
