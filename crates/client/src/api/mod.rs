//! Remote storefront API client.
//!
//! # Architecture
//!
//! - Plain REST/JSON over `reqwest`; one method per (entity, verb) pair
//! - Stateless: the adapter owns no cart/favorites state, it only translates
//!   between the wire schema and domain types
//! - No retries and no extra timeouts - callers treat a failure as terminal
//!   for that attempt and fall back to local state
//! - Catalog reads for the default page are cached in-process via `moka`
//!   (5-minute TTL); mutable cart/favorite state is never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_client::api::{ApiClient, Page};
//!
//! let api = ApiClient::new(&config);
//! let products = api.products(Page::default(), true).await?;
//! let favorite = api.add_favorite(user_id, products[0].item).await?;
//! ```

pub(crate) mod conversions;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use vitrine_core::{CartItemId, Email, FavoriteId, ItemKind, ItemRef, UserId};

use crate::config::ClientConfig;
use crate::models::{CartEntry, CatalogItem, FavoriteEntry, User};

use conversions::{convert_cart_item, convert_catalog_record, convert_favorite, convert_user};
use types::{
    CartItemQuantityUpdate, ErrorBody, NewCartItem, NewFavorite, RegisterRequest, RemoteCartItem,
    RemoteCatalogRecord, RemoteFavorite, RemoteRole, RemoteUser, split_item,
};

/// Header carrying the authenticated user id on cart endpoints.
const USER_ID_HEADER: &str = "X-User-Id";

/// Fallback role id when `GET /roles/` is unavailable at registration time.
const DEFAULT_ROLE_ID: i32 = 2;

/// Message used when an error body is missing or malformed.
const GENERIC_ERROR: &str = "request failed";

const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300);
const CATALOG_CACHE_CAPACITY: u64 = 64;

/// Errors that can occur when talking to the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (network down, connection refused, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The success body did not parse as the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The body parsed but violates a domain invariant.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Remote answered 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote answered 409. For favorites this means "already favorited" and
    /// callers treat it as success-equivalent.
    #[error("Already exists")]
    AlreadyExists,

    /// Remote rejected the request with some other non-2xx status.
    #[error("Rejected by remote ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Pagination window for collection reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Records to skip.
    pub skip: u32,
    /// Maximum records to return.
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
        }
    }
}

impl Page {
    /// Whether this is the default window (the only one worth caching).
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the remote storefront REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    catalog_cache: Cache<String, Vec<CatalogItem>>,
}

impl ApiClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let catalog_cache = Cache::builder()
            .max_capacity(CATALOG_CACHE_CAPACITY)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                catalog_cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Send a request, map the status taxonomy, and parse the success body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = check_status(request.send().await?).await?;
        let text = response.text().await?;

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %text.chars().take(500).collect::<String>(),
                    "Failed to parse remote API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    /// Send a request where only the status matters.
    async fn execute_unit(&self, request: reqwest::RequestBuilder) -> Result<(), ApiError> {
        check_status(request.send().await?).await.map(|_| ())
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Authenticate with email and password.
    ///
    /// The server takes credentials as query parameters on a POST.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status (invalid
    /// credentials surface as `Rejected`).
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn authenticate(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<User, ApiError> {
        let remote: RemoteUser = self
            .execute(
                self.inner
                    .client
                    .post(self.url("/users/authenticate"))
                    .query(&[("email", email.as_str()), ("password", password.expose_secret())]),
            )
            .await?;

        convert_user(remote).map_err(|e| ApiError::Malformed(format!("user record: {e}")))
    }

    /// Register a new user with the default storefront role.
    ///
    /// The default role id is resolved from `GET /roles/` (role named `user`
    /// or `client`); when that lookup fails a fixed fallback id is used.
    ///
    /// # Errors
    ///
    /// Returns an error if registration itself fails; the role lookup is
    /// best-effort and never fails the operation.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        email: &Email,
        password: &SecretString,
        name: &str,
    ) -> Result<User, ApiError> {
        let role_id = self.default_role_id().await;
        let payload = RegisterRequest {
            email: email.to_string(),
            password: password.expose_secret().to_string(),
            name: name.to_string(),
            role_id,
        };

        let remote: RemoteUser = self
            .execute(self.inner.client.post(self.url("/users/")).json(&payload))
            .await?;

        convert_user(remote).map_err(|e| ApiError::Malformed(format!("user record: {e}")))
    }

    async fn default_role_id(&self) -> i32 {
        let roles: Result<Vec<RemoteRole>, ApiError> = self
            .execute(self.inner.client.get(self.url("/roles/")))
            .await;

        match roles {
            Ok(roles) => roles
                .iter()
                .find(|role| {
                    let name = role.name.to_lowercase();
                    name == "user" || name == "client"
                })
                .map_or(DEFAULT_ROLE_ID, |role| role.id),
            Err(e) => {
                warn!(error = %e, fallback = DEFAULT_ROLE_ID, "Failed to resolve default role");
                DEFAULT_ROLE_ID
            }
        }
    }

    // =========================================================================
    // Catalog (cached for the default page)
    // =========================================================================

    /// List products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        page: Page,
        active_only: bool,
    ) -> Result<Vec<CatalogItem>, ApiError> {
        self.catalog_list(ItemKind::Product, "/products/", page, active_only)
            .await
    }

    /// List market listings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn market_listings(
        &self,
        page: Page,
        active_only: bool,
    ) -> Result<Vec<CatalogItem>, ApiError> {
        self.catalog_list(ItemKind::MarketListing, "/listings/", page, active_only)
            .await
    }

    /// List author listings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn author_listings(
        &self,
        page: Page,
        active_only: bool,
    ) -> Result<Vec<CatalogItem>, ApiError> {
        self.catalog_list(ItemKind::AuthorListing, "/author-listings/", page, active_only)
            .await
    }

    async fn catalog_list(
        &self,
        kind: ItemKind,
        path: &str,
        page: Page,
        active_only: bool,
    ) -> Result<Vec<CatalogItem>, ApiError> {
        let cache_key = format!("{path}:{}:{}:{active_only}", page.skip, page.limit);

        // Check cache (only for the default window)
        if page.is_default()
            && let Some(items) = self.inner.catalog_cache.get(&cache_key).await
        {
            debug!(path, "Cache hit for catalog list");
            return Ok(items);
        }

        let records: Vec<RemoteCatalogRecord> = self
            .execute(
                self.inner
                    .client
                    .get(self.url(path))
                    .query(&[("skip", page.skip), ("limit", page.limit)])
                    .query(&[("active_only", active_only)]),
            )
            .await?;

        let items: Vec<CatalogItem> = records
            .into_iter()
            .filter_map(|record| convert_catalog_record(kind, record))
            .collect();

        if page.is_default() {
            self.inner.catalog_cache.insert(cache_key, items.clone()).await;
        }

        Ok(items)
    }

    /// Drop all cached catalog reads.
    pub async fn invalidate_catalog_cache(&self) {
        self.inner.catalog_cache.invalidate_all();
        self.inner.catalog_cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Favorites (not cached - mutable state)
    // =========================================================================

    /// List all favorites owned by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn favorites_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<FavoriteEntry>, ApiError> {
        let records: Vec<RemoteFavorite> = self
            .execute(
                self.inner
                    .client
                    .get(self.url("/favorites/"))
                    .query(&[("user_id", user_id.as_i32())]),
            )
            .await?;

        Ok(records.into_iter().filter_map(convert_favorite).collect())
    }

    /// Create a favorite record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AlreadyExists`] when the (user, item) pair is
    /// already favorited; callers treat that as success-equivalent.
    #[instrument(skip(self), fields(user_id = %user_id, item = %item))]
    pub async fn add_favorite(
        &self,
        user_id: UserId,
        item: ItemRef,
    ) -> Result<FavoriteEntry, ApiError> {
        let payload = NewFavorite::for_item(user_id.as_i32(), item);
        let record: RemoteFavorite = self
            .execute(self.inner.client.post(self.url("/favorites/")).json(&payload))
            .await?;

        convert_favorite(record)
            .ok_or_else(|| ApiError::Malformed("favorite record without item reference".into()))
    }

    /// Delete a favorite record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove_favorite(&self, id: FavoriteId) -> Result<(), ApiError> {
        self.execute_unit(
            self.inner
                .client
                .delete(self.url(&format!("/favorites/{id}"))),
        )
        .await
    }

    // =========================================================================
    // Cart (not cached - mutable state)
    // =========================================================================

    /// Create a cart item record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the returned record is
    /// malformed.
    #[instrument(skip(self, item), fields(user_id = %user_id, item = %item.item))]
    pub async fn add_cart_item(
        &self,
        user_id: UserId,
        item: &CatalogItem,
        quantity: u32,
    ) -> Result<CartEntry, ApiError> {
        use rust_decimal::prelude::ToPrimitive;

        let (product_id, listing_id, author_listing_id) = split_item(item.item);
        let payload = NewCartItem {
            item_type: item.item.kind(),
            product_id,
            listing_id,
            author_listing_id,
            quantity,
            price: item.price.amount.to_f64().unwrap_or_default(),
            title: item.title.clone(),
            image_url: item.image_url.clone(),
            category: item.category.clone(),
        };

        let record: RemoteCartItem = self
            .execute(
                self.inner
                    .client
                    .post(self.url("/carts/my/items/"))
                    .header(USER_ID_HEADER, user_id.as_i32())
                    .json(&payload),
            )
            .await?;

        convert_cart_item(record)
            .ok_or_else(|| ApiError::Malformed("cart record failed validation".into()))
    }

    /// Update the quantity of a cart item record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the returned record is
    /// malformed.
    #[instrument(skip(self), fields(user_id = %user_id, id = %id))]
    pub async fn update_cart_item_quantity(
        &self,
        user_id: UserId,
        id: CartItemId,
        quantity: u32,
    ) -> Result<CartEntry, ApiError> {
        let record: RemoteCartItem = self
            .execute(
                self.inner
                    .client
                    .put(self.url(&format!("/carts/my/items/{id}")))
                    .header(USER_ID_HEADER, user_id.as_i32())
                    .json(&CartItemQuantityUpdate { quantity }),
            )
            .await?;

        convert_cart_item(record)
            .ok_or_else(|| ApiError::Malformed("cart record failed validation".into()))
    }

    /// Delete a cart item record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id, id = %id))]
    pub async fn remove_cart_item(&self, user_id: UserId, id: CartItemId) -> Result<(), ApiError> {
        self.execute_unit(
            self.inner
                .client
                .delete(self.url(&format!("/carts/my/items/{id}")))
                .header(USER_ID_HEADER, user_id.as_i32()),
        )
        .await
    }

    /// Delete every cart item record for the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn clear_cart(&self, user_id: UserId) -> Result<(), ApiError> {
        self.execute_unit(
            self.inner
                .client
                .delete(self.url("/carts/my/clear"))
                .header(USER_ID_HEADER, user_id.as_i32()),
        )
        .await
    }
}

/// Map a response status onto the error taxonomy.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::CONFLICT {
        return Err(ApiError::AlreadyExists);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .unwrap_or_default()
        .detail
        .unwrap_or_else(|| GENERIC_ERROR.to_string());

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(message));
    }

    tracing::error!(
        status = %status,
        body = %body.chars().take(500).collect::<String>(),
        "Remote API returned non-success status"
    );
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}
