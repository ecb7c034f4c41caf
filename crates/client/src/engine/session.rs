//! Session transitions: login, registration, restore, logout.
//!
//! Remote is authoritative for favorites on session start: the in-memory
//! list is replaced wholesale from the server. The cart deliberately crosses
//! the login boundary untouched - it belongs to the device, not the account,
//! and is never re-fetched from remote.

use secrecy::SecretString;
use tracing::{info, instrument, warn};

use vitrine_core::Email;

use crate::error::Result;
use crate::models::{FavoriteEntry, User};
use crate::store::keys;

use super::Storefront;

impl Storefront {
    /// Authenticate and start a session.
    ///
    /// # Errors
    ///
    /// Returns an email validation error before any remote call, or the API
    /// error when authentication fails. Unlike cart mutations there is no
    /// local fallback: a session either exists remotely or not at all.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: SecretString) -> Result<User> {
        let email = Email::parse(email)?;
        let user = self.api.authenticate(&email, &password).await?;
        info!(user_id = %user.id, "Signed in");

        self.start_session(user.clone()).await;
        Ok(user)
    }

    /// Register a new account and start a session.
    ///
    /// # Errors
    ///
    /// Returns an email validation error before any remote call, or the API
    /// error when registration fails.
    #[instrument(skip(self, password))]
    pub async fn register(&mut self, email: &str, password: SecretString, name: &str) -> Result<User> {
        let email = Email::parse(email)?;
        let user = self.api.register(&email, &password, name).await?;
        info!(user_id = %user.id, "Registered");

        self.start_session(user.clone()).await;
        Ok(user)
    }

    /// Refresh state for a session restored from persistence.
    ///
    /// [`open`](Self::open) already loaded the persisted user and favorites
    /// snapshot; this replaces the snapshot with the remote list when a
    /// session is present. Without a session it does nothing.
    #[instrument(skip(self))]
    pub async fn restore(&mut self) {
        if self.session.is_some() {
            self.reload_favorites().await;
        }
    }

    /// End the session.
    ///
    /// Clears the user and favorites from memory and the store. The device's
    /// cart entries stay, whatever their provenance.
    #[instrument(skip(self))]
    pub fn logout(&mut self) {
        self.session = None;
        self.favorites.clear();
        self.store.remove(keys::USER);
        self.store.remove(keys::FAVORITES);
        info!("Signed out");
    }

    async fn start_session(&mut self, user: User) {
        self.session = Some(user);
        self.persist_session();
        self.reload_favorites().await;
    }

    /// Replace in-memory favorites from the remote, which is authoritative
    /// on login. When the load fails, fall back to the persisted snapshot
    /// filtered to this user rather than presenting an empty list.
    async fn reload_favorites(&mut self) {
        let Some(user_id) = self.session_user_id() else {
            return;
        };

        match self.api.favorites_for_user(user_id).await {
            Ok(favorites) => self.favorites = favorites,
            Err(e) => {
                warn!(error = %e, "Failed to load favorites, keeping persisted snapshot");
                let snapshot: Vec<FavoriteEntry> = self.store.load(keys::FAVORITES);
                self.favorites = snapshot
                    .into_iter()
                    .filter(|entry| entry.user_id == user_id)
                    .collect();
            }
        }
        self.persist_favorites();
    }
}
