//! Authenticated user domain type.

use serde::{Deserialize, Serialize};

use vitrine_core::{Email, RoleId, UserId};

/// The authenticated storefront user.
///
/// Persisted across page loads; presence of a stored user is what makes the
/// engine take the remote-synced path on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned user id.
    pub id: UserId,
    /// Validated email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Role assigned at registration, if the server reported one.
    pub role_id: Option<RoleId>,
}
