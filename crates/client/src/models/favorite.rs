//! Favorite entry domain type.

use serde::{Deserialize, Serialize};

use vitrine_core::{FavoriteId, ItemRef, UserId};

/// A favorited item.
///
/// Favorites always mirror a remote record: there is no anonymous or
/// local-only favorite, so the remote id is mandatory. At most one entry
/// exists per (user, item) pair; the engine treats duplicate adds as
/// idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Server-assigned record id.
    pub id: FavoriteId,
    /// Owning user.
    pub user_id: UserId,
    /// The favorited item.
    pub item: ItemRef,
}
