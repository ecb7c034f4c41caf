//! Provenance and data-source flags.
//!
//! Every locally held record carries a [`Provenance`] tag so callers can tell
//! a server-confirmed entry from one that only exists on this device. Catalog
//! reads carry a [`DataSource`] tag instead of silently substituting stale
//! data.

use serde::{Deserialize, Serialize};

/// Where a cart entry stands relative to the remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Confirmed by the server; the entry mirrors the canonical record.
    Synced,
    /// Intentionally local: created without a session, never sent remote.
    #[default]
    LocalOnly,
    /// A remote call failed; the entry preserves the user's action but is
    /// not yet reflected server-side.
    Fallback,
}

impl Provenance {
    /// Whether the entry mirrors a server-confirmed record.
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        matches!(self, Self::Synced)
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Synced => write!(f, "synced"),
            Self::LocalOnly => write!(f, "local_only"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Origin of a catalog read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Fetched from the remote API just now.
    Live,
    /// Served from the last persisted snapshot because the fetch failed.
    Snapshot,
}

impl DataSource {
    /// Whether this read is degraded.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Snapshot)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_serde() {
        assert_eq!(
            serde_json::to_string(&Provenance::Fallback).unwrap(),
            "\"fallback\""
        );
        let p: Provenance = serde_json::from_str("\"local_only\"").unwrap();
        assert_eq!(p, Provenance::LocalOnly);
    }

    #[test]
    fn test_is_synced() {
        assert!(Provenance::Synced.is_synced());
        assert!(!Provenance::Fallback.is_synced());
    }

    #[test]
    fn test_snapshot_is_degraded() {
        assert!(DataSource::Snapshot.is_degraded());
        assert!(!DataSource::Live.is_degraded());
    }
}
