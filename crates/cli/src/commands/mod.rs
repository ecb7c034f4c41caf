//! Command implementations.

pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod session;

use tracing::{info, warn};

use vitrine_client::engine::Applied;

/// Report a reconciled mutation outcome to the user.
///
/// Degraded outcomes are surfaced as warnings so the user knows the action
/// landed on this machine only.
fn report(action: &str, applied: &Applied) {
    match &applied.notice {
        Some(notice) => warn!("{action} ({}): {notice}", applied.provenance),
        None => info!("{action} ({})", applied.provenance),
    }
}
