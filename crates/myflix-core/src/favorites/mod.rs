//! Favorite-movie membership and its per-movie state machine.
//!
//! # Module Structure
//!
//! - `ledger`: Pure optimistic-update bookkeeping (`FavoriteLedger`)

mod ledger;

pub use ledger::{FavoriteLedger, FavoriteState, PendingToggle, ToggleIntent};
