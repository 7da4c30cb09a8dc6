use crate::error::{ClientError, Result};
use crate::movie::MovieId;
use crate::user::FavoriteSet;
use std::collections::HashMap;

/// Display state of one movie's favorite membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FavoriteState {
    IdleFavorite,
    IdleNotFavorite,
    /// Optimistically marked, add-favorite in flight
    PendingAdd,
    /// Optimistically unmarked, remove-favorite in flight
    PendingRemove,
}

impl FavoriteState {
    pub fn is_pending(self) -> bool {
        matches!(self, Self::PendingAdd | Self::PendingRemove)
    }

    /// Whether the movie should currently be displayed as a favorite.
    pub fn shows_favorite(self) -> bool {
        matches!(self, Self::IdleFavorite | Self::PendingAdd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ToggleIntent {
    Add,
    Remove,
}

/// Handle for an in-flight toggle, returned by [`FavoriteLedger::begin`].
///
/// The ticket ties a completion to the exact toggle that started it, so a
/// late completion can never settle a newer toggle on the same movie or a
/// toggle made after the ledger was reset for another session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToggle {
    pub movie_id: MovieId,
    pub intent: ToggleIntent,
    ticket: u64,
}

/// Optimistic working copy of a user's favorite set.
///
/// Pure bookkeeping: no I/O, every transition is a method call. The
/// `FavoritesSynchronizer` drives it around the network calls.
#[derive(Debug, Default)]
pub struct FavoriteLedger {
    favorites: FavoriteSet,
    pending: HashMap<MovieId, (ToggleIntent, u64)>,
    next_ticket: u64,
}

impl FavoriteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_favorites(favorites: FavoriteSet) -> Self {
        Self {
            favorites,
            ..Self::default()
        }
    }

    pub fn state(&self, movie_id: &str) -> FavoriteState {
        match self.pending.get(movie_id) {
            Some((ToggleIntent::Add, _)) => FavoriteState::PendingAdd,
            Some((ToggleIntent::Remove, _)) => FavoriteState::PendingRemove,
            None if self.favorites.contains(movie_id) => FavoriteState::IdleFavorite,
            None => FavoriteState::IdleNotFavorite,
        }
    }

    /// Working-copy membership, optimistic marks included.
    pub fn is_favorite(&self, movie_id: &str) -> bool {
        self.favorites.contains(movie_id)
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Starts a toggle and applies the optimistic mark.
    ///
    /// # Errors
    ///
    /// Returns `ToggleInProgress` if the movie already has a toggle in flight.
    pub fn begin(&mut self, movie_id: &str) -> Result<PendingToggle> {
        if self.state(movie_id).is_pending() {
            return Err(ClientError::toggle_in_progress(movie_id));
        }

        let intent = if self.favorites.contains(movie_id) {
            self.favorites.remove(movie_id);
            ToggleIntent::Remove
        } else {
            self.favorites.insert(movie_id.to_string());
            ToggleIntent::Add
        };

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending.insert(movie_id.to_string(), (intent, ticket));

        Ok(PendingToggle {
            movie_id: movie_id.to_string(),
            intent,
            ticket,
        })
    }

    /// Settles a successful toggle with the membership `server` reports for
    /// the toggled movie.
    ///
    /// Only that movie changes: `server` may be older than completions that
    /// already settled other movies. Returns `false` if the toggle is stale
    /// and nothing was applied.
    pub fn confirm(&mut self, toggle: &PendingToggle, server: &FavoriteSet) -> bool {
        if !self.owns(toggle) {
            return false;
        }
        self.pending.remove(&toggle.movie_id);
        if server.contains(&toggle.movie_id) {
            self.favorites.insert(toggle.movie_id.clone());
        } else {
            self.favorites.remove(&toggle.movie_id);
        }
        true
    }

    /// Reverts the optimistic mark of a failed toggle.
    ///
    /// Returns `false` if the toggle is stale and nothing was reverted.
    pub fn rollback(&mut self, toggle: &PendingToggle) -> bool {
        if !self.owns(toggle) {
            return false;
        }
        self.pending.remove(&toggle.movie_id);
        match toggle.intent {
            ToggleIntent::Add => {
                self.favorites.remove(&toggle.movie_id);
            }
            ToggleIntent::Remove => {
                self.favorites.insert(toggle.movie_id.clone());
            }
        }
        true
    }

    /// Replaces settled membership with `server`, keeping pending marks.
    pub fn reconcile(&mut self, server: &FavoriteSet) {
        let mut favorites = server.clone();
        for (movie_id, (intent, _)) in &self.pending {
            match intent {
                ToggleIntent::Add => {
                    favorites.insert(movie_id.clone());
                }
                ToggleIntent::Remove => {
                    favorites.remove(movie_id);
                }
            }
        }
        self.favorites = favorites;
    }

    /// Starts over for a new session. In-flight toggles become stale.
    pub fn reset(&mut self, favorites: FavoriteSet) {
        self.pending.clear();
        self.favorites = favorites;
    }

    fn owns(&self, toggle: &PendingToggle) -> bool {
        matches!(self.pending.get(&toggle.movie_id), Some((_, ticket)) if *ticket == toggle.ticket)
    }
}
