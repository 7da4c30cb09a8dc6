//! Optimistic favorite toggling.

use myflix_core::CatalogApi;
use myflix_core::SessionStore;
use myflix_core::error::{ClientError, Result};
use myflix_core::favorites::{FavoriteLedger, FavoriteState, ToggleIntent};
use myflix_core::movie::Movie;
use myflix_core::user::{FavoriteSet, UserRecord};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Keeps the displayed favorite set in step with the server.
///
/// A toggle marks the movie immediately, then calls the API. Success settles
/// that one movie from the server's answer and records it on the session
/// user; failure reverts the mark. While a toggle is in flight, further
/// toggles on the same movie are rejected. Losing the session drops the
/// working copy.
///
/// The ledger lock is never held across an `.await`.
pub struct FavoritesSynchronizer {
    api: Arc<dyn CatalogApi>,
    session: Arc<SessionStore>,
    ledger: Mutex<FavoriteLedger>,
}

impl FavoritesSynchronizer {
    /// Creates a synchronizer seeded from the session's cached user, if any.
    pub fn new(api: Arc<dyn CatalogApi>, session: Arc<SessionStore>) -> Self {
        let favorites = session
            .user()
            .map(|user| user.favorite_movies)
            .unwrap_or_default();

        Self {
            api,
            session,
            ledger: Mutex::new(FavoriteLedger::from_favorites(favorites)),
        }
    }

    fn ledger(&self) -> MutexGuard<'_, FavoriteLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches the user and starts over from the server's favorite set.
    ///
    /// In-flight toggles are abandoned: their completions no longer touch
    /// the working copy. Used after login and on cold start.
    pub async fn initialize(&self) -> Result<UserRecord> {
        let user = self.fetch_current_user().await?;
        if self.session.update_user(user.clone()) {
            self.ledger().reset(user.favorite_movies.clone());
        }
        Ok(user)
    }

    /// Fetches the user and adopts the server's favorite set, keeping the
    /// marks of toggles that are still in flight.
    pub async fn refresh(&self) -> Result<UserRecord> {
        let user = self.fetch_current_user().await?;
        if self.session.update_user(user.clone()) {
            self.ledger().reconcile(&user.favorite_movies);
        }
        Ok(user)
    }

    async fn fetch_current_user(&self) -> Result<UserRecord> {
        let user_id = self.require_user_id()?;
        let user = self
            .api
            .fetch_user(&user_id)
            .await
            .inspect_err(|_| self.forget_if_logged_out())?
            .without_password();
        tracing::debug!(
            "Fetched {} favorites for user {}",
            user.favorite_movies.len(),
            user_id
        );
        Ok(user)
    }

    /// Flips the favorite membership of `movie`.
    ///
    /// Returns the movie's settled state.
    ///
    /// # Errors
    ///
    /// - `Precondition` when no session is established (no call is made)
    /// - `ToggleInProgress` when this movie already has a toggle in flight
    /// - `Request` when the API call fails; the optimistic mark is reverted
    pub async fn toggle(&self, movie: &Movie) -> Result<FavoriteState> {
        let user_id = self.require_user_id()?;
        let toggle = self.ledger().begin(&movie.id)?;
        tracing::debug!("Favorite {} for movie {}", toggle.intent, movie.id);

        let result = match toggle.intent {
            ToggleIntent::Add => self.api.add_favorite(&user_id, &movie.title).await,
            ToggleIntent::Remove => self.api.remove_favorite(&user_id, &movie.title).await,
        };

        match result {
            Ok(user) => {
                let on_server = user.has_favorite(&movie.id);
                let accepted = self.ledger().confirm(&toggle, &user.favorite_movies);
                if accepted {
                    self.session.set_favorite(&user.id, &movie.id, on_server);
                } else {
                    tracing::debug!("Dropping stale favorite completion for movie {}", movie.id);
                }
                Ok(self.state(&movie.id))
            }
            Err(e) => {
                if self.ledger().rollback(&toggle) {
                    tracing::warn!(
                        "Favorite {} for movie {} failed, reverted: {}",
                        toggle.intent,
                        movie.id,
                        e
                    );
                }
                self.forget_if_logged_out();
                Err(e)
            }
        }
    }

    pub fn state(&self, movie_id: &str) -> FavoriteState {
        self.ledger().state(movie_id)
    }

    /// Whether the movie is currently displayed as a favorite.
    pub fn is_favorite(&self, movie_id: &str) -> bool {
        self.ledger().is_favorite(movie_id)
    }

    /// Snapshot of the working copy, optimistic marks included.
    pub fn favorites(&self) -> FavoriteSet {
        self.ledger().favorites().clone()
    }

    /// Drops all favorites and in-flight toggles (logout).
    pub fn clear(&self) {
        self.ledger().reset(FavoriteSet::new());
    }

    /// Starts over from a known user record without a network call.
    pub(crate) fn reset_from(&self, user: &UserRecord) {
        self.ledger().reset(user.favorite_movies.clone());
    }

    fn require_user_id(&self) -> Result<String> {
        self.session.user_id().ok_or_else(|| {
            self.clear();
            ClientError::precondition("Log in to manage favorite movies")
        })
    }

    /// The gateway ends the session on a rejected token; favorites go with it.
    fn forget_if_logged_out(&self) {
        if !self.session.is_authenticated() {
            tracing::debug!("Session ended, dropping favorites");
            self.clear();
        }
    }
}
