use super::model::Session;
use super::storage::{LocalStorage, TOKEN_KEY, USER_KEY};
use crate::user::UserRecord;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Single source of truth for "is someone logged in, and as whom".
///
/// `SessionStore` keeps the session in memory and writes every change
/// through to a [`LocalStorage`] before returning, so a restart right after
/// any call observes the new state. Readers only ever see the in-memory copy.
///
/// Storage failures are logged and swallowed: the in-memory session stays
/// authoritative for the lifetime of the process.
pub struct SessionStore {
    session: RwLock<Session>,
    storage: Arc<dyn LocalStorage>,
}

impl SessionStore {
    /// Rebuilds the store from durable storage.
    ///
    /// A partial or unreadable stored session is treated as logged out and
    /// wiped from storage.
    pub fn restore(storage: Arc<dyn LocalStorage>) -> Self {
        let session = Self::load(storage.as_ref());

        let store = Self {
            session: RwLock::new(session),
            storage,
        };

        if !store.read().is_authenticated() {
            store.wipe_storage();
        }

        store
    }

    fn load(storage: &dyn LocalStorage) -> Session {
        let token = match storage.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read stored token: {}", e);
                None
            }
        };

        let user = match storage.get_item(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<UserRecord>(&raw) {
                Ok(user) => Some(user.without_password()),
                Err(e) => {
                    tracing::warn!("Discarding unreadable stored user record: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read stored user record: {}", e);
                None
            }
        };

        let session = Session::from_parts(token, user);
        if let Some(user_id) = session.user_id() {
            tracing::debug!("Restored session for user {}", user_id);
        }
        session
    }

    /// Stores a new session, overwriting any prior one.
    pub fn establish(&self, token: impl Into<String>, user: UserRecord) {
        let session = Session::authenticated(token, user.without_password());

        let mut guard = self.write();
        if let Some(auth) = session.auth() {
            // User first: a failed write must not leave the new token next
            // to the previous user's record
            let stored = self.persist_user(&auth.user) && self.persist_token(&auth.token);
            if !stored {
                tracing::warn!("Session for {} kept in memory only", auth.user.username);
                self.wipe_storage();
            }
            tracing::info!("Session established for user {}", auth.user.username);
        }
        *guard = session;
    }

    /// Returns the present session value. Never touches storage.
    pub fn current(&self) -> Session {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token().map(str::to_string)
    }

    pub fn user(&self) -> Option<UserRecord> {
        self.read().user().cloned()
    }

    pub fn user_id(&self) -> Option<String> {
        self.read().user_id().map(str::to_string)
    }

    /// Replaces the cached user record without touching the token.
    ///
    /// No-op when no session is established, or when the record belongs to
    /// a different user than the current session (a completion that arrived
    /// after a logout/login). Returns whether the record was applied.
    pub fn update_user(&self, user: UserRecord) -> bool {
        let user = user.without_password();

        let mut guard = self.write();
        if guard.user_id() != Some(user.id.as_str()) {
            tracing::debug!("Ignoring user update for {}: not the current session", user.id);
            return false;
        }

        self.persist_user(&user);
        guard.replace_user(user)
    }

    /// Sets one movie's membership in the cached user's favorites.
    ///
    /// Same no-op rules as [`update_user`](Self::update_user): nothing
    /// happens unless `user_id` is the current session's user.
    pub fn set_favorite(&self, user_id: &str, movie_id: &str, favorite: bool) -> bool {
        let mut guard = self.write();
        let Some(mut user) = guard.user().filter(|u| u.id == user_id).cloned() else {
            return false;
        };

        let changed = if favorite {
            user.favorite_movies.insert(movie_id.to_string())
        } else {
            user.favorite_movies.remove(movie_id)
        };
        if changed {
            self.persist_user(&user);
            guard.replace_user(user);
        }
        true
    }

    /// Clears the session only if `token` is still the current one.
    ///
    /// A rejection of a token that was already replaced by a newer login
    /// leaves the newer session alone. Returns whether it cleared.
    pub fn clear_if_token(&self, token: &str) -> bool {
        let mut guard = self.write();
        if guard.token() != Some(token) {
            tracing::debug!("Ignoring rejection of a token that is no longer current");
            return false;
        }
        self.wipe_storage();
        *guard = Session::anonymous();
        tracing::info!("Session cleared");
        true
    }

    /// Removes token and user from memory and durable storage.
    pub fn clear(&self) {
        let mut guard = self.write();
        self.wipe_storage();
        if guard.is_authenticated() {
            tracing::info!("Session cleared");
        }
        *guard = Session::anonymous();
    }

    fn persist_token(&self, token: &str) -> bool {
        match self.storage.set_item(TOKEN_KEY, token) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to persist token: {}", e);
                false
            }
        }
    }

    fn persist_user(&self, user: &UserRecord) -> bool {
        let result = serde_json::to_string(user)
            .map_err(crate::error::StorageError::from)
            .and_then(|raw| self.storage.set_item(USER_KEY, &raw));
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to persist user record: {}", e);
                false
            }
        }
    }

    fn wipe_storage(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                tracing::warn!("Failed to remove stored '{}': {}", key, e);
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }
}
