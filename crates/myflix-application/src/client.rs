//! MyflixClient - account flows over the client components.

use crate::catalog_cache::CatalogCache;
use crate::favorites_sync::FavoritesSynchronizer;
use crate::profile_editor::ProfileEditor;
use myflix_core::error::{ClientError, Result};
use myflix_core::user::{Credentials, Registration, UserRecord, normalize_dob};
use myflix_core::{CatalogApi, ClientConfig, SessionStore};
use myflix_infrastructure::FileLocalStorage;
use myflix_interaction::HttpGateway;
use std::sync::Arc;

/// Entry point of the client core.
///
/// Owns the session store and one instance of each component, all sharing
/// the same [`CatalogApi`].
pub struct MyflixClient {
    api: Arc<dyn CatalogApi>,
    session: Arc<SessionStore>,
    catalog: CatalogCache,
    favorites: FavoritesSynchronizer,
    profile: ProfileEditor,
}

impl MyflixClient {
    pub fn new(api: Arc<dyn CatalogApi>, session: Arc<SessionStore>) -> Self {
        Self {
            catalog: CatalogCache::new(api.clone()),
            favorites: FavoritesSynchronizer::new(api.clone(), session.clone()),
            profile: ProfileEditor::new(api.clone(), session.clone()),
            api,
            session,
        }
    }

    /// Builds a client with durable storage under `config.storage_dir` and
    /// the HTTP gateway for `config.api_url`. The stored session, if any, is
    /// restored from disk.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let storage = Arc::new(FileLocalStorage::new(&config.storage_dir));
        let session = Arc::new(SessionStore::restore(storage));
        let gateway = HttpGateway::from_config(config, session.clone())?;
        Ok(Self::new(Arc::new(gateway), session))
    }

    pub fn api(&self) -> &dyn CatalogApi {
        self.api.as_ref()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn favorites(&self) -> &FavoritesSynchronizer {
        &self.favorites
    }

    pub fn profile(&self) -> &ProfileEditor {
        &self.profile
    }

    /// Creates an account. Does not log in.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
        dob: &str,
    ) -> Result<UserRecord> {
        require("username", username)?;
        require("password", password)?;
        require("email", email)?;
        let dob = normalize_dob(dob)?;

        let registration = Registration::new(username.trim(), password, email.trim(), dob);
        let user = self.api.register(&registration).await?;
        Ok(user.without_password())
    }

    /// Logs in, establishes the session and loads the user's favorites.
    ///
    /// A failed favorites fetch does not fail the login; the favorites fall
    /// back to those in the login response.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord> {
        require("email", email)?;
        require("password", password)?;

        let response = self
            .api
            .login(&Credentials::new(email.trim(), password))
            .await?;
        let user = response.user.without_password();

        self.session.establish(response.token, user.clone());
        self.catalog.clear();
        self.favorites.reset_from(&user);

        match self.favorites.initialize().await {
            Ok(fresh) => Ok(fresh),
            Err(e) => {
                tracing::warn!("Logged in, but loading favorites failed: {}", e);
                Ok(user)
            }
        }
    }

    /// Forgets the session, the catalog and the favorites.
    pub fn logout(&self) {
        self.session.clear();
        self.catalog.clear();
        self.favorites.clear();
        tracing::info!("Logged out");
    }

    /// Deletes the account on the server, then logs out.
    ///
    /// On failure the session is kept.
    pub async fn delete_account(&self) -> Result<()> {
        let user_id = self
            .session
            .user_id()
            .ok_or_else(|| ClientError::precondition("Log in to delete your account"))?;

        self.api.delete_user(&user_id).await?;
        tracing::info!("Deleted account {}", user_id);
        self.logout();
        Ok(())
    }

    /// Cold start: re-syncs favorites for a session restored from storage.
    ///
    /// Returns `None` when no session was stored. If the server rejects the
    /// stored token the gateway has already cleared the session, and the
    /// favorites are cleared to match.
    pub async fn restore(&self) -> Result<Option<UserRecord>> {
        let Some(user) = self.session.user() else {
            return Ok(None);
        };
        self.favorites.reset_from(&user);

        match self.favorites.initialize().await {
            Ok(fresh) => Ok(Some(fresh)),
            Err(e) => {
                if !self.session.is_authenticated() {
                    self.favorites.clear();
                }
                Err(e)
            }
        }
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::precondition(format!("The {} must not be empty", field)));
    }
    Ok(())
}
