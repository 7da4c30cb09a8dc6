//! Remote catalog/user API interface.
//!
//! Defines the typed operations the client core needs from the myFlix API,
//! decoupling the session, catalog and favorites logic from the transport.

use crate::error::Result;
use crate::movie::{Director, Genre, MainActor, Movie};
use crate::user::{Credentials, Registration, UserRecord, UserUpdate};
use async_trait::async_trait;
use serde::Deserialize;

/// Payload of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: UserRecord,
    pub token: String,
}

/// Gateway to the remote catalog/user API.
///
/// Every operation resolves to either its typed output or a normalized
/// [`ClientError`](crate::error::ClientError). Implementations attach the
/// session's bearer token to everything except `register` and `login`, and
/// must not retry on their own: `edit_user`, `add_favorite` and
/// `remove_favorite` are not idempotent.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn register(&self, registration: &Registration) -> Result<UserRecord>;

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    async fn fetch_user(&self, user_id: &str) -> Result<UserRecord>;

    /// Updates profile fields. `update.password` is the current password.
    async fn edit_user(&self, user_id: &str, update: &UserUpdate) -> Result<UserRecord>;

    async fn delete_user(&self, user_id: &str) -> Result<()>;

    async fn fetch_movies(&self) -> Result<Vec<Movie>>;

    async fn fetch_movie(&self, title: &str) -> Result<Movie>;

    async fn fetch_director(&self, name: &str) -> Result<Director>;

    async fn fetch_movie_directors(&self, title: &str) -> Result<Vec<Director>>;

    async fn fetch_movie_genres(&self, title: &str) -> Result<Vec<Genre>>;

    async fn fetch_genre(&self, name: &str) -> Result<Genre>;

    async fn fetch_writers(&self, title: &str) -> Result<Vec<String>>;

    async fn fetch_main_actor(&self, title: &str) -> Result<MainActor>;

    async fn fetch_description(&self, title: &str) -> Result<String>;

    async fn fetch_image(&self, title: &str) -> Result<String>;

    /// Adds a movie to the user's favorites and returns the updated user.
    async fn add_favorite(&self, user_id: &str, movie_title: &str) -> Result<UserRecord>;

    /// Removes a movie from the user's favorites and returns the updated user.
    async fn remove_favorite(&self, user_id: &str, movie_title: &str) -> Result<UserRecord>;
}
