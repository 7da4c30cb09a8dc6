//! UserRecord domain model and user request payloads.

use crate::movie::MovieId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The set of movie identifiers a user has marked as favorite.
///
/// A set, so order is irrelevant and duplicates cannot exist.
pub type FavoriteSet = BTreeSet<MovieId>;

/// User record as returned by the API.
///
/// The `password` field is only ever populated by the server echoing the
/// stored hash back. It is dropped before the record reaches the session
/// store, see [`UserRecord::without_password`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Server-side identifier
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    /// Date of birth in whatever form the server stored it
    #[serde(default)]
    pub dob: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub favorite_movies: FavoriteSet,
}

impl UserRecord {
    /// Returns a copy of this record with the password field cleared.
    pub fn without_password(mut self) -> Self {
        self.password = None;
        self
    }

    pub fn has_favorite(&self, movie_id: &str) -> bool {
        self.favorite_movies.contains(movie_id)
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("dob", &self.dob)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("favorite_movies", &self.favorite_movies)
            .finish()
    }
}

/// Login credentials, sent as query parameters.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of the registration request.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub dob: String,
    pub favorite_movies: Vec<MovieId>,
}

impl Registration {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        dob: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
            dob: dob.into(),
            favorite_movies: Vec::new(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("dob", &self.dob)
            .finish_non_exhaustive()
    }
}

/// User-editable profile fields, as held by a profile form.
///
/// `dob` may be in any display format; it is normalized before sending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub username: String,
    pub email: String,
    pub dob: String,
}

/// Body of the edit-user request.
///
/// `password` carries the *current* password; the API uses it to
/// reauthorize the change.
#[derive(Clone, Serialize)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    pub dob: String,
    pub password: String,
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("dob", &self.dob)
            .finish_non_exhaustive()
    }
}
