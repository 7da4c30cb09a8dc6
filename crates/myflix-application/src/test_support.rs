//! Shared fixtures for application-layer tests.

use async_trait::async_trait;
use myflix_core::api::{CatalogApi, LoginResponse};
use myflix_core::error::{ClientError, Result};
use myflix_core::movie::{Director, Genre, MainActor, Movie};
use myflix_core::user::{Credentials, Registration, UserRecord, UserUpdate};
use myflix_core::SessionStore;
use myflix_infrastructure::MemoryLocalStorage;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// A recorded call: operation name plus its key argument.
pub(crate) type Call = (&'static str, String);

/// Scripted `CatalogApi`.
///
/// Each operation pops its next scripted response; an unscripted call fails
/// with a `Request` error. A gate holds the next call of an operation until
/// the matching sender fires.
#[derive(Default)]
pub(crate) struct MockApi {
    responses: Mutex<HashMap<&'static str, VecDeque<Result<Value>>>>,
    gates: Mutex<HashMap<&'static str, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<Call>>,
    edits: Mutex<Vec<UserUpdate>>,
}

impl MockApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn script(&self, operation: &'static str, response: Result<Value>) {
        self.responses
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(response);
    }

    pub(crate) fn script_ok(&self, operation: &'static str, response: Value) {
        self.script(operation, Ok(response));
    }

    pub(crate) fn script_err(&self, operation: &'static str, message: &str) {
        self.script(operation, Err(ClientError::request(message)));
    }

    /// Holds the next call of `operation` until the returned sender fires.
    pub(crate) fn gate(&self, operation: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(operation, rx);
        tx
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| *op == operation)
            .count()
    }

    pub(crate) fn edits(&self) -> Vec<UserUpdate> {
        self.edits.lock().unwrap().clone()
    }

    async fn respond<T: DeserializeOwned>(&self, operation: &'static str, arg: &str) -> Result<T> {
        self.calls.lock().unwrap().push((operation, arg.to_string()));

        let gate = self.gates.lock().unwrap().remove(operation);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let response = self
            .responses
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ClientError::request(format!("unscripted {}", operation))));

        response.map(|value| serde_json::from_value(value).unwrap())
    }
}

#[async_trait]
impl CatalogApi for MockApi {
    async fn register(&self, registration: &Registration) -> Result<UserRecord> {
        self.respond("register", &registration.username).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.respond("login", &credentials.email).await
    }

    async fn fetch_user(&self, user_id: &str) -> Result<UserRecord> {
        self.respond("fetch_user", user_id).await
    }

    async fn edit_user(&self, user_id: &str, update: &UserUpdate) -> Result<UserRecord> {
        self.edits.lock().unwrap().push(update.clone());
        self.respond("edit_user", user_id).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.respond::<Value>("delete_user", user_id).await.map(|_| ())
    }

    async fn fetch_movies(&self) -> Result<Vec<Movie>> {
        self.respond("fetch_movies", "").await
    }

    async fn fetch_movie(&self, title: &str) -> Result<Movie> {
        self.respond("fetch_movie", title).await
    }

    async fn fetch_director(&self, name: &str) -> Result<Director> {
        self.respond("fetch_director", name).await
    }

    async fn fetch_movie_directors(&self, title: &str) -> Result<Vec<Director>> {
        self.respond("fetch_movie_directors", title).await
    }

    async fn fetch_movie_genres(&self, title: &str) -> Result<Vec<Genre>> {
        self.respond("fetch_movie_genres", title).await
    }

    async fn fetch_genre(&self, name: &str) -> Result<Genre> {
        self.respond("fetch_genre", name).await
    }

    async fn fetch_writers(&self, title: &str) -> Result<Vec<String>> {
        self.respond("fetch_writers", title).await
    }

    async fn fetch_main_actor(&self, title: &str) -> Result<MainActor> {
        self.respond("fetch_main_actor", title).await
    }

    async fn fetch_description(&self, title: &str) -> Result<String> {
        self.respond("fetch_description", title).await
    }

    async fn fetch_image(&self, title: &str) -> Result<String> {
        self.respond("fetch_image", title).await
    }

    async fn add_favorite(&self, user_id: &str, movie_title: &str) -> Result<UserRecord> {
        self.respond("add_favorite", &format!("{}/{}", user_id, movie_title))
            .await
    }

    async fn remove_favorite(&self, user_id: &str, movie_title: &str) -> Result<UserRecord> {
        self.respond("remove_favorite", &format!("{}/{}", user_id, movie_title))
            .await
    }
}

pub(crate) fn user_json(id: &str, favorites: &[&str]) -> Value {
    json!({
        "_id": id,
        "username": "ada",
        "email": "ada@example.com",
        "dob": "1990-05-01T00:00:00.000Z",
        "password": "$2b$10$hash",
        "favorite_movies": favorites,
    })
}

pub(crate) fn user(id: &str, favorites: &[&str]) -> UserRecord {
    serde_json::from_value(user_json(id, favorites)).unwrap()
}

pub(crate) fn movie(id: &str, title: &str) -> Movie {
    serde_json::from_value(json!({"_id": id, "title": title})).unwrap()
}

pub(crate) fn movies_json(entries: &[(&str, &str)]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|(id, title)| json!({"_id": id, "title": title}))
            .collect(),
    )
}

pub(crate) fn anonymous_session() -> Arc<SessionStore> {
    Arc::new(SessionStore::restore(Arc::new(MemoryLocalStorage::new())))
}

pub(crate) fn session_for(user: UserRecord) -> Arc<SessionStore> {
    let session = anonymous_session();
    session.establish("tok-1", user);
    session
}
