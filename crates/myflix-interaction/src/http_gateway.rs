//! HttpGateway - REST implementation of [`CatalogApi`] for the myFlix API.
//!
//! This gateway owns transport details only: URL construction, bearer
//! credentials, JSON (de)serialization and collapsing every failure into
//! the normalized [`ClientError::Request`].

use async_trait::async_trait;
use myflix_core::api::{CatalogApi, LoginResponse};
use myflix_core::error::{ClientError, Result};
use myflix_core::movie::{Director, Genre, MainActor, Movie};
use myflix_core::user::{Credentials, Registration, UserRecord, UserUpdate};
use myflix_core::{ClientConfig, SessionStore};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, Request, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const BODY_PREVIEW_CHAR_LIMIT: usize = 160;

/// Whether a request carries the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Anonymous,
    Bearer,
}

/// Gateway that talks to the myFlix REST API.
///
/// Stateless per call: the token is read from the [`SessionStore`] when the
/// request is built. The one exception to "writes back nothing" is a 401
/// response to an authorized request, which clears the session before the
/// failure is returned, provided the rejected token is still the current one.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    session: Arc<SessionStore>,
}

impl HttpGateway {
    /// Creates a gateway for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns a `Precondition` error when the URL is invalid or the HTTP
    /// client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration, session: Arc<SessionStore>) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ClientError::precondition(format!("Invalid API base URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::precondition(format!(
                "API base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::precondition(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn from_config(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self> {
        Self::new(&config.api_url, config.request_timeout(), session)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `base_url` + percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::request(format!("Cannot build a path on {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str], auth: Auth) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!("{} {}", method, url.path());

        let mut request = self.client.request(method, url);
        if auth == Auth::Bearer {
            // Without a token the call still goes out; the server decides.
            if let Some(token) = self.session.token() {
                request = request.bearer_auth(token);
            }
        }
        Ok(request)
    }

    /// Sends the request and returns the raw body of a successful response.
    async fn execute(&self, operation: &str, request: RequestBuilder, auth: Auth) -> Result<Vec<u8>> {
        let request = request
            .build()
            .map_err(|e| map_transport_error(operation, &e))?;
        let sent_token = match auth {
            Auth::Bearer => sent_bearer_token(&request),
            Auth::Anonymous => None,
        };

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| map_transport_error(operation, &e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_transport_error(operation, &e))?;

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                // Only the session that owns the rejected token is cleared
                if let Some(token) = sent_token.as_deref() {
                    if self.session.clear_if_token(token) {
                        tracing::warn!("{} was rejected as unauthorized; session cleared", operation);
                    }
                }
            }
            return Err(map_status_error(operation, status, body.as_ref()));
        }

        Ok(body.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
        auth: Auth,
    ) -> Result<T> {
        let body = self.execute(operation, request, auth).await?;
        serde_json::from_slice(&body).map_err(|e| map_decode_error(operation, &e))
    }

    /// Decodes a payload that is either the value itself or an object
    /// wrapping it under one of `fields`.
    async fn send_field<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
        fields: &[&str],
    ) -> Result<T> {
        let body = self.execute(operation, request, Auth::Bearer).await?;
        let value: Value =
            serde_json::from_slice(&body).map_err(|e| map_decode_error(operation, &e))?;
        serde_json::from_value(unwrap_field(value, fields))
            .map_err(|e| map_decode_error(operation, &e))
    }

    /// Like `send_field` for string payloads, also accepting a plain-text body.
    async fn send_text_field(
        &self,
        operation: &str,
        request: RequestBuilder,
        fields: &[&str],
    ) -> Result<String> {
        let body = self.execute(operation, request, Auth::Bearer).await?;
        let parsed = serde_json::from_slice::<Value>(&body);
        match parsed {
            Ok(value) => serde_json::from_value(unwrap_field(value, fields))
                .map_err(|e| map_decode_error(operation, &e)),
            Err(_) => String::from_utf8(body)
                .map(|text| text.trim().to_string())
                .map_err(|e| {
                    ClientError::request(format!("Could not {}: invalid response ({})", operation, e))
                }),
        }
    }
}

#[async_trait]
impl CatalogApi for HttpGateway {
    async fn register(&self, registration: &Registration) -> Result<UserRecord> {
        let request = self
            .request(Method::POST, &["users"], Auth::Anonymous)?
            .json(registration);
        let user: UserRecord = self.send_json("register", request, Auth::Anonymous).await?;
        tracing::info!("Registered user {}", user.username);
        Ok(user)
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let request = self
            .request(Method::POST, &["login"], Auth::Anonymous)?
            .query(&[
                ("email", credentials.email.as_str()),
                ("password", credentials.password.as_str()),
            ]);
        self.send_json("log in", request, Auth::Anonymous).await
    }

    async fn fetch_user(&self, user_id: &str) -> Result<UserRecord> {
        let request = self.request(Method::GET, &["users", user_id], Auth::Bearer)?;
        self.send_json("load the user profile", request, Auth::Bearer)
            .await
    }

    async fn edit_user(&self, user_id: &str, update: &UserUpdate) -> Result<UserRecord> {
        let request = self
            .request(Method::PUT, &["users", user_id], Auth::Bearer)?
            .json(update);
        self.send_json("update the profile", request, Auth::Bearer)
            .await
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let request = self.request(Method::DELETE, &["users", user_id], Auth::Bearer)?;
        self.execute("delete the account", request, Auth::Bearer)
            .await?;
        Ok(())
    }

    async fn fetch_movies(&self) -> Result<Vec<Movie>> {
        let request = self.request(Method::GET, &["movies"], Auth::Bearer)?;
        self.send_json("load movies", request, Auth::Bearer).await
    }

    async fn fetch_movie(&self, title: &str) -> Result<Movie> {
        let request = self.request(Method::GET, &["movies", title], Auth::Bearer)?;
        self.send_json("load the movie", request, Auth::Bearer).await
    }

    async fn fetch_director(&self, name: &str) -> Result<Director> {
        let request = self.request(Method::GET, &["directors", name], Auth::Bearer)?;
        self.send_json("load the director", request, Auth::Bearer)
            .await
    }

    async fn fetch_movie_directors(&self, title: &str) -> Result<Vec<Director>> {
        let request = self.request(Method::GET, &["movies", title, "directors"], Auth::Bearer)?;
        self.send_field("load the movie's directors", request, &["directors"])
            .await
    }

    async fn fetch_movie_genres(&self, title: &str) -> Result<Vec<Genre>> {
        let request = self.request(Method::GET, &["movies", title, "genre"], Auth::Bearer)?;
        self.send_field("load the movie's genre", request, &["genres", "genre"])
            .await
    }

    async fn fetch_genre(&self, name: &str) -> Result<Genre> {
        let request = self.request(Method::GET, &["genre", name], Auth::Bearer)?;
        self.send_field("load the genre", request, &["genre"]).await
    }

    async fn fetch_writers(&self, title: &str) -> Result<Vec<String>> {
        let request = self.request(Method::GET, &["movies", title, "writers"], Auth::Bearer)?;
        self.send_field("load the movie's writers", request, &["writers"])
            .await
    }

    async fn fetch_main_actor(&self, title: &str) -> Result<MainActor> {
        let request = self.request(Method::GET, &["movies", title, "main-actors"], Auth::Bearer)?;
        self.send_field("load the movie's main actor", request, &["main_actor", "mainActor"])
            .await
    }

    async fn fetch_description(&self, title: &str) -> Result<String> {
        let request = self.request(Method::GET, &["movies", title, "description"], Auth::Bearer)?;
        self.send_text_field("load the movie's description", request, &["description"])
            .await
    }

    async fn fetch_image(&self, title: &str) -> Result<String> {
        let request = self.request(Method::GET, &["movies", title, "image"], Auth::Bearer)?;
        self.send_text_field(
            "load the movie's image",
            request,
            &["image_url", "image", "imagePath"],
        )
        .await
    }

    async fn add_favorite(&self, user_id: &str, movie_title: &str) -> Result<UserRecord> {
        let request = self.request(Method::PUT, &["users", user_id, movie_title], Auth::Bearer)?;
        self.send_json("add the movie to favorites", request, Auth::Bearer)
            .await
    }

    async fn remove_favorite(&self, user_id: &str, movie_title: &str) -> Result<UserRecord> {
        let request =
            self.request(Method::DELETE, &["users", user_id, movie_title], Auth::Bearer)?;
        self.send_json("remove the movie from favorites", request, Auth::Bearer)
            .await
    }
}

/// Token carried by the request's `Authorization: Bearer` header.
fn sent_bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn unwrap_field(value: Value, fields: &[&str]) -> Value {
    match value {
        Value::Object(mut map) => {
            for field in fields {
                if let Some(inner) = map.remove(*field) {
                    return inner;
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

fn map_transport_error(operation: &str, error: &reqwest::Error) -> ClientError {
    tracing::warn!("Could not {}: {}", operation, error);
    let reason = if error.is_timeout() {
        "the server did not respond in time".to_string()
    } else {
        error.to_string()
    };
    ClientError::request(format!("Could not {}: {}", operation, reason))
}

fn map_status_error(operation: &str, status: StatusCode, body: &[u8]) -> ClientError {
    let preview = body_preview(body);
    tracing::warn!("Could not {}: status {} {}", operation, status.as_u16(), preview);
    let message = if preview.is_empty() {
        format!("Could not {} (status {})", operation, status.as_u16())
    } else {
        format!("Could not {} (status {}): {}", operation, status.as_u16(), preview)
    };
    ClientError::request(message)
}

fn map_decode_error(operation: &str, error: &serde_json::Error) -> ClientError {
    tracing::warn!("Could not {}: malformed response: {}", operation, error);
    ClientError::request(format!("Could not {}: malformed response", operation))
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(BODY_PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > BODY_PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
