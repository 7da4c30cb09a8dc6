//! HttpGateway against an in-process fake of the myFlix API.

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use myflix_core::CatalogApi;
use myflix_core::SessionStore;
use myflix_core::user::{Credentials, Registration, UserRecord, UserUpdate};
use myflix_infrastructure::MemoryLocalStorage;
use myflix_interaction::HttpGateway;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    query: Option<String>,
    authorization: Option<String>,
    body: String,
}

#[derive(Default)]
struct FakeState {
    recorded: Vec<Recorded>,
    responses: VecDeque<(StatusCode, String)>,
    gate: Option<oneshot::Receiver<()>>,
}

#[derive(Clone, Default)]
struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    fn respond(&self, status: StatusCode, body: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back((status, body.into()));
    }

    fn respond_json(&self, body: Value) {
        self.respond(StatusCode::OK, body.to_string());
    }

    /// Holds the next response until the returned sender fires.
    fn gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().unwrap().gate = Some(rx);
        tx
    }

    fn recorded(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().recorded.clone()
    }

    fn last(&self) -> Recorded {
        self.recorded().pop().expect("no request reached the fake API")
    }
}

async fn handle(
    State(api): State<FakeApi>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let gate = {
        let mut state = api.state.lock().unwrap();
        state.recorded.push(Recorded {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
        state.gate.take()
    };
    if let Some(gate) = gate {
        let _ = gate.await;
    }

    let (status, body) = api
        .state
        .lock()
        .unwrap()
        .responses
        .pop_front()
        .unwrap_or((StatusCode::NOT_FOUND, String::new()));
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

async fn spawn_fake(api: FakeApi) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(handle).with_state(api);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

fn user_json() -> Value {
    json!({
        "_id": "u-1",
        "username": "ada",
        "email": "ada@example.com",
        "dob": "1990-05-01T00:00:00.000Z",
        "password": "$2b$10$hash",
        "favorite_movies": ["m-1"],
    })
}

fn user() -> UserRecord {
    serde_json::from_value(user_json()).unwrap()
}

fn logged_in_session() -> Arc<SessionStore> {
    let session = Arc::new(SessionStore::restore(Arc::new(MemoryLocalStorage::new())));
    session.establish("tok-1", user());
    session
}

fn anonymous_session() -> Arc<SessionStore> {
    Arc::new(SessionStore::restore(Arc::new(MemoryLocalStorage::new())))
}

async fn setup(session: Arc<SessionStore>) -> (FakeApi, HttpGateway) {
    let api = FakeApi::default();
    let base_url = spawn_fake(api.clone()).await;
    let gateway = HttpGateway::new(&base_url, Duration::from_secs(5), session).unwrap();
    (api, gateway)
}

#[tokio::test]
async fn test_authorized_request_carries_bearer_token() {
    let (api, gateway) = setup(logged_in_session()).await;
    api.respond_json(json!([
        {"_id": "m-1", "title": "Inception", "featured": true},
        {"_id": "m-2", "title": "Heat"}
    ]));

    let movies = gateway.fetch_movies().await.unwrap();

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].title, "Inception");
    let request = api.last();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/movies");
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok-1"));
}

#[tokio::test]
async fn test_request_without_token_is_still_sent() {
    let (api, gateway) = setup(anonymous_session()).await;
    api.respond(StatusCode::UNAUTHORIZED, "Unauthorized");

    let err = gateway.fetch_movies().await.unwrap_err();

    assert!(err.is_request());
    let request = api.last();
    assert_eq!(request.path, "/movies");
    assert_eq!(request.authorization, None);
}

#[tokio::test]
async fn test_login_sends_credentials_as_query_without_auth() {
    let (api, gateway) = setup(logged_in_session()).await;
    api.respond_json(json!({"user": user_json(), "token": "tok-2"}));

    let response = gateway
        .login(&Credentials::new("ada@example.com", "s3cret"))
        .await
        .unwrap();

    assert_eq!(response.token, "tok-2");
    assert_eq!(response.user.id, "u-1");
    let request = api.last();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/login");
    assert_eq!(
        request.query.as_deref(),
        Some("email=ada%40example.com&password=s3cret")
    );
    assert_eq!(request.authorization, None);
}

#[tokio::test]
async fn test_register_posts_json_without_auth() {
    let (api, gateway) = setup(logged_in_session()).await;
    api.respond(StatusCode::CREATED, user_json().to_string());

    let registration = Registration::new(
        "ada",
        "s3cret",
        "ada@example.com",
        "1990-05-01T00:00:00.000Z",
    );
    let created = gateway.register(&registration).await.unwrap();

    assert_eq!(created.username, "ada");
    let request = api.last();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/users");
    assert_eq!(request.authorization, None);

    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["username"], "ada");
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["dob"], "1990-05-01T00:00:00.000Z");
    assert_eq!(body["favorite_movies"], json!([]));
}

#[tokio::test]
async fn test_edit_user_puts_fields_with_current_password() {
    let (api, gateway) = setup(logged_in_session()).await;
    api.respond_json(user_json());

    let update = UserUpdate {
        username: "ada".to_string(),
        email: "ada@example.org".to_string(),
        dob: "1990-05-01T00:00:00.000Z".to_string(),
        password: "current".to_string(),
    };
    gateway.edit_user("u-1", &update).await.unwrap();

    let request = api.last();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/users/u-1");
    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["email"], "ada@example.org");
    assert_eq!(body["password"], "current");
}

#[tokio::test]
async fn test_favorite_paths_encode_titles() {
    let (api, gateway) = setup(logged_in_session()).await;
    api.respond_json(user_json());
    api.respond_json(user_json());

    let updated = gateway.add_favorite("u-1", "The Matrix").await.unwrap();
    assert!(updated.has_favorite("m-1"));
    gateway.remove_favorite("u-1", "AC/DC: Live").await.unwrap();

    let recorded = api.recorded();
    assert_eq!(recorded[0].method, Method::PUT);
    assert_eq!(recorded[0].path, "/users/u-1/The%20Matrix");
    assert_eq!(recorded[1].method, Method::DELETE);
    assert_eq!(recorded[1].path, "/users/u-1/AC%2FDC:%20Live");
    assert!(
        recorded
            .iter()
            .all(|r| r.authorization.as_deref() == Some("Bearer tok-1"))
    );
}

#[tokio::test]
async fn test_unauthorized_response_clears_session() {
    let session = logged_in_session();
    let (api, gateway) = setup(session.clone()).await;
    api.respond(StatusCode::UNAUTHORIZED, "Unauthorized");

    let err = gateway.fetch_user("u-1").await.unwrap_err();

    assert!(err.is_request());
    assert!(!session.is_authenticated());
    assert_eq!(session.token(), None);
}

#[tokio::test]
async fn test_late_rejection_of_old_token_spares_new_session() {
    let session = logged_in_session();
    let (api, gateway) = setup(session.clone()).await;
    api.respond(StatusCode::UNAUTHORIZED, "Unauthorized");
    let release = api.gate();

    let in_flight = tokio::spawn({
        let gateway = gateway.clone();
        async move { gateway.fetch_user("u-1").await }
    });
    while api.recorded().is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // Logout and a fresh login while tok-1 is still on the wire
    session.clear();
    session.establish("tok-2", user());

    release.send(()).unwrap();
    let err = in_flight.await.unwrap().unwrap_err();

    assert!(err.is_request());
    assert_eq!(api.last().authorization.as_deref(), Some("Bearer tok-1"));
    assert!(session.is_authenticated());
    assert_eq!(session.token().as_deref(), Some("tok-2"));
}

#[tokio::test]
async fn test_rejected_login_keeps_existing_session() {
    let session = logged_in_session();
    let (api, gateway) = setup(session.clone()).await;
    api.respond(StatusCode::UNAUTHORIZED, r#"{"message": "Incorrect username or password."}"#);

    let err = gateway
        .login(&Credentials::new("ada@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(err.is_request());
    assert!(err.message().contains("Incorrect username"));
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_server_and_transport_failures_look_alike() {
    let (api, gateway) = setup(logged_in_session()).await;
    api.respond(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    let server_err = gateway.fetch_movies().await.unwrap_err();

    // A port that was bound and released: connection refused
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let unreachable = HttpGateway::new(
        &format!("http://{addr}/"),
        Duration::from_secs(5),
        logged_in_session(),
    )
    .unwrap();
    let transport_err = unreachable.fetch_movies().await.unwrap_err();

    assert!(server_err.is_request());
    assert!(transport_err.is_request());
    assert_eq!(
        std::mem::discriminant(&server_err),
        std::mem::discriminant(&transport_err)
    );
}

#[tokio::test]
async fn test_malformed_payload_is_request_error() {
    let (api, gateway) = setup(logged_in_session()).await;
    api.respond(StatusCode::OK, r#"{"movies": "not a list"}"#);

    let err = gateway.fetch_movies().await.unwrap_err();

    assert!(err.is_request());
    assert!(err.message().contains("malformed"));
}

#[tokio::test]
async fn test_delete_user_ignores_body() {
    let (api, gateway) = setup(logged_in_session()).await;
    api.respond(StatusCode::OK, "ada was deleted.");

    gateway.delete_user("u-1").await.unwrap();

    let request = api.last();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/users/u-1");
}

#[tokio::test]
async fn test_reference_lookups() {
    let (api, gateway) = setup(logged_in_session()).await;
    api.respond_json(json!({"name": "Christopher Nolan", "bio": "Director", "birth_year": "1970"}));
    api.respond_json(json!({"genres": [{"name": "Sci-Fi", "description": "Speculative"}]}));
    api.respond_json(json!({"name": "Drama", "description": "Serious"}));
    api.respond_json(json!({"writers": ["Jonathan Nolan"]}));
    api.respond_json(json!({"main_actor": {"name": "Leonardo DiCaprio"}}));
    api.respond(StatusCode::OK, "Dreams within dreams.");
    api.respond_json(json!({"imagePath": "https://img.example.com/inception.jpg"}));

    let director = gateway.fetch_director("Christopher Nolan").await.unwrap();
    let genres = gateway.fetch_movie_genres("Inception").await.unwrap();
    let genre = gateway.fetch_genre("Drama").await.unwrap();
    let writers = gateway.fetch_writers("Inception").await.unwrap();
    let actor = gateway.fetch_main_actor("Inception").await.unwrap();
    let description = gateway.fetch_description("Inception").await.unwrap();
    let image = gateway.fetch_image("Inception").await.unwrap();

    assert_eq!(director.birth.as_deref(), Some("1970"));
    assert_eq!(genres[0].name, "Sci-Fi");
    assert_eq!(genre.name, "Drama");
    assert_eq!(writers, vec!["Jonathan Nolan".to_string()]);
    assert_eq!(actor.name, "Leonardo DiCaprio");
    assert_eq!(description, "Dreams within dreams.");
    assert_eq!(image, "https://img.example.com/inception.jpg");

    let paths: Vec<String> = api.recorded().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "/directors/Christopher%20Nolan",
            "/movies/Inception/genre",
            "/genre/Drama",
            "/movies/Inception/writers",
            "/movies/Inception/main-actors",
            "/movies/Inception/description",
            "/movies/Inception/image",
        ]
    );
}
