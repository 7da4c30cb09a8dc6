//! Domain layer of the myFlix client.
//!
//! Holds the data model (users, movies, sessions), the normalized error
//! type, the remote API trait and the pure favorite-toggle state machine.
//! Nothing in this crate performs network I/O.

pub mod api;
pub mod config;
pub mod error;
pub mod favorites;
pub mod movie;
pub mod session;
pub mod user;

// Re-export common types
pub use api::{CatalogApi, LoginResponse};
pub use config::ClientConfig;
pub use error::{ClientError, StorageError};
pub use session::{Session, SessionStore};
