//! Session domain module.
//!
//! This module contains the authenticated-identity state held by the client
//! and the store that owns it.
//!
//! # Module Structure
//!
//! - `model`: Session value (`Session`, `Authenticated`)
//! - `storage`: Durable key/value storage trait (`LocalStorage`)
//! - `store`: Owner of the current session (`SessionStore`)
//!
//! # Usage
//!
//! ```ignore
//! use myflix_core::session::{Session, SessionStore, LocalStorage};
//! ```

mod model;
mod storage;
mod store;

// Re-export public API
pub use model::{Authenticated, Session};
pub use storage::{LocalStorage, TOKEN_KEY, USER_KEY};
pub use store::SessionStore;
