//! Application layer of the myFlix client.
//!
//! Each component here owns one slice of client state and drives the
//! [`CatalogApi`](myflix_core::CatalogApi) to keep it in step with the server:
//!
//! - [`CatalogCache`]: the movie list for the listing view
//! - [`FavoritesSynchronizer`]: optimistic favorite toggles
//! - [`ProfileEditor`]: profile edits gated by the current password
//! - [`MyflixClient`]: wires them together with the session store

pub mod catalog_cache;
pub mod client;
pub mod favorites_sync;
pub mod profile_editor;

#[cfg(test)]
mod test_support;

pub use catalog_cache::CatalogCache;
pub use client::MyflixClient;
pub use favorites_sync::FavoritesSynchronizer;
pub use profile_editor::ProfileEditor;
