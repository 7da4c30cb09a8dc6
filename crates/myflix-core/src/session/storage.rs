//! Durable key/value storage trait.
//!
//! Defines the interface the session store writes through to, decoupling it
//! from the specific storage mechanism (a JSON file on disk, memory, ...).

use crate::error::StorageError;

/// Key under which the auth token is stored.
pub const TOKEN_KEY: &str = "token";
/// Key under which the serialized user record is stored.
pub const USER_KEY: &str = "user";

/// String-keyed, string-valued durable storage.
///
/// Operations are synchronous: when a call returns `Ok`, the value must be
/// visible to a freshly constructed storage over the same backing location.
pub trait LocalStorage: Send + Sync {
    /// Reads a value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Key present
    /// - `Ok(None)`: Key absent
    /// - `Err(_)`: Backing store could not be read
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any previous one.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
