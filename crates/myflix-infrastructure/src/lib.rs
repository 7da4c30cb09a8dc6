//! Infrastructure layer for the myFlix client: platform paths, durable
//! key/value storage and configuration loading.

pub mod config_loader;
pub mod paths;
pub mod storage;

pub use crate::config_loader::{ConfigError, ConfigLoader};
pub use crate::paths::MyflixPaths;
pub use crate::storage::{FileLocalStorage, MemoryLocalStorage};
