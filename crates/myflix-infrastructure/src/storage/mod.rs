//! Storage layer for atomic file operations.

mod atomic_json;
mod local_storage;

pub use atomic_json::AtomicJsonFile;
pub use local_storage::{FileLocalStorage, MemoryLocalStorage, LOCAL_STORAGE_FILE};
