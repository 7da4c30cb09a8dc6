//! User domain module.
//!
//! This module contains the user record returned by the API, the request
//! bodies sent to the user endpoints and date-of-birth normalization.
//!
//! # Module Structure
//!
//! - `model`: User record and request payloads
//! - `dob`: Date-of-birth parsing and wire formatting
//!
//! # Usage
//!
//! ```ignore
//! use myflix_core::user::{UserRecord, ProfileFields, normalize_dob};
//! ```

mod dob;
mod model;

// Re-export public API
pub use dob::{display_dob, normalize_dob};
pub use model::{Credentials, FavoriteSet, ProfileFields, Registration, UserRecord, UserUpdate};
