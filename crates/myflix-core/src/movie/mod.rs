//! Movie catalog domain module.
//!
//! Movies and their reference entities are read-only from the client's
//! point of view: they are fetched, displayed and discarded.

mod model;

pub use model::{Director, Genre, MainActor, Movie, MovieId};
