use myflix_core::CatalogApi;
use myflix_core::error::Result;
use myflix_core::movie::Movie;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory movie list backing the listing view.
///
/// A failed `load()` keeps whatever list was held before, so the view keeps
/// showing stale data rather than going blank.
pub struct CatalogCache {
    api: Arc<dyn CatalogApi>,
    movies: RwLock<Vec<Movie>>,
}

impl CatalogCache {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            movies: RwLock::new(Vec::new()),
        }
    }

    /// Fetches the full catalog and replaces the held list.
    ///
    /// # Errors
    ///
    /// Returns the normalized request failure; the held list is untouched.
    pub async fn load(&self) -> Result<Vec<Movie>> {
        match self.api.fetch_movies().await {
            Ok(movies) => {
                tracing::debug!("Loaded {} movies", movies.len());
                *self.movies.write().unwrap_or_else(PoisonError::into_inner) = movies.clone();
                Ok(movies)
            }
            Err(e) => {
                tracing::warn!("Failed to load movies, keeping previous list: {}", e);
                Err(e)
            }
        }
    }

    /// The held list; empty before the first successful load.
    pub fn current(&self) -> Vec<Movie> {
        self.movies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.movies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Looks up a held movie by exact title, falling back to a
    /// case-insensitive match.
    pub fn find(&self, title: &str) -> Option<Movie> {
        let movies = self.movies.read().unwrap_or_else(PoisonError::into_inner);
        movies
            .iter()
            .find(|m| m.title == title)
            .or_else(|| movies.iter().find(|m| m.title.eq_ignore_ascii_case(title)))
            .cloned()
    }

    pub fn clear(&self) {
        self.movies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
