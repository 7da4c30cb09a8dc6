use serde::{Deserialize, Serialize};

/// Server-side movie identifier.
pub type MovieId = String;

/// A catalog movie with its enriched metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Image reference (URL or path, as stored by the server)
    #[serde(default, alias = "image", alias = "imagePath")]
    pub image_url: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub writers: Vec<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub directors: Vec<Director>,
    #[serde(default)]
    pub main_actor: MainActor,
}

impl Movie {
    /// Name of the first listed director, if any.
    pub fn primary_director(&self) -> Option<&str> {
        self.directors.first().map(|d| d.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, alias = "birth_year", alias = "birthYear")]
    pub birth: Option<String>,
    #[serde(default, alias = "death_year", alias = "deathYear")]
    pub death: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainActor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, alias = "birth_year", alias = "birthYear")]
    pub birth: Option<String>,
}
