use super::require_login;
use anyhow::Result;
use myflix_application::MyflixClient;
use myflix_core::favorites::FavoriteState;

/// Flips one movie's favorite membership, looked up by title.
pub async fn toggle(client: &MyflixClient, title: &str) -> Result<()> {
    require_login(client)?;
    client.restore().await?;

    let movie = client.api().fetch_movie(title).await?;
    match client.favorites().toggle(&movie).await? {
        FavoriteState::IdleFavorite => println!("♥ Added '{}' to favorites", movie.title),
        FavoriteState::IdleNotFavorite => println!("Removed '{}' from favorites", movie.title),
        pending => println!("'{}' is {}", movie.title, pending),
    }
    Ok(())
}

pub async fn list(client: &MyflixClient) -> Result<()> {
    require_login(client)?;
    client.restore().await?;

    let favorites = client.favorites().favorites();
    if favorites.is_empty() {
        println!("No favorite movies yet");
        return Ok(());
    }

    let movies = client.catalog().load().await?;
    for movie in movies.iter().filter(|m| favorites.contains(&m.id)) {
        println!("♥ {}", movie.title);
    }

    // Favorites the catalog no longer lists
    let missing = favorites
        .iter()
        .filter(|id| !movies.iter().any(|m| &m.id == *id))
        .count();
    if missing > 0 {
        println!("({} favorite(s) no longer in the catalog)", missing);
    }
    Ok(())
}
