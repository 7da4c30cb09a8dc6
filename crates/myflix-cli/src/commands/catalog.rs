use super::require_login;
use anyhow::Result;
use myflix_application::MyflixClient;
use myflix_core::movie::Movie;

fn print_row(client: &MyflixClient, movie: &Movie) {
    let heart = if client.favorites().is_favorite(&movie.id) {
        "♥"
    } else {
        " "
    };
    let star = if movie.featured { "★" } else { " " };
    match movie.primary_director() {
        Some(director) => println!("{} {} {} ({})", heart, star, movie.title, director),
        None => println!("{} {} {}", heart, star, movie.title),
    }
}

pub async fn movies(client: &MyflixClient) -> Result<()> {
    require_login(client)?;
    let movies = client.catalog().load().await?;

    if movies.is_empty() {
        println!("The catalog is empty");
        return Ok(());
    }
    for movie in &movies {
        print_row(client, movie);
    }
    Ok(())
}

pub async fn movie(client: &MyflixClient, title: &str) -> Result<()> {
    require_login(client)?;
    let movie = client.api().fetch_movie(title).await?;

    print_row(client, &movie);
    if !movie.description.is_empty() {
        println!("\n{}\n", movie.description);
    }
    if !movie.genres.is_empty() {
        let genres: Vec<&str> = movie.genres.iter().map(|g| g.name.as_str()).collect();
        println!("  Genres:     {}", genres.join(", "));
    }
    if !movie.directors.is_empty() {
        let directors: Vec<&str> = movie.directors.iter().map(|d| d.name.as_str()).collect();
        println!("  Directors:  {}", directors.join(", "));
    }
    if !movie.writers.is_empty() {
        println!("  Writers:    {}", movie.writers.join(", "));
    }
    if !movie.main_actor.name.is_empty() {
        println!("  Main actor: {}", movie.main_actor.name);
    }
    if !movie.image_url.is_empty() {
        println!("  Image:      {}", movie.image_url);
    }
    Ok(())
}

pub async fn director(client: &MyflixClient, name: &str) -> Result<()> {
    require_login(client)?;
    let director = client.api().fetch_director(name).await?;

    let lifespan = match (&director.birth, &director.death) {
        (Some(birth), Some(death)) => format!(" ({} - {})", birth, death),
        (Some(birth), None) => format!(" (born {})", birth),
        _ => String::new(),
    };
    println!("{}{}", director.name, lifespan);
    if !director.bio.is_empty() {
        println!("\n{}", director.bio);
    }
    Ok(())
}

pub async fn genre(client: &MyflixClient, title: &str) -> Result<()> {
    require_login(client)?;
    let genres = client.api().fetch_movie_genres(title).await?;

    if genres.is_empty() {
        println!("No genre listed for '{}'", title);
        return Ok(());
    }
    for genre in genres {
        println!("{}", genre.name);
        if !genre.description.is_empty() {
            println!("  {}", genre.description);
        }
    }
    Ok(())
}
