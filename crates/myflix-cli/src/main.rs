use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use myflix_application::MyflixClient;
use myflix_infrastructure::ConfigLoader;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "myflix")]
#[command(about = "myFlix CLI - browse the movie catalog and keep a list of favorites", long_about = None)]
struct Cli {
    /// Use this config file instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
        /// Date of birth, e.g. 1990-05-01
        #[arg(long)]
        dob: String,
    },
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List all movies
    Movies,
    /// Show one movie
    Movie { title: String },
    /// Show a director
    Director { name: String },
    /// Show the genres of a movie
    Genre { title: String },
    /// Add a movie to favorites, or remove it if it already is one
    Favorite { title: String },
    /// List favorite movies
    Favorites,
    /// Edit the profile; unspecified fields keep their current value
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        dob: Option<String>,
        /// Current password, required to save any change
        #[arg(long)]
        password: String,
    },
    /// Delete the account permanently
    DeleteAccount {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "myflix=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let loader = match cli.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load().context("Failed to load configuration")?;
    let client = MyflixClient::from_config(&config).context("Failed to set up the client")?;

    match cli.command {
        Commands::Register {
            username,
            password,
            email,
            dob,
        } => commands::account::register(&client, &username, &password, &email, &dob).await?,
        Commands::Login { email, password } => {
            commands::account::login(&client, &email, &password).await?
        }
        Commands::Logout => commands::account::logout(&client),
        Commands::Whoami => commands::account::whoami(&client),
        Commands::Movies => commands::catalog::movies(&client).await?,
        Commands::Movie { title } => commands::catalog::movie(&client, &title).await?,
        Commands::Director { name } => commands::catalog::director(&client, &name).await?,
        Commands::Genre { title } => commands::catalog::genre(&client, &title).await?,
        Commands::Favorite { title } => commands::favorites::toggle(&client, &title).await?,
        Commands::Favorites => commands::favorites::list(&client).await?,
        Commands::Profile {
            username,
            email,
            dob,
            password,
        } => commands::account::profile(&client, username, email, dob, &password).await?,
        Commands::DeleteAccount { yes } => commands::account::delete_account(&client, yes).await?,
    }

    Ok(())
}
