pub mod account;
pub mod catalog;
pub mod favorites;

use anyhow::{Result, bail};
use myflix_application::MyflixClient;

/// Fails with a hint to log in when no session is stored.
pub fn require_login(client: &MyflixClient) -> Result<()> {
    if !client.session().is_authenticated() {
        bail!("Not logged in. Run `myflix login --email <EMAIL> --password <PASSWORD>` first.");
    }
    Ok(())
}
