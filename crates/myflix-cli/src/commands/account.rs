use super::require_login;
use anyhow::{Result, bail};
use myflix_application::MyflixClient;
use myflix_core::user::display_dob;

pub async fn register(
    client: &MyflixClient,
    username: &str,
    password: &str,
    email: &str,
    dob: &str,
) -> Result<()> {
    let user = client.register(username, password, email, dob).await?;
    println!("✅ Account '{}' created. You can now log in.", user.username);
    Ok(())
}

pub async fn login(client: &MyflixClient, email: &str, password: &str) -> Result<()> {
    let user = client.login(email, password).await?;
    println!("✅ Logged in as {}", user.username);
    Ok(())
}

pub fn logout(client: &MyflixClient) {
    client.logout();
    println!("👋 Logged out");
}

pub fn whoami(client: &MyflixClient) {
    let Some(user) = client.session().user() else {
        println!("Not logged in");
        return;
    };

    println!("{}", user.username);
    println!("  Email:         {}", user.email);
    println!("  Date of birth: {}", display_dob(&user.dob));
    println!("  Favorites:     {}", user.favorite_movies.len());
}

pub async fn profile(
    client: &MyflixClient,
    username: Option<String>,
    email: Option<String>,
    dob: Option<String>,
    password: &str,
) -> Result<()> {
    require_login(client)?;
    let Some(mut fields) = client.profile().form_fields() else {
        bail!("Not logged in");
    };

    if let Some(username) = username {
        fields.username = username;
    }
    if let Some(email) = email {
        fields.email = email;
    }
    if let Some(dob) = dob {
        fields.dob = dob;
    }

    let user = client.profile().save(&fields, password).await?;
    println!("✅ Profile saved");
    println!("  Username:      {}", user.username);
    println!("  Email:         {}", user.email);
    println!("  Date of birth: {}", display_dob(&user.dob));
    Ok(())
}

pub async fn delete_account(client: &MyflixClient, confirmed: bool) -> Result<()> {
    require_login(client)?;
    if !confirmed {
        bail!("This permanently deletes your account. Re-run with --yes to confirm.");
    }

    client.delete_account().await?;
    println!("🗑️  Account deleted");
    Ok(())
}
