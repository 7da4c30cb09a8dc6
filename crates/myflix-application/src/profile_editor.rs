use myflix_core::CatalogApi;
use myflix_core::SessionStore;
use myflix_core::error::{ClientError, Result};
use myflix_core::user::{ProfileFields, UserRecord, UserUpdate, display_dob, normalize_dob};
use std::sync::Arc;

/// Saves edits to the logged-in user's profile.
///
/// The API reauthorizes every edit with the user's current password, so a
/// save without one is refused locally.
pub struct ProfileEditor {
    api: Arc<dyn CatalogApi>,
    session: Arc<SessionStore>,
}

impl ProfileEditor {
    pub fn new(api: Arc<dyn CatalogApi>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Editable fields prefilled from the session, date shown as `YYYY-MM-DD`.
    ///
    /// `None` when nobody is logged in.
    pub fn form_fields(&self) -> Option<ProfileFields> {
        self.session.user().map(|user| ProfileFields {
            username: user.username,
            email: user.email,
            dob: display_dob(&user.dob),
        })
    }

    /// Sends the edited fields and caches the updated record.
    ///
    /// # Errors
    ///
    /// - `Precondition` for an empty password, an unparseable date of birth
    ///   or a missing session; nothing is sent
    /// - `Request` when the API rejects the edit; the session is untouched
    pub async fn save(&self, fields: &ProfileFields, current_password: &str) -> Result<UserRecord> {
        if current_password.is_empty() {
            return Err(ClientError::precondition(
                "Enter your current password to save profile changes",
            ));
        }

        let user_id = self
            .session
            .user_id()
            .ok_or_else(|| ClientError::precondition("Log in to edit your profile"))?;

        let update = UserUpdate {
            username: fields.username.trim().to_string(),
            email: fields.email.trim().to_string(),
            dob: normalize_dob(&fields.dob)?,
            password: current_password.to_string(),
        };

        let user = self.api.edit_user(&user_id, &update).await?.without_password();
        if self.session.update_user(user.clone()) {
            tracing::info!("Profile saved for user {}", user.username);
        }
        Ok(user)
    }
}
