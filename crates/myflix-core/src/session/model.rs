//! Session domain model.

use crate::user::UserRecord;
use std::fmt;

/// Token and user record of a logged-in user.
///
/// The two only ever exist together, which is what makes a partial session
/// unrepresentable.
#[derive(Clone, PartialEq, Eq)]
pub struct Authenticated {
    pub token: String,
    pub user: UserRecord,
}

impl fmt::Debug for Authenticated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticated")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// The authenticated-identity state held by the client.
///
/// Either empty (logged out) or carrying both a token and a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    auth: Option<Authenticated>,
}

impl Session {
    /// A logged-out session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, user: UserRecord) -> Self {
        Self {
            auth: Some(Authenticated {
                token: token.into(),
                user,
            }),
        }
    }

    /// Builds a session from independently stored parts.
    ///
    /// A partial pair yields a logged-out session.
    pub fn from_parts(token: Option<String>, user: Option<UserRecord>) -> Self {
        match (token, user) {
            (Some(token), Some(user)) => Self::authenticated(token, user),
            _ => Self::anonymous(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.token.as_str())
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.auth.as_ref().map(|a| &a.user)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user().map(|u| u.id.as_str())
    }

    pub fn auth(&self) -> Option<&Authenticated> {
        self.auth.as_ref()
    }

    /// Replaces the user record, keeping the token.
    ///
    /// Returns `false` (and changes nothing) on a logged-out session.
    pub(crate) fn replace_user(&mut self, user: UserRecord) -> bool {
        match self.auth.as_mut() {
            Some(auth) => {
                auth.user = user;
                true
            }
            None => false,
        }
    }
}
