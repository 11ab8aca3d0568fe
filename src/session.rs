//! The signed-in user for the current request.

use crate::{Error, api::BearerToken, model::User};

/// Who is making the current request.
///
/// The auth middleware builds this once per page load and places it in the
/// request extensions. Handlers read it with `Extension<Session>`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { token: BearerToken, user: User },
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { user, .. } => Some(user),
        }
    }

    /// The bearer token for calls to the REST API.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthorized] for an anonymous session, which sends the
    /// client back to the log-in page.
    pub fn token(&self) -> Result<&BearerToken, Error> {
        match self {
            Session::Anonymous => Err(Error::Unauthorized),
            Session::Authenticated { token, .. } => Ok(token),
        }
    }
}
