//! The signed-in user's profile.

use std::str::FromStr;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::model::RecordId;

/// A user profile as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

impl User {
    /// The name to greet the user with, falling back to their email.
    pub fn display_name(&self) -> &str {
        let full_name = self.full_name.trim();

        if full_name.is_empty() {
            &self.email
        } else {
            full_name
        }
    }
}

/// The profile endpoint returns either `{"user": {...}}` or the bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProfileResponse {
    Wrapped { user: User },
    Bare(User),
}

impl ProfileResponse {
    pub fn into_user(self) -> User {
        match self {
            ProfileResponse::Wrapped { user } => user,
            ProfileResponse::Bare(user) => user,
        }
    }
}

/// Check that `email` looks like `local@domain.tld`.
///
/// On top of the address syntax, whitespace is not allowed anywhere and the
/// domain must contain a dot with at least one character on either side.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Ok(address) = EmailAddress::from_str(email) else {
        return false;
    };

    let domain = address.domain();

    domain
        .char_indices()
        .any(|(index, c)| c == '.' && index > 0 && index + 1 < domain.len())
}
