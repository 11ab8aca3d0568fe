//! Implements a struct that holds the state of the server.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error, api::ApiClient, config::Config, image_host::ImageHost, timezone::get_local_offset,
};

/// The state of the server.
///
/// Nothing in here is mutated after start up, so cloning it into each
/// handler is cheap and needs no locking.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,

    /// The client for the REST API that stores the user's data.
    pub api: ApiClient,

    /// Where profile images go.
    pub image_host: ImageHost,
}

impl AppState {
    /// Create a new [AppState] from `config`.
    ///
    /// # Errors
    /// Returns an error if the timezone is not a canonical timezone name or
    /// the HTTP clients cannot be built.
    pub fn new(config: &Config) -> Result<Self, Error> {
        if get_local_offset(&config.local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(config.local_timezone.clone()));
        }

        let api = ApiClient::new(&config.api_base_url, config.request_timeout)
            .map_err(|error| error.context("Could not create the API client"))?;
        let image_host = ImageHost::new(
            &config.image_upload_url,
            &config.image_upload_preset,
            config.request_timeout,
        )?;

        Ok(Self {
            cookie_key: create_cookie_key(&config.cookie_secret),
            cookie_duration: config.cookie_duration,
            local_timezone: config.local_timezone.clone(),
            api,
            image_host,
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

#[cfg(test)]
mod tests {
    use crate::{Error, config::Config};

    use super::AppState;

    #[test]
    fn rejects_unknown_timezone() {
        let mut config = Config::new("foobar");
        config.local_timezone = "Middle/Earth".to_owned();

        let result = AppState::new(&config);

        assert_eq!(
            result.err(),
            Some(Error::InvalidTimezoneError("Middle/Earth".to_owned()))
        );
    }

    #[test]
    fn builds_with_defaults() {
        let state = AppState::new(&Config::new("foobar")).unwrap();

        assert_eq!(state.api.base_url(), "http://localhost:8080/api/v1.0");
        assert_eq!(state.local_timezone, "Etc/UTC");
    }
}
