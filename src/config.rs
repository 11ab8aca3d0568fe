//! Runtime settings for the server, gathered from the command line and
//! environment by the `server` binary.

use std::time::Duration;

use crate::auth::DEFAULT_COOKIE_DURATION;

/// The REST API used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1.0";
/// The image host used for profile images.
pub const DEFAULT_IMAGE_UPLOAD_URL: &str = "https://api.cloudinary.com/v1_1/dwdiu3487/image/upload";
/// The unsigned upload preset on the default image host.
pub const DEFAULT_IMAGE_UPLOAD_PRESET: &str = "Spendwise";
/// The timezone used to decide what "this month" means.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";
/// Seconds to wait on outgoing requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Everything [crate::AppState::new] needs to build the app state.
#[derive(Debug, Clone)]
pub struct Config {
    /// The base URL of the REST API, e.g. "http://localhost:8080/api/v1.0".
    pub api_base_url: String,
    /// Where profile images are uploaded to.
    pub image_upload_url: String,
    /// The unsigned upload preset configured on the image host.
    pub image_upload_preset: String,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
    /// How long to wait on the REST API and image host before giving up.
    pub request_timeout: Duration,
    /// The secret used to derive the private cookie key.
    pub cookie_secret: String,
    /// How long a log-in lasts.
    pub cookie_duration: time::Duration,
}

impl Config {
    /// A config with the defaults for everything except the cookie secret.
    pub fn new(cookie_secret: &str) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            image_upload_url: DEFAULT_IMAGE_UPLOAD_URL.to_owned(),
            image_upload_preset: DEFAULT_IMAGE_UPLOAD_PRESET.to_owned(),
            local_timezone: DEFAULT_TIMEZONE.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            cookie_secret: cookie_secret.to_owned(),
            cookie_duration: DEFAULT_COOKIE_DURATION,
        }
    }
}
