//! Stores the REST API's bearer token in a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, api::BearerToken, auth::Token};

pub(crate) const COOKIE_TOKEN: &str = "token";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::days(7);

/// Add the auth cookie holding `token` to the cookie jar.
///
/// The cookie expires `duration` from now.
///
/// # Errors
///
/// Returns [Error::TokenSerialization] if the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    token: &BearerToken,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc() + duration;
    let token = Token {
        token: token.as_str().to_owned(),
        expires_at,
    };
    let token_string = serde_json::to_string(&token)
        .map_err(|error| Error::TokenSerialization(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .expires(expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Get the bearer token from the auth cookie.
///
/// # Errors
///
/// Returns:
/// - [Error::CookieMissing] if there is no cookie, the token is blank or it has expired.
/// - [Error::TokenSerialization] if the cookie does not hold a token.
pub fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<BearerToken, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;
    let token: Token = serde_json::from_str(cookie.value_trimmed())
        .map_err(|error| Error::TokenSerialization(error.to_string()))?;

    if token.is_expired(OffsetDateTime::now_utc()) {
        return Err(Error::CookieMissing);
    }

    token.bearer().ok_or(Error::CookieMissing)
}

/// Set the auth cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}
