//! Authentication middleware that resolves the session from the token cookie and handles redirects.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;

use crate::{
    AppState,
    api::{ApiClient, ApiError, records::fetch_profile},
    auth::{
        build_log_in_redirect_url, get_token_from_cookies, invalidate_auth_cookie,
        redirect::build_log_in_redirect_url_from_target,
    },
    endpoints,
    error::CredentialRejected,
    session::Session,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// Used to check the token and load the user's profile.
    pub api: ApiClient,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            api: state.api.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Clear the token cookie and send the client to the log-in page.
fn log_out_with(jar: PrivateCookieJar, redirect: Response) -> Response {
    (invalidate_auth_cookie(jar), redirect).into_response()
}

/// Checks for a valid token cookie before running the request.
///
/// With `load_profile`, the user's profile is fetched and a [Session] is placed
/// into the request, otherwise only the [BearerToken](crate::api::BearerToken) is.
/// A missing token, a profile fetch rejected with 401 or a response marked
/// with [CredentialRejected] clears the cookie and returns `get_redirect`.
/// Other profile fetch failures return `get_redirect` and keep the cookie.
#[inline]
async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    load_profile: bool,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let log_in_redirect_url = build_log_in_redirect_url(&request).unwrap_or_else(|| {
        if request.uri().path().starts_with("/api") {
            tracing::warn!(
                "Missing or invalid HTMX headers for /api request. Falling back to dashboard."
            );
        } else {
            tracing::warn!("Invalid redirect URL from request URI. Falling back to dashboard.");
        }

        build_log_in_redirect_url_from_target(endpoints::DASHBOARD_VIEW)
            .unwrap_or_else(|| endpoints::LOG_IN_VIEW.to_owned())
    });

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return get_redirect(&log_in_redirect_url);
        }
    };
    let token = match get_token_from_cookies(&jar) {
        Ok(token) => token,
        Err(error) => {
            tracing::debug!("No usable token cookie: {error}. Redirecting to log in page.");
            return log_out_with(jar, get_redirect(&log_in_redirect_url));
        }
    };

    if load_profile {
        match fetch_profile(&state.api, &token).await {
            Ok(user) => {
                parts.extensions.insert(Session::Authenticated {
                    token: token.clone(),
                    user,
                });
            }
            Err(ApiError::Unauthorized) => {
                tracing::warn!(
                    "The API rejected the token while loading the profile. Logging out."
                );
                return log_out_with(jar, get_redirect(&log_in_redirect_url));
            }
            Err(error) => {
                tracing::error!(
                    "Could not load the user's profile: {error}. Redirecting to log in page."
                );
                return get_redirect(&log_in_redirect_url);
            }
        }
    }

    parts.extensions.insert(token);
    let response = next.run(Request::from_parts(parts, body)).await;

    if response.extensions().get::<CredentialRejected>().is_some() {
        tracing::warn!("The API rejected the token. Logging out.");
        return log_out_with(jar, get_redirect(&log_in_redirect_url));
    }

    response
}

/// Middleware function that resolves the [Session] from the token cookie.
/// The session is placed into the request and the request executed normally if the token is valid, otherwise a redirect to the log-in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(session): Extension<Session>` to receive the session.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, true, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for a token cookie without loading the profile.
/// The token is placed into the request and the request executed normally if it is present, otherwise a HTMX redirect to the log-in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(token): Extension<BearerToken>` to receive the token.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, false, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}
