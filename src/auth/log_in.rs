//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth module handles the lower level cookie and session logic.

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState,
    api::{ApiClient, ApiError, BearerToken, records},
    auth::{invalidate_auth_cookie, normalize_redirect_url, set_auth_cookie},
    endpoints,
    html::{base, form_input, link, log_in_register, submit_button},
};

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid credentials or missing token.";
const MISSING_FIELDS_ERROR_MSG: &str = "Please enter your email and password.";

fn log_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#indicator"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (form_input("Email", "email", "email", email, None))
            (form_input("Password", "password", "password", "", error_message))

            (submit_button("Log in"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                (link(endpoints::REGISTER_VIEW, "Register here"))
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let redirect_url = raw_url.and_then(normalize_redirect_url);

    if let (None, Some(raw_url)) = (&redirect_url, raw_url) {
        tracing::warn!("Invalid redirect URL from {source}: {raw_url}");
    }

    redirect_url
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let log_in_form = log_in_form("", None, redirect_url.as_deref());
    let content = log_in_register("Log in to your account", &log_in_form);
    base("Log In", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub api: ApiClient,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            api: state.api.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The data entered by the user in the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    pub email: String,
    pub password: String,

    /// Optional URL to redirect to after logging in.
    /// Only accepted from the log-in form submission.
    pub redirect_url: Option<String>,
}

/// The message to show under the form when the API refuses the log-in.
fn log_in_error_message(error: &ApiError) -> String {
    match error {
        ApiError::Unauthorized => INVALID_CREDENTIALS_ERROR_MSG.to_owned(),
        ApiError::Rejected { .. } => error.user_message(INVALID_CREDENTIALS_ERROR_MSG),
        _ => error.user_details(),
    }
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the token cookie is set and the client is redirected to the dashboard page,
/// or to the page they were on before being asked to log in.
/// Otherwise, the form is returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();
    let email = user_data.email.trim();

    if email.is_empty() || user_data.password.is_empty() {
        return log_in_form(email, Some(MISSING_FIELDS_ERROR_MSG), redirect_url).into_response();
    }

    let token = match records::log_in(&state.api, email, &user_data.password).await {
        Ok(response) => response
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(BearerToken::new),
        Err(error) => {
            tracing::warn!("Log-in failed: {error}");
            let message = log_in_error_message(&error);
            return log_in_form(email, Some(&message), redirect_url).into_response();
        }
    };

    let Some(token) = token else {
        tracing::warn!("Log-in response did not contain a token.");
        return log_in_form(email, Some(INVALID_CREDENTIALS_ERROR_MSG), redirect_url)
            .into_response();
    };

    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);

    set_auth_cookie(jar.clone(), &token, state.cookie_duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(redirect_url.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting auth cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
        })
        .into_response()
}
