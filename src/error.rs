//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, api::ApiError, internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// Marker placed on a response when the remote API rejected the bearer token.
///
/// The auth middleware looks for this marker, clears the token cookie and
/// sends the client to the log-in page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialRejected;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password were not accepted, or the log-in response did
    /// not contain a token.
    #[error("invalid credentials or missing token")]
    InvalidCredentials,

    /// The remote API rejected the stored bearer token.
    #[error("the credential was rejected by the API")]
    Unauthorized,

    /// The token cookie is missing from the cookie jar in the request, or
    /// it has expired.
    #[error("no token in the cookie jar :(")]
    CookieMissing,

    /// The token could not be serialized to or from the cookie.
    #[error("could not serialize the token cookie: {0}")]
    TokenSerialization(String),

    /// A request to the remote API failed.
    ///
    /// `message` is the user-facing summary of the operation that failed,
    /// e.g. "Failed to add income".
    #[error("{message}: {source}")]
    RemoteOperation { message: String, source: ApiError },

    /// A negative or non-numeric amount was entered.
    #[error("Amount must be 0 or greater")]
    NegativeAmount,

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A string that is neither "INCOME" nor "EXPENSE" was used as a kind.
    #[error("\"{0}\" is not a valid transaction kind")]
    InvalidKind(String),

    /// No category was chosen when adding a transaction.
    #[error("a category must be selected")]
    MissingCategory,

    /// A required registration field was left blank.
    #[error("the field {0} is required")]
    MissingField(&'static str),

    /// The email address does not look like an email address.
    #[error("invalid email address")]
    InvalidEmail,

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The profile image could not be uploaded to the image host.
    #[error("Cloudinary upload failed: {0}")]
    ImageUpload(String),

    /// There were no rows to export. The string is the notice shown to the user.
    #[error("{0}")]
    EmptyExport(&'static str),

    /// The spreadsheet could not be written.
    #[error("could not write the export file: {0}")]
    ExportFailed(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<ApiError> for Error {
    fn from(error: ApiError) -> Self {
        error.context("Something went wrong")
    }
}

fn credential_rejected_response() -> Response {
    (StatusCode::UNAUTHORIZED, Extension(CredentialRejected)).into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Unauthorized => credential_rejected_response(),
            Error::NotFound => NotFoundError.into_response(),
            Error::RemoteOperation { message, source } => {
                tracing::error!("{message}: {source}");
                let fix = source.user_details();
                (
                    StatusCode::BAD_GATEWAY,
                    InternalServerError {
                        description: &message,
                        fix: &fix,
                    }
                    .into_html(),
                )
                    .into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for htmx to swap into the alert container.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Unauthorized => return credential_rejected_response(),
            Error::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Invalid credentials or missing token.".to_owned(),
                },
            ),
            Error::RemoteOperation { message, source } => (
                source.alert_status(),
                Alert::Error {
                    message,
                    details: source.user_details(),
                },
            ),
            Error::NegativeAmount => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Amount must be 0 or greater".to_owned(),
                },
            ),
            Error::EmptyCategoryName => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Category name cannot be empty".to_owned(),
                },
            ),
            Error::MissingCategory => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Please choose a category".to_owned(),
                },
            ),
            Error::MissingField(_) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Please fill in all fields.".to_owned(),
                },
            ),
            Error::InvalidEmail => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Please enter a valid email address.".to_owned(),
                },
            ),
            Error::ImageUpload(message) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Could not upload profile image".to_owned(),
                    details: format!("Cloudinary upload failed: {message}"),
                },
            ),
            Error::EmptyExport(notice) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::ErrorSimple {
                    message: notice.to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
