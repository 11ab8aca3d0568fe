//! HTTP client wrapper for the remote REST API.

use std::time::Duration;

use axum::http::StatusCode;
use reqwest::{Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Error, api::paths::CREDENTIAL_EXCLUDED};

/// The bearer token issued by the remote API at log-in.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: &str) -> Self {
        Self(token.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens end up in request logs via `Extension` debug output, so keep them out.
impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(********)")
    }
}

/// The ways a request to the remote API can fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No response was received.
    #[error("could not reach the API: {0}")]
    Network(String),

    /// The API answered 401.
    #[error("the API rejected the credential")]
    Unauthorized,

    /// The API answered 403.
    #[error("access denied")]
    Forbidden,

    /// The API answered with a 5xx status.
    #[error("the API returned a server error ({status})")]
    Server { status: u16 },

    /// The API answered with any other non-success status. `message` is the
    /// `message` field of the response body, if there was one.
    #[error("the API rejected the request ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    /// The response body was not the expected JSON.
    #[error("could not decode the API response: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("could not build the HTTP client: {0}")]
    Client(String),
}

impl ApiError {
    /// Attach the user-facing summary of the operation that failed.
    ///
    /// A rejected credential stays [Error::Unauthorized] so that the auth
    /// middleware can send the user back to the log-in page.
    pub fn context(self, message: &str) -> Error {
        match self {
            ApiError::Unauthorized => Error::Unauthorized,
            source => Error::RemoteOperation {
                message: message.to_owned(),
                source,
            },
        }
    }

    /// The server's own message if it sent one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_owned(),
        }
    }

    /// A short explanation suitable for showing under an error heading.
    pub fn user_details(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_owned()
            }
            ApiError::Unauthorized => "Your session has expired. Please log in again.".to_owned(),
            ApiError::Forbidden => "Access denied.".to_owned(),
            ApiError::Server { .. } => "Server error. Try again later.".to_owned(),
            ApiError::Rejected { status, .. } => {
                self.user_message(&format!("The request was rejected (status {status})."))
            }
            ApiError::Decode(_) | ApiError::Client(_) => {
                "The server sent an unexpected response. Try again later.".to_owned()
            }
        }
    }

    /// The status code to use when reporting this error to the browser.
    pub fn alert_status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Rejected { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(StatusCode::is_client_error)
                .unwrap_or(StatusCode::BAD_REQUEST),
            ApiError::Network(_) | ApiError::Server { .. } | ApiError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Whether a request to `path` should carry the bearer token.
pub fn requires_credential(path: &str) -> bool {
    !CREDENTIAL_EXCLUDED
        .iter()
        .any(|excluded| path.contains(excluded))
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// A client for the remote REST API.
///
/// Cloning is cheap, the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API at `base_url`, e.g. "http://localhost:8080/api/v1.0".
    ///
    /// Requests that take longer than `timeout` fail with [ApiError::Network].
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ApiError::Client(error.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&BearerToken>) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        match token {
            Some(token) if requires_credential(path) => builder.bearer_auth(token.as_str()),
            _ => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|error| {
            tracing::error!("Network error: {error}");
            ApiError::Network(error.to_string())
        })?;

        check_status(response).await
    }

    /// GET `path` and decode the JSON response.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&BearerToken>,
    ) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path, token)).await?;

        decode(response).await
    }

    /// POST `body` as JSON to `path` and decode the JSON response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&BearerToken>,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.request(Method::POST, path, token).json(body))
            .await?;

        decode(response).await
    }

    /// POST `body` as JSON to `path`, ignoring the response body.
    pub async fn post<B: Serialize>(
        &self,
        path: &str,
        token: Option<&BearerToken>,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, path, token).json(body))
            .await
            .map(|_| ())
    }

    /// PUT `body` as JSON to `path`, ignoring the response body.
    pub async fn put_json<B: Serialize>(
        &self,
        path: &str,
        token: Option<&BearerToken>,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(self.request(Method::PUT, path, token).json(body))
            .await
            .map(|_| ())
    }

    pub async fn delete(&self, path: &str, token: Option<&BearerToken>) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path, token))
            .await
            .map(|_| ())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let path = response.url().path().to_owned();

    match status {
        StatusCode::UNAUTHORIZED => {
            tracing::warn!("Credential rejected by {path}.");
            Err(ApiError::Unauthorized)
        }
        StatusCode::FORBIDDEN => {
            tracing::warn!("Access denied for {path}.");
            Err(ApiError::Forbidden)
        }
        status if status.is_server_error() => {
            tracing::error!("Server error from {path}: {status}");
            Err(ApiError::Server {
                status: status.as_u16(),
            })
        }
        status => {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message);

            Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|error| ApiError::Network(error.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|error| {
        tracing::error!("Could not decode API response: {error}");
        ApiError::Decode(error.to_string())
    })
}
