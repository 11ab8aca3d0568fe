//! The page shown for routes and records that do not exist.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{endpoints, html::error_view};

/// A 404 page pointing the user back to the dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundError;

impl IntoResponse for NotFoundError {
    fn into_response(self) -> Response {
        let fix = format!(
            "Check the address or head back to the dashboard at {}.",
            endpoints::DASHBOARD_VIEW
        );

        (
            StatusCode::NOT_FOUND,
            Html(
                error_view(
                    "Not Found",
                    "404",
                    "Sorry, we couldn't find that page.",
                    &fix,
                )
                .into_string(),
            ),
        )
            .into_response()
    }
}

pub async fn get_404_not_found() -> Response {
    NotFoundError.into_response()
}
