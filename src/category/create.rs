use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    api::{BearerToken, records},
    category::CategoryState,
    endpoints,
    model::CategoryFormData,
};

/// A route handler for creating a category, redirects to the categories page on success.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(token): Extension<BearerToken>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let category = match form.into_payload() {
        Ok(category) => category,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = records::create_category(&state.api, &token, &category)
        .await
        .inspect_err(|error| tracing::error!("could not create category {}: {error}", category.name))
    {
        return error.context("Failed to add category").into_alert_response();
    }

    (
        HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
