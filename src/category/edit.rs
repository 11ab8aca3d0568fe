//! Category editing page and endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    Error,
    api::{ApiError, BearerToken, records},
    category::{
        CategoryState,
        form::{CategoryFormView, FormAction},
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, load_error_page},
    model::{CategoryFormData, RecordId, TransactionKind},
    navigation::NavBar,
    session::Session,
};

/// Render the category editing page.
pub async fn get_edit_category_page(
    Path(category_id): Path<String>,
    State(state): State<CategoryState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    let token = session.token()?;
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).with_user(session.user());
    let category_id = RecordId::new(&category_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::CATEGORY_API, &category_id);

    let categories = match records::fetch_categories(&state.api, token).await {
        Ok(categories) => categories,
        Err(ApiError::Unauthorized) => return Err(Error::Unauthorized),
        Err(error) => {
            tracing::error!("Failed to retrieve category {category_id}: {error}");
            return Ok(load_error_page(
                "Edit Category",
                nav_bar.into_html(),
                "Failed to load categories",
            )
            .into_response());
        }
    };

    let form = match categories
        .iter()
        .find(|category| category.id == category_id)
    {
        Some(category) => CategoryFormView {
            action: FormAction::Update(&update_endpoint),
            name: &category.name,
            kind: category.kind.unwrap_or(TransactionKind::Expense),
            error_message: None,
        },
        None => CategoryFormView {
            action: FormAction::Update(&update_endpoint),
            name: "",
            kind: TransactionKind::Expense,
            error_message: Some("Category not found"),
        },
    };

    Ok(edit_category_view(nav_bar, form.into_html()).into_response())
}

/// Handle category update form submission.
pub async fn update_category_endpoint(
    Path(category_id): Path<String>,
    State(state): State<CategoryState>,
    Extension(token): Extension<BearerToken>,
    Form(form_data): Form<CategoryFormData>,
) -> Response {
    let category_id = RecordId::new(&category_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::CATEGORY_API, &category_id);
    let kind = form_data.kind;
    let name = form_data.name.clone();

    let category = match form_data.into_payload() {
        Ok(category) => category,
        Err(error) => {
            return CategoryFormView {
                action: FormAction::Update(&update_endpoint),
                name: &name,
                kind,
                error_message: Some(&format!("Error: {error}")),
            }
            .into_html()
            .into_response();
        }
    };

    match records::update_category(&state.api, &token, &category_id, &category).await {
        Ok(()) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating category {category_id}: {error}");
            error
                .context("Failed to update category")
                .into_alert_response()
        }
    }
}

fn edit_category_view(nav_bar: NavBar<'_>, form: Markup) -> Markup {
    let content = html! {
        (nav_bar.into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Edit category" }
                (form)
            }
        }
    };

    base("Edit Category", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Json, Router,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, put},
    };
    use axum_test::TestServer;
    use scraper::Html;
    use serde_json::{Value, json};

    use crate::{
        api::BearerToken,
        category::CategoryState,
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_form_error_message, assert_form_input_with_value,
            assert_form_submit_button_with_text, assert_hx_endpoint, assert_valid_html,
            mock_api_client, must_get_form, signed_in_session, spawn_mock_api,
        },
    };

    use super::{get_edit_category_page, update_category_endpoint};

    type Captured = Arc<Mutex<Vec<(String, Value)>>>;

    async fn categories() -> Json<Value> {
        Json(json!([
            {"id": "c1", "name": "Salary", "type": "INCOME"},
            {"id": "c2", "name": "Rent", "type": "EXPENSE"}
        ]))
    }

    async fn mock_update(
        State(captured): State<Captured>,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Response {
        if id == "gone" {
            return StatusCode::NOT_FOUND.into_response();
        }

        captured.lock().unwrap().push((id, body));
        StatusCode::OK.into_response()
    }

    async fn get_test_server() -> (TestServer, Captured) {
        let captured = Captured::default();
        let base_url = spawn_mock_api(
            Router::new()
                .route("/categories", get(categories))
                .route("/categories/{id}", put(mock_update))
                .with_state(captured.clone()),
        )
        .await;
        let state = CategoryState {
            api: mock_api_client(&base_url),
        };
        let pages = Router::new()
            .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
            .layer(Extension(signed_in_session()));
        let api = Router::new()
            .route(endpoints::CATEGORY_API, put(update_category_endpoint))
            .layer(Extension(BearerToken::new("good")));
        let app = pages.merge(api).with_state(state);

        (
            TestServer::try_new(app).expect("Could not create test server."),
            captured,
        )
    }

    #[tokio::test]
    async fn edit_page_prefills_form() {
        let (server, _) = get_test_server().await;

        let response = server
            .get(&format_endpoint(endpoints::EDIT_CATEGORY_VIEW, "c1"))
            .await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::CATEGORY_API, "c1"),
            "hx-put",
        );
        assert_form_input_with_value(&form, "name", "text", "Salary");
        assert_form_submit_button_with_text(&form, "Update category");
    }

    #[tokio::test]
    async fn unknown_category_shows_not_found() {
        let (server, _) = get_test_server().await;

        let response = server
            .get(&format_endpoint(endpoints::EDIT_CATEGORY_VIEW, "missing"))
            .await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Category not found");
    }

    #[tokio::test]
    async fn update_sends_trimmed_name_and_redirects() {
        let (server, captured) = get_test_server().await;

        let response = server
            .put(&format_endpoint(endpoints::CATEGORY_API, "c2"))
            .form(&[("name", " Housing "), ("kind", "EXPENSE")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), endpoints::CATEGORIES_VIEW);
        assert_eq!(
            *captured.lock().unwrap(),
            vec![(
                "c2".to_owned(),
                json!({"name": "Housing", "type": "EXPENSE"})
            )]
        );
    }

    #[tokio::test]
    async fn blank_name_rerenders_form_with_error() {
        let (server, captured) = get_test_server().await;

        let response = server
            .put(&format_endpoint(endpoints::CATEGORY_API, "c2"))
            .form(&[("name", "  "), ("kind", "INCOME")])
            .await;

        response.assert_status_ok();
        let html = Html::parse_fragment(&response.text());
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Category name cannot be empty");
        assert!(captured.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn api_failure_shows_alert() {
        let (server, _) = get_test_server().await;

        let response = server
            .put(&format_endpoint(endpoints::CATEGORY_API, "gone"))
            .form(&[("name", "Rent"), ("kind", "EXPENSE")])
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("Failed to update category"));
    }
}
