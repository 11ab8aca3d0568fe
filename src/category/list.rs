//! Categories listing page with the form for adding a category.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    api::{ApiError, records},
    category::{
        CategoryState,
        form::{CategoryFormView, FormAction},
    },
    endpoints,
    html::{
        CARD_STYLE, EXPENSE_BADGE_STYLE, INCOME_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, load_error_page,
    },
    model::{Category, TransactionKind},
    navigation::NavBar,
    session::Session,
};

/// Render the categories listing page.
pub async fn get_categories_page(
    State(state): State<CategoryState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    let token = session.token()?;
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).with_user(session.user());

    match records::fetch_categories(&state.api, token).await {
        Ok(categories) => Ok(categories_view(nav_bar, &categories).into_response()),
        Err(ApiError::Unauthorized) => Err(Error::Unauthorized),
        Err(error) => {
            tracing::error!("Failed to retrieve categories: {error}");
            Ok(
                load_error_page("Categories", nav_bar.into_html(), "Failed to load categories")
                    .into_response(),
            )
        }
    }
}

fn kind_badge(kind: Option<TransactionKind>) -> Markup {
    match kind {
        Some(TransactionKind::Income) => html!(span class=(INCOME_BADGE_STYLE) { "Income" }),
        Some(TransactionKind::Expense) => html!(span class=(EXPENSE_BADGE_STYLE) { "Expense" }),
        None => html!(span class="text-gray-400 dark:text-gray-500" { "-" }),
    }
}

fn categories_view(nav_bar: NavBar<'_>, categories: &[Category]) -> Markup {
    let add_form = CategoryFormView {
        action: FormAction::Create(endpoints::CATEGORIES_API),
        name: "",
        kind: TransactionKind::Expense,
        error_message: None,
    }
    .into_html();

    let content = html!(
        (nav_bar.into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-5xl space-y-4"
            {
                h1 class="text-xl font-bold" { "Categories" }

                div class="grid grid-cols-1 lg:grid-cols-3 gap-4"
                {
                    div class={ "lg:col-span-1 " (CARD_STYLE) }
                    {
                        h2 class="text-lg font-semibold mb-4" { "Add category" }
                        (add_form)
                    }

                    div class="lg:col-span-2 overflow-x-auto"
                    {
                        table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                                }
                            }

                            tbody
                            {
                                @for category in categories {
                                    tr class=(TABLE_ROW_STYLE) data-category-row="true"
                                    {
                                        td class=(TABLE_CELL_STYLE) { (category.name) }
                                        td class=(TABLE_CELL_STYLE) { (kind_badge(category.kind)) }
                                        td class=(TABLE_CELL_STYLE)
                                        {
                                            a
                                                href=(endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, &category.id))
                                                class=(LINK_STYLE)
                                            {
                                                "Edit"
                                            }
                                        }
                                    }
                                }

                                @if categories.is_empty() {
                                    tr class=(TABLE_ROW_STYLE)
                                    {
                                        td colspan="3" class="px-6 py-4 text-center"
                                        {
                                            "No categories yet. Add one to start tracking."
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Categories", &[], &content)
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Json, Router,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
    };
    use axum_test::TestServer;
    use scraper::{Html, Selector};
    use serde_json::json;

    use crate::{
        category::CategoryState,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_valid_html, mock_api_client, must_get_form, signed_in_session, spawn_mock_api,
        },
    };

    use super::get_categories_page;

    async fn get_test_server(mock_api: Router) -> TestServer {
        let base_url = spawn_mock_api(mock_api).await;
        let state = CategoryState {
            api: mock_api_client(&base_url),
        };
        let app = Router::new()
            .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
            .layer(Extension(signed_in_session()))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn lists_categories_with_edit_links() {
        let server = get_test_server(Router::new().route(
            "/categories",
            get(|| async {
                Json(json!([
                    {"id": 7, "name": "Salary", "type": "INCOME"},
                    {"id": "c2", "name": "Rent", "categoryType": "EXPENSE"}
                ]))
            }),
        ))
        .await;

        let response = server.get(endpoints::CATEGORIES_VIEW).await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        let rows: Vec<String> = html
            .select(&Selector::parse("tr[data-category-row]").unwrap())
            .map(|row| row.text().collect())
            .collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("Salary") && rows[0].contains("Income"));
        assert!(rows[1].contains("Rent") && rows[1].contains("Expense"));
        let links: Vec<&str> = html
            .select(&Selector::parse("tr[data-category-row] a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert_eq!(links, vec!["/categories/7/edit", "/categories/c2/edit"]);
    }

    #[tokio::test]
    async fn page_has_add_form() {
        let server = get_test_server(
            Router::new().route("/categories", get(|| async { Json(json!([])) })),
        )
        .await;

        let response = server.get(endpoints::CATEGORIES_VIEW).await;

        let html = Html::parse_document(&response.text());
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::CATEGORIES_API, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_submit_button_with_text(&form, "Add category");
    }

    #[tokio::test]
    async fn load_failure_shows_message() {
        async fn server_error() -> Response {
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }

        let server =
            get_test_server(Router::new().route("/categories", get(server_error))).await;

        let response = server.get(endpoints::CATEGORIES_VIEW).await;

        response.assert_status_ok();
        assert!(response.text().contains("Failed to load categories"));
    }
}
