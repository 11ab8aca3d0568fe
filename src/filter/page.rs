use axum::{
    Extension,
    extract::{RawQuery, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use time::Date;

use crate::{
    Error,
    api::{ApiError, records},
    endpoints,
    filter::{
        FilterQuery, FilterState,
        query::{export_url, with_query},
    },
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, EXPENSE_BADGE_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, INCOME_BADGE_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, load_error_page,
    },
    model::{Category, TransactionKind},
    navigation::NavBar,
    pipeline::{FilterCriteria, KindFilter, QuickRange, Row, Summary, filter_records, summarize},
    session::Session,
};

/// Display the transactions matching the criteria in the query string.
pub async fn get_filters_page(
    State(state): State<FilterState>,
    Extension(session): Extension<Session>,
    RawQuery(raw_query): RawQuery,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let token = session.token()?;
    let nav_bar = NavBar::new(endpoints::FILTERS_VIEW).with_user(session.user());
    let today = state.today()?;
    let criteria = query.to_criteria(today);

    let records = match records::fetch_all(&state.api, token).await {
        Ok(records) => records,
        Err(ApiError::Unauthorized) => return Err(Error::Unauthorized),
        Err(error) => {
            tracing::error!("Could not load filters page data: {error}");
            return Ok(
                load_error_page("Filters", nav_bar.into_html(), "Failed to load data")
                    .into_response(),
            );
        }
    };

    let rows = filter_records(
        &records.incomes,
        &records.expenses,
        &records.categories,
        &criteria,
    );

    Ok(filters_view(FiltersView {
        nav_bar,
        criteria: &criteria,
        categories: &records.categories,
        rows: &rows,
        export_url: &export_url(raw_query.as_deref()),
    })
    .into_response())
}

struct FiltersView<'a> {
    nav_bar: NavBar<'a>,
    criteria: &'a FilterCriteria,
    categories: &'a [Category],
    rows: &'a [Row],
    export_url: &'a str,
}

fn filters_view(view: FiltersView<'_>) -> Markup {
    let summary = summarize(view.rows);

    let content = html!(
        (view.nav_bar.into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-6xl space-y-4"
            {
                header class="flex items-center justify-between"
                {
                    h1 class="text-xl font-bold" { "Filters" }

                    div class="flex items-center gap-2"
                    {
                        button
                            type="button"
                            hx-get=(view.export_url)
                            hx-target-error="#alert-container"
                            hx-swap="none"
                            title="Download filtered"
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Download (" (summary.count) ")"
                        }

                        a href=(endpoints::FILTERS_VIEW) class=(LINK_STYLE) { "Reset" }
                    }
                }

                (criteria_form(view.criteria, view.categories))
                (summary_view(summary))
                (results_table(view.rows))
            }
        }
    );

    base("Filters", &[], &content)
}

fn date_value(date: Option<Date>) -> String {
    date.map(|date| date.to_string()).unwrap_or_default()
}

fn amount_value(amount: Option<f64>) -> String {
    amount.map(|amount| amount.to_string()).unwrap_or_default()
}

fn criteria_form(criteria: &FilterCriteria, categories: &[Category]) -> Markup {
    let selectable = categories
        .iter()
        .filter(|category| category.kind.is_none_or(|kind| criteria.kind.includes(kind)));

    html! {
        form
            method="get"
            action=(endpoints::FILTERS_VIEW)
            class={ "grid grid-cols-1 gap-3 sm:grid-cols-2 lg:grid-cols-4 " (CARD_STYLE) }
        {
            div class="sm:col-span-2 lg:col-span-4 flex flex-wrap items-center gap-2"
            {
                span class="text-xs text-gray-600 dark:text-gray-400" { "Quick ranges:" }

                @for range in QuickRange::ALL {
                    button
                        type="submit"
                        name="range"
                        value=(range.code())
                        class="rounded-md bg-gray-100 dark:bg-gray-700 px-2 py-1 text-xs hover:bg-gray-200 dark:hover:bg-gray-600"
                    {
                        (range.label())
                    }
                }
            }

            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

                select id="kind" name="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for kind in KindFilter::ALL {
                        option value=(kind.code()) selected[kind == criteria.kind] { (kind.label()) }
                    }
                }
            }

            div
            {
                label for="from" class=(FORM_LABEL_STYLE) { "From" }
                input id="from" name="from" type="date" value=(date_value(criteria.date_from)) class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="to" class=(FORM_LABEL_STYLE) { "To" }
                input id="to" name="to" type="date" value=(date_value(criteria.date_to)) class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="q" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    id="q"
                    name="q"
                    type="text"
                    placeholder="Category contains..."
                    value=(criteria.search_text)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            fieldset class="sm:col-span-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Categories" }

                div class="flex flex-wrap gap-2"
                {
                    @for category in selectable {
                        @let id = format!("category-{}", category.id);

                        label for=(id) class="inline-flex items-center gap-1 rounded-full border border-gray-300 dark:border-gray-600 px-3 py-1 text-xs"
                        {
                            input
                                id=(id)
                                type="checkbox"
                                name="category"
                                value=(category.id.as_str())
                                checked[criteria.category_ids.contains(&category.id)];
                            (category.name)
                        }
                    }
                }
            }

            div
            {
                label for="min" class=(FORM_LABEL_STYLE) { "Min amount" }
                input id="min" name="min" type="number" min="0" step="0.01" value=(amount_value(criteria.min_amount)) class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="max" class=(FORM_LABEL_STYLE) { "Max amount" }
                input id="max" name="max" type="number" min="0" step="0.01" value=(amount_value(criteria.max_amount)) class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="sm:col-span-2 lg:col-span-4"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply filters" }
            }
        }
    }
}

fn summary_card(title: &str, amount: f64, amount_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            p class="text-xs text-gray-500 dark:text-gray-400" { (title) }
            p class={ "mt-1 text-base font-semibold " (amount_style) } { (format_currency(amount)) }
        }
    }
}

fn summary_view(summary: Summary) -> Markup {
    html! {
        section id="filter-summary" class="grid grid-cols-1 gap-3 sm:grid-cols-3"
        {
            (summary_card("Income total", summary.income_total, "text-emerald-700 dark:text-emerald-400"))
            (summary_card("Expense total", summary.expense_total, "text-rose-700 dark:text-rose-400"))
            (summary_card("Net", summary.net, ""))
        }
    }
}

fn results_table(rows: &[Row]) -> Markup {
    html! {
        div class="overflow-x-auto"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                    }
                }

                tbody
                {
                    @for row in rows {
                        @let (badge_style, sign) = match row.kind {
                            TransactionKind::Income => (INCOME_BADGE_STYLE, "+"),
                            TransactionKind::Expense => (EXPENSE_BADGE_STYLE, "-"),
                        };

                        tr class=(TABLE_ROW_STYLE) data-filter-row="true"
                        {
                            td class=(TABLE_CELL_STYLE) { (row.date.to_string()) }
                            td class=(TABLE_CELL_STYLE) { span class=(badge_style) { (row.kind.fallback_label()) } }
                            td class=(TABLE_CELL_STYLE) { (row.category_name) }
                            td class=(TABLE_CELL_STYLE) { (sign) " " (format_currency(row.amount)) }
                        }
                    }

                    @if rows.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="4" class="px-6 py-4 text-center"
                            {
                                "No results match your current filters."
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The filters page URL for the same query, used when an export has nothing to download.
pub(super) fn filters_url(raw_query: Option<&str>) -> String {
    with_query(endpoints::FILTERS_VIEW, raw_query)
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
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        filter::FilterState,
        test_utils::{assert_valid_html, mock_api_client, signed_in_session, spawn_mock_api},
    };

    use super::get_filters_page;

    async fn incomes() -> Json<Value> {
        Json(json!([
            {"id": "i1", "amount": 1500, "date": "2024-03-01", "categoryId": "c1"},
            {"id": "i2", "amount": 150, "date": "2024-03-02", "categoryId": "c1"}
        ]))
    }

    async fn expenses() -> Json<Value> {
        Json(json!([
            {"id": "e1", "amount": "150", "date": "2024-03-05", "categoryId": "c2"},
            {"id": "e2", "amount": 99, "date": "2024-02-10", "categoryId": "c3"},
            {"id": "e3", "amount": 5000, "categoryId": "c2"}
        ]))
    }

    async fn categories() -> Json<Value> {
        Json(json!([
            {"id": "c1", "name": "Salary", "type": "INCOME"},
            {"id": "c2", "name": "Rent", "type": "EXPENSE"},
            {"id": "c3", "name": "Groceries", "type": "EXPENSE"}
        ]))
    }

    async fn get_test_server(mock_api: Router) -> TestServer {
        let base_url = spawn_mock_api(mock_api).await;
        let state = FilterState {
            api: mock_api_client(&base_url),
            local_timezone: "Etc/UTC".to_owned(),
        };
        let app = Router::new()
            .route(endpoints::FILTERS_VIEW, get(get_filters_page))
            .layer(Extension(signed_in_session()))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn working_api() -> Router {
        Router::new()
            .route("/incomes", get(incomes))
            .route("/expenses", get(expenses))
            .route("/categories", get(categories))
    }

    fn row_texts(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("tr[data-filter-row]").unwrap())
            .map(|row| row.text().collect::<Vec<_>>().join(" "))
            .collect()
    }

    #[tokio::test]
    async fn no_criteria_lists_everything_by_date() {
        let server = get_test_server(working_api()).await;

        let response = server.get(endpoints::FILTERS_VIEW).await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        let rows = row_texts(&html);
        assert_eq!(rows.len(), 4);
        assert!(rows[0].contains("2024-02-10") && rows[0].contains("Groceries"));
        assert!(rows[3].contains("2024-03-05") && rows[3].contains("Rent"));
    }

    #[tokio::test]
    async fn amount_range_and_kind_narrow_results() {
        let server = get_test_server(working_api()).await;

        let response = server
            .get(endpoints::FILTERS_VIEW)
            .add_query_param("kind", "INCOME")
            .add_query_param("min", "100")
            .add_query_param("max", "200")
            .await;

        let html = Html::parse_document(&response.text());
        let rows = row_texts(&html);
        assert_eq!(rows.len(), 1, "got {rows:?}");
        assert!(rows[0].contains("Salary"));
        assert!(rows[0].contains("₹150.00"));
    }

    #[tokio::test]
    async fn repeated_categories_are_combined() {
        let server = get_test_server(working_api()).await;

        let response = server
            .get(&format!("{}?category=c2&category=c3", endpoints::FILTERS_VIEW))
            .await;

        let html = Html::parse_document(&response.text());
        assert_eq!(row_texts(&html).len(), 2);
        let checked: Vec<&str> = html
            .select(&Selector::parse("input[type=checkbox][checked]").unwrap())
            .filter_map(|input| input.value().attr("value"))
            .collect();
        assert_eq!(checked, vec!["c2", "c3"]);
    }

    #[tokio::test]
    async fn summary_and_download_reflect_results() {
        let server = get_test_server(working_api()).await;

        let response = server
            .get(&format!("{}?q=sal", endpoints::FILTERS_VIEW))
            .await;

        let html = Html::parse_document(&response.text());
        let summary = html
            .select(&Selector::parse("#filter-summary").unwrap())
            .next()
            .expect("No summary")
            .text()
            .collect::<String>();
        assert!(summary.contains("₹1,650.00"), "got {summary}");
        let download = html
            .select(&Selector::parse("button[hx-get]").unwrap())
            .next()
            .expect("No download button");
        assert_eq!(
            download.value().attr("hx-get"),
            Some("/filters/export?q=sal")
        );
        assert!(download.text().collect::<String>().contains("Download (2)"));
    }

    #[tokio::test]
    async fn empty_results_show_message() {
        let server = get_test_server(working_api()).await;

        let response = server
            .get(&format!("{}?q=nothing", endpoints::FILTERS_VIEW))
            .await;

        assert!(
            response
                .text()
                .contains("No results match your current filters.")
        );
    }

    #[tokio::test]
    async fn load_failure_shows_message() {
        async fn server_error() -> Response {
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }

        let server = get_test_server(
            Router::new()
                .route("/incomes", get(incomes))
                .route("/expenses", get(expenses))
                .route("/categories", get(server_error)),
        )
        .await;

        let response = server.get(endpoints::FILTERS_VIEW).await;

        response.assert_status_ok();
        assert!(response.text().contains("Failed to load data"));
    }
}
