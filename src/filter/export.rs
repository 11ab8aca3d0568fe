use axum::{
    Extension,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Query;
use axum_htmx::{HxRedirect, HxRequest};

use crate::{
    Error,
    api::records,
    export::{ExportTable, attachment, filters_file_name, to_csv},
    filter::{
        FilterQuery, FilterState,
        page::filters_url,
        query::export_url,
    },
    pipeline::filter_records,
    session::Session,
};

/// Download the rows matching the criteria in the query string.
pub async fn export_filtered(
    State(state): State<FilterState>,
    Extension(session): Extension<Session>,
    HxRequest(is_htmx): HxRequest,
    RawQuery(raw_query): RawQuery,
    Query(query): Query<FilterQuery>,
) -> Response {
    match (build_export(&state, &session, &query).await, is_htmx) {
        (Ok(_), true) => {
            (HxRedirect(export_url(raw_query.as_deref())), StatusCode::OK).into_response()
        }
        (Ok((file_name, bytes)), false) => attachment(&file_name, bytes),
        (Err(error), true) => error.into_alert_response(),
        (Err(Error::EmptyExport(_)), false) => {
            Redirect::to(&filters_url(raw_query.as_deref())).into_response()
        }
        (Err(error), false) => error.into_response(),
    }
}

async fn build_export(
    state: &FilterState,
    session: &Session,
    query: &FilterQuery,
) -> Result<(String, Vec<u8>), Error> {
    let token = session.token()?;
    let criteria = query.to_criteria(state.today()?);

    let records = records::fetch_all(&state.api, token)
        .await
        .inspect_err(|error| tracing::error!("Could not load filtered export: {error}"))
        .map_err(|error| error.context("Failed to load data"))?;

    let rows = filter_records(
        &records.incomes,
        &records.expenses,
        &records.categories,
        &criteria,
    );
    let table = ExportTable::for_filtered_rows(&rows);

    Ok((filters_file_name(&criteria), to_csv(&table)?))
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Json, Router,
        http::{StatusCode, header::CONTENT_DISPOSITION},
        routing::get,
    };
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        endpoints,
        filter::FilterState,
        test_utils::{mock_api_client, signed_in_session, spawn_mock_api},
    };

    use super::export_filtered;

    async fn get_test_server() -> TestServer {
        let base_url = spawn_mock_api(
            Router::new()
                .route(
                    "/incomes",
                    get(|| async {
                        Json(json!([{"id": "i1", "amount": 1500, "date": "2024-03-01", "categoryId": "c1"}]))
                    }),
                )
                .route(
                    "/expenses",
                    get(|| async {
                        Json(json!([{"id": "e1", "amount": 40, "date": "2024-03-02", "categoryId": "c2"}]))
                    }),
                )
                .route(
                    "/categories",
                    get(|| async {
                        Json(json!([
                            {"id": "c1", "name": "Salary", "type": "INCOME"},
                            {"id": "c2", "name": "Snacks, misc", "type": "EXPENSE"}
                        ]))
                    }),
                ),
        )
        .await;
        let state = FilterState {
            api: mock_api_client(&base_url),
            local_timezone: "Etc/UTC".to_owned(),
        };
        let app = Router::new()
            .route(endpoints::FILTERS_EXPORT, get(export_filtered))
            .layer(Extension(signed_in_session()))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn htmx_request_redirects_with_same_query() {
        let server = get_test_server().await;

        let response = server
            .get("/filters/export?kind=EXPENSE")
            .add_header("HX-Request", "true")
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), "/filters/export?kind=EXPENSE");
    }

    #[tokio::test]
    async fn plain_request_downloads_matching_rows() {
        let server = get_test_server().await;

        let response = server
            .get("/filters/export?kind=EXPENSE&from=2024-03-01")
            .await;

        response.assert_status_ok();
        let disposition = response.header(CONTENT_DISPOSITION);
        assert_eq!(
            disposition.to_str().unwrap(),
            "attachment; filename=\"filters_expense_2024-03-01_any.csv\""
        );
        let text = response.text();
        assert!(
            text.contains("Date,Type,Category,Amount,Amount_INR,Id"),
            "got {text}"
        );
        assert!(
            text.contains("02/03/2024,Expense,\"Snacks, misc\",40,₹40.00,e1"),
            "got {text}"
        );
        assert!(!text.contains("Salary"), "got {text}");
    }

    #[tokio::test]
    async fn no_matching_rows_shows_notice() {
        let server = get_test_server().await;

        let response = server
            .get("/filters/export?min=100000")
            .add_header("HX-Request", "true")
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.text().contains("No rows match the current filters."));
    }

    #[tokio::test]
    async fn no_matching_rows_plain_request_returns_to_filters() {
        let server = get_test_server().await;

        let response = server.get("/filters/export?min=100000").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/filters?min=100000");
    }
}
