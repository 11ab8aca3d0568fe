use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    Error,
    alert::Alert,
    api::{ApiError, BearerToken, records},
    model::{RecordId, TransactionKind},
    transaction::TransactionState,
};

/// A route handler for deleting income, responds with an alert.
pub async fn delete_income_endpoint(
    State(state): State<TransactionState>,
    Extension(token): Extension<BearerToken>,
    Path(income_id): Path<String>,
) -> Response {
    delete_transaction_endpoint(TransactionKind::Income, &state, &token, income_id).await
}

/// A route handler for deleting an expense, responds with an alert.
pub async fn delete_expense_endpoint(
    State(state): State<TransactionState>,
    Extension(token): Extension<BearerToken>,
    Path(expense_id): Path<String>,
) -> Response {
    delete_transaction_endpoint(TransactionKind::Expense, &state, &token, expense_id).await
}

/// The alert message for a failed delete when the server did not send one.
fn delete_failed_message(kind: TransactionKind, error: &ApiError) -> String {
    let fallback = match (kind, error) {
        (TransactionKind::Income, ApiError::Forbidden) => "Not authorized to delete income",
        (TransactionKind::Expense, ApiError::Forbidden) => "Not authorized to delete expense",
        (TransactionKind::Income, _) => "Failed to delete income",
        (TransactionKind::Expense, _) => "Failed to delete expense",
    };

    error.user_message(fallback)
}

async fn delete_transaction_endpoint(
    kind: TransactionKind,
    state: &TransactionState,
    token: &BearerToken,
    id: String,
) -> Response {
    let id = RecordId::new(&id);

    match records::delete_transaction(&state.api, token, kind, &id).await {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => {
            let alert = Alert::Success {
                message: format!("Deleted {} entry", kind.slug()),
                details: String::new(),
            };

            html! {
                div hx-swap-oob="innerHTML:#alert-container" { (alert.into_html()) }
            }
            .into_response()
        }
        Err(ApiError::Unauthorized) => Error::Unauthorized.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete {} {id}: {error}", kind.slug());
            let status = error.alert_status();

            (
                status,
                Alert::ErrorSimple {
                    message: delete_failed_message(kind, &error),
                }
                .into_html(),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Json, Router,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::delete,
    };
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        api::{ApiError, BearerToken},
        endpoints::{self, format_endpoint},
        model::TransactionKind,
        test_utils::{mock_api_client, spawn_mock_api},
        transaction::TransactionState,
    };

    use super::{delete_expense_endpoint, delete_failed_message, delete_income_endpoint};

    type Deleted = Arc<Mutex<Vec<String>>>;

    async fn mock_delete(State(deleted): State<Deleted>, Path(id): Path<String>) -> Response {
        match id.as_str() {
            "forbidden" => StatusCode::FORBIDDEN.into_response(),
            "expired" => StatusCode::UNAUTHORIZED.into_response(),
            "locked" => (
                StatusCode::CONFLICT,
                Json(json!({"message": "Entry is locked"})),
            )
                .into_response(),
            _ => {
                deleted.lock().unwrap().push(id);
                StatusCode::NO_CONTENT.into_response()
            }
        }
    }

    async fn get_test_server() -> (TestServer, Deleted) {
        let deleted = Deleted::default();
        let base_url = spawn_mock_api(
            Router::new()
                .route("/incomes/{id}", delete(mock_delete))
                .route("/expenses/{id}", delete(mock_delete))
                .with_state(deleted.clone()),
        )
        .await;
        let state = TransactionState {
            api: mock_api_client(&base_url),
            local_timezone: "Etc/UTC".to_owned(),
        };
        let app = Router::new()
            .route(endpoints::INCOME_RECORD, delete(delete_income_endpoint))
            .route(endpoints::EXPENSE_RECORD, delete(delete_expense_endpoint))
            .layer(Extension(BearerToken::new("good")))
            .with_state(state);

        (
            TestServer::try_new(app).expect("Could not create test server."),
            deleted,
        )
    }

    #[tokio::test]
    async fn deletes_income_with_success_alert() {
        let (server, deleted) = get_test_server().await;

        let response = server
            .delete(&format_endpoint(endpoints::INCOME_RECORD, "i1"))
            .await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("hx-swap-oob"), "got {text}");
        assert!(text.contains("Deleted income entry"), "got {text}");
        assert_eq!(*deleted.lock().unwrap(), vec!["i1".to_owned()]);
    }

    #[tokio::test]
    async fn forbidden_delete_is_not_authorized() {
        let (server, _) = get_test_server().await;

        let response = server
            .delete(&format_endpoint(endpoints::EXPENSE_RECORD, "forbidden"))
            .await;

        response.assert_status_forbidden();
        assert!(response.text().contains("Not authorized to delete expense"));
    }

    #[tokio::test]
    async fn server_message_is_shown() {
        let (server, _) = get_test_server().await;

        let response = server
            .delete(&format_endpoint(endpoints::EXPENSE_RECORD, "locked"))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert!(response.text().contains("Entry is locked"));
    }

    #[tokio::test]
    async fn expired_credential_is_marked() {
        let (server, deleted) = get_test_server().await;

        let response = server
            .delete(&format_endpoint(endpoints::INCOME_RECORD, "expired"))
            .await;

        response.assert_status_unauthorized();
        assert!(deleted.lock().unwrap().is_empty());
    }

    #[test]
    fn falls_back_to_failed_message() {
        let error = ApiError::Server { status: 500 };

        assert_eq!(
            delete_failed_message(TransactionKind::Income, &error),
            "Failed to delete income"
        );
    }
}
