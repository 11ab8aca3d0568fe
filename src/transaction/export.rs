//! Spreadsheet downloads of this month's income or expenses.
//!
//! The download button sends an htmx request first so that an empty month can
//! be reported with an alert. Otherwise the client is redirected to the same
//! URL and the browser downloads the file with a plain GET.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::{HxRedirect, HxRequest};

use crate::{
    Error,
    api::records,
    endpoints,
    export::{ExportTable, attachment, month_file_name, to_csv},
    model::TransactionKind,
    session::Session,
    transaction::{
        TransactionState,
        page::{categories_of_kind, this_months_records},
    },
};

/// Download this month's income.
pub async fn export_incomes(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    HxRequest(is_htmx): HxRequest,
) -> Response {
    export_transactions(TransactionKind::Income, &state, &session, is_htmx).await
}

/// Download this month's expenses.
pub async fn export_expenses(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    HxRequest(is_htmx): HxRequest,
) -> Response {
    export_transactions(TransactionKind::Expense, &state, &session, is_htmx).await
}

fn export_failed_message(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "Failed to load incomes or categories",
        TransactionKind::Expense => "Failed to load expenses or categories",
    }
}

async fn build_export(
    kind: TransactionKind,
    state: &TransactionState,
    session: &Session,
) -> Result<(String, Vec<u8>), Error> {
    let token = session.token()?;
    let today = state.today()?;

    let (records, categories) = records::fetch_kind_with_categories(&state.api, token, kind)
        .await
        .inspect_err(|error| tracing::error!("Could not load {} export: {error}", kind.slug()))
        .map_err(|error| error.context(export_failed_message(kind)))?;

    let categories = categories_of_kind(categories, kind);
    let records = this_months_records(records, today);
    let table = ExportTable::for_transactions(&records, &categories, kind);

    Ok((month_file_name(kind, today), to_csv(&table)?))
}

async fn export_transactions(
    kind: TransactionKind,
    state: &TransactionState,
    session: &Session,
    is_htmx: bool,
) -> Response {
    let export_url = endpoints::transactions_export(kind);

    match (build_export(kind, state, session).await, is_htmx) {
        (Ok(_), true) => (HxRedirect(export_url.to_owned()), StatusCode::OK).into_response(),
        (Ok((file_name, bytes)), false) => attachment(&file_name, bytes),
        (Err(error), true) => error.into_alert_response(),
        (Err(Error::EmptyExport(_)), false) => {
            Redirect::to(endpoints::transactions_view(kind)).into_response()
        }
        (Err(error), false) => error.into_response(),
    }
}
