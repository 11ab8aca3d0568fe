//! Defines the endpoints for adding income and expenses.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    api::{BearerToken, records},
    endpoints,
    model::{NewTransaction, RecordId, TransactionKind, parse_day, validate_amount},
    transaction::TransactionState,
};

/// The form data for adding income or an expense.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The amount in rupees as typed, validated before anything is sent.
    pub amount: String,
    /// The date as "YYYY-MM-DD". Today is used when it is left blank.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl TransactionForm {
    fn into_new_transaction(self, today: Date) -> Result<NewTransaction, Error> {
        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::NegativeAmount)
            .and_then(validate_amount)?;

        let date = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty())
            .and_then(parse_day)
            .unwrap_or(today);

        let category_id = self
            .category_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(RecordId::new)
            .ok_or(Error::MissingCategory)?;

        let icon = self
            .icon
            .map(|icon| icon.trim().to_owned())
            .filter(|icon| !icon.is_empty());

        Ok(NewTransaction {
            amount,
            date,
            category_id,
            icon,
        })
    }
}

fn add_failed_message(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "Failed to add income",
        TransactionKind::Expense => "Failed to add expense",
    }
}

/// A route handler for adding income, redirects to the income page on success.
pub async fn create_income_endpoint(
    State(state): State<TransactionState>,
    Extension(token): Extension<BearerToken>,
    Form(form): Form<TransactionForm>,
) -> Response {
    create_transaction_endpoint(TransactionKind::Income, &state, &token, form).await
}

/// A route handler for adding an expense, redirects to the expense page on success.
pub async fn create_expense_endpoint(
    State(state): State<TransactionState>,
    Extension(token): Extension<BearerToken>,
    Form(form): Form<TransactionForm>,
) -> Response {
    create_transaction_endpoint(TransactionKind::Expense, &state, &token, form).await
}

async fn create_transaction_endpoint(
    kind: TransactionKind,
    state: &TransactionState,
    token: &BearerToken,
    form: TransactionForm,
) -> Response {
    let today = match state.today() {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let transaction = match form.into_new_transaction(today) {
        Ok(transaction) => transaction,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = records::create_transaction(&state.api, token, kind, &transaction)
        .await
        .inspect_err(|error| tracing::error!("could not create {}: {error}", kind.slug()))
    {
        return error.context(add_failed_message(kind)).into_alert_response();
    }

    (
        HxRedirect(endpoints::transactions_view(kind).to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
