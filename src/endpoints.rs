//! The URIs served by this app.
//!
//! For endpoints that take a parameter, e.g., '/categories/{category_id}/edit', use [format_endpoint].

use std::fmt::Display;

use crate::model::TransactionKind;

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// This month's income with the form for adding income.
pub const INCOME_VIEW: &str = "/income";
/// This month's expenses with the form for adding expenses.
pub const EXPENSE_VIEW: &str = "/expense";
/// Spreadsheet download of this month's income.
pub const INCOME_EXPORT: &str = "/income/export";
/// Spreadsheet download of this month's expenses.
pub const EXPENSE_EXPORT: &str = "/expense/export";
/// The page for listing and adding categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for editing an existing category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The page for filtering all transactions.
pub const FILTERS_VIEW: &str = "/filters";
/// Spreadsheet download of the filtered transactions.
pub const FILTERS_EXPORT: &str = "/filters/export";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/log_out";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/internal_server_error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for registering a new user.
pub const REGISTER_API: &str = "/api/register";
/// The route to create income.
pub const INCOME_API: &str = "/api/income";
/// The route to delete a single income record.
pub const INCOME_RECORD: &str = "/api/income/{income_id}";
/// The route to create an expense.
pub const EXPENSE_API: &str = "/api/expense";
/// The route to delete a single expense.
pub const EXPENSE_RECORD: &str = "/api/expense/{expense_id}";
/// The route to create a category.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route to update a category.
pub const CATEGORY_API: &str = "/api/categories/{category_id}";

/// The page listing this month's records of `kind`.
pub fn transactions_view(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => INCOME_VIEW,
        TransactionKind::Expense => EXPENSE_VIEW,
    }
}

/// The route that creates records of `kind`.
pub fn transactions_api(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => INCOME_API,
        TransactionKind::Expense => EXPENSE_API,
    }
}

/// The route that deletes a record of `kind`.
pub fn transaction_record(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => INCOME_RECORD,
        TransactionKind::Expense => EXPENSE_RECORD,
    }
}

/// The spreadsheet download of this month's records of `kind`.
pub fn transactions_export(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => INCOME_EXPORT,
        TransactionKind::Expense => EXPENSE_EXPORT,
    }
}

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/categories/{category_id}', '{category_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
