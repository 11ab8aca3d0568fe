//! Paths on the remote REST API, relative to its base URL.
//!
//! For paths that take a parameter use [crate::endpoints::format_endpoint].

use crate::model::TransactionKind;

pub const LOG_IN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const PROFILE: &str = "/profile";
pub const CATEGORIES: &str = "/categories";
pub const CATEGORY: &str = "/categories/{category_id}";
pub const INCOMES: &str = "/incomes";
pub const INCOME: &str = "/incomes/{income_id}";
pub const EXPENSES: &str = "/expenses";
pub const EXPENSE: &str = "/expenses/{expense_id}";

/// Requests to these paths never carry the bearer token.
pub const CREDENTIAL_EXCLUDED: [&str; 5] = ["/login", "/register", "/status", "/activate", "/health"];

/// The collection path for `kind`, e.g. "/incomes".
pub fn collection(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => INCOMES,
        TransactionKind::Expense => EXPENSES,
    }
}

/// The single record path for `kind`, e.g. "/incomes/{income_id}".
pub fn record(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => INCOME,
        TransactionKind::Expense => EXPENSE,
    }
}
