//! The income and expense pages.
//!
//! Both kinds of record share the same handlers. Each handler takes the
//! [TransactionKind](crate::model::TransactionKind) it works on and the
//! router binds one thin wrapper per kind.

mod create;
mod delete;
mod export;
mod page;
mod state;

pub use create::{create_expense_endpoint, create_income_endpoint};
pub use delete::{delete_expense_endpoint, delete_income_endpoint};
pub use export::{export_expenses, export_incomes};
pub use page::{get_expense_page, get_income_page};
pub use state::TransactionState;
