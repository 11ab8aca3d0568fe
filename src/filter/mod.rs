//! The filters page: income and expenses narrowed down by kind, date,
//! category, amount and category name, with a spreadsheet download of the
//! matching rows.

mod export;
mod page;
mod query;
mod state;

pub use export::export_filtered;
pub use page::get_filters_page;
pub use query::FilterQuery;
pub use state::FilterState;
