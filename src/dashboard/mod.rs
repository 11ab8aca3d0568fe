//! The dashboard: this month's totals, day charts, the income and expense
//! split and the most recent activity.

mod cards;
mod handlers;

pub use handlers::get_dashboard_page;
