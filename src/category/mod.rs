//! Category management: listing, adding and renaming categories.

mod create;
mod edit;
mod form;
mod list;
mod state;

pub use create::create_category_endpoint;
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use list::get_categories_page;
pub use state::CategoryState;
