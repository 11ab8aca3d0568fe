//! Records exchanged with the SpendWise REST API.
//!
//! The remote API is loose about shapes: ids may be numbers or strings,
//! amounts may be strings, and category kinds may live under `type` or
//! `categoryType`. Everything is normalised here so the rest of the app only
//! sees well-typed values.

mod category;
mod kind;
mod lenient;
mod record_id;
mod transaction;
mod user;

pub use category::{Category, CategoryFormData, CategoryName, CategoryPayload};
pub use kind::TransactionKind;
pub(crate) use lenient::{ISO_DATE_FORMAT, parse_day};
pub use record_id::RecordId;
pub use transaction::{EmbeddedCategory, NewTransaction, Transaction, validate_amount};
pub use user::{ProfileResponse, User, is_valid_email};
