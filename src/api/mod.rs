//! Access to the remote SpendWise REST API.
//!
//! [ApiClient] owns the HTTP plumbing (base URL, bearer token, status
//! handling). The functions in [records] are the per-page fetchers and
//! mutations built on top of it.

mod client;
mod list;
pub mod paths;
pub mod records;

pub use client::{ApiClient, ApiError, BearerToken, requires_credential};
pub use list::ListResponse;
