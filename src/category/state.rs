use axum::extract::FromRef;

use crate::{AppState, api::ApiClient};

/// The state needed by the category handlers.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The client for the remote REST API.
    pub api: ApiClient,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}
