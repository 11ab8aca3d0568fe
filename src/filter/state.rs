use axum::extract::FromRef;
use time::Date;

use crate::{
    AppState, Error,
    api::ApiClient,
    timezone::{get_local_offset, local_today},
};

/// The state needed by the filters page and its export.
#[derive(Debug, Clone)]
pub struct FilterState {
    pub api: ApiClient,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for FilterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl FilterState {
    pub(super) fn today(&self) -> Result<Date, Error> {
        get_local_offset(&self.local_timezone)
            .map(local_today)
            .ok_or_else(|| {
                tracing::error!("Invalid timezone {}", self.local_timezone);
                Error::InvalidTimezoneError(self.local_timezone.clone())
            })
    }
}
