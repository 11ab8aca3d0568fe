use serde::Deserialize;

/// A list of records as returned by the remote API.
///
/// Some endpoints return a bare JSON array, others wrap the array in an
/// object under `items`.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(default = "Vec::new")]
        items: Vec<T>,
    },
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Bare(items) | ListResponse::Wrapped { items } => items,
        }
    }
}
