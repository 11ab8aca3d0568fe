//! Categories group transactions and are scoped to a [TransactionKind].

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    model::{RecordId, TransactionKind, lenient},
};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryName] if `name` is empty after trimming.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-defined category as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "CategoryFields")]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    pub kind: Option<TransactionKind>,
}

/// The category as sent over the wire. Older API versions call the kind
/// `categoryType` and some responses carry both keys.
#[derive(Deserialize)]
struct CategoryFields {
    #[serde(default)]
    id: RecordId,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::kind")]
    kind: Option<TransactionKind>,
    #[serde(rename = "categoryType", default, deserialize_with = "lenient::kind")]
    category_type: Option<TransactionKind>,
}

impl From<CategoryFields> for Category {
    fn from(fields: CategoryFields) -> Self {
        Self {
            id: fields.id,
            name: fields.name,
            kind: fields.kind.or(fields.category_type),
        }
    }
}

impl Category {
    pub fn is_kind(&self, kind: TransactionKind) -> bool {
        self.kind == Some(kind)
    }
}

/// The body sent to the remote API when creating or updating a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPayload {
    pub name: CategoryName,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

/// Form data for creating and editing categories.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    pub kind: TransactionKind,
}

impl CategoryFormData {
    /// Validate the form into the payload expected by the remote API.
    pub fn into_payload(self) -> Result<CategoryPayload, Error> {
        Ok(CategoryPayload {
            name: CategoryName::new(&self.name)?,
            kind: self.kind,
        })
    }
}
