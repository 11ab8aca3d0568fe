//! Income and expense records.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    model::{RecordId, lenient},
};

/// The category summary some API responses embed in a transaction.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EmbeddedCategory {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
}

/// An income or expense record.
///
/// Whether a record is income or expense is decided by the collection it was
/// fetched from, not by a field on the record.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: RecordId,
    /// Non-numeric or missing amounts are zero.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: f64,
    /// `None` when the date is missing or unparsable.
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<Date>,
    #[serde(default)]
    pub category_id: Option<RecordId>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub category: Option<EmbeddedCategory>,
}

impl Transaction {
    /// The category id, preferring the explicit reference over the embedded one.
    pub fn category_ref(&self) -> Option<&RecordId> {
        self.category_id.as_ref().or_else(|| {
            self.category
                .as_ref()
                .and_then(|category| category.id.as_ref())
        })
    }

    /// The record's own icon if it has a non-blank one.
    pub fn icon(&self) -> Option<&str> {
        self.icon
            .as_deref()
            .map(str::trim)
            .filter(|icon| !icon.is_empty())
    }
}

/// The body sent to the remote API to create an income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub amount: f64,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub category_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use crate::model::lenient::ISO_DATE_FORMAT;

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date
            .format(ISO_DATE_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Date::parse(&text, ISO_DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Check that an amount entered by the user can be sent to the API.
///
/// # Errors
///
/// Returns [Error::NegativeAmount] if `amount` is negative or not a number.
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(Error::NegativeAmount)
    }
}
