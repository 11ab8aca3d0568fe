//! Pure functions that turn fetched records into what the pages display.
//!
//! Nothing in here fails: malformed amounts have already been coerced to zero
//! and records without a usable date are skipped wherever a date is needed.

mod bucket;
mod chart;
mod filter;
mod range;
mod recent;

use std::collections::HashMap;

pub use bucket::{DayBucket, DayDetail, bucket_by_day_in_month, bucket_by_day_this_month};
pub use chart::{chart_domain_max, day_label};
pub use filter::{FilterCriteria, KindFilter, Row, Summary, filter_records, summarize};
pub use range::QuickRange;
pub use recent::{ActivityEntry, month_total, recent_activity};

use crate::model::{Category, RecordId, Transaction, TransactionKind};

/// Resolves the category name shown for a transaction.
pub(crate) struct CategoryNames<'a> {
    by_id: HashMap<&'a RecordId, &'a str>,
}

impl<'a> CategoryNames<'a> {
    pub(crate) fn new(categories: &'a [Category]) -> Self {
        let by_id = categories
            .iter()
            .filter(|category| !category.name.trim().is_empty())
            .map(|category| (&category.id, category.name.as_str()))
            .collect();

        Self { by_id }
    }

    /// The embedded category name, else the name looked up by id, else the
    /// fallback label for `kind`.
    pub(crate) fn resolve(&self, transaction: &Transaction, kind: TransactionKind) -> String {
        let embedded = transaction
            .category
            .as_ref()
            .and_then(|category| category.name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty());

        embedded
            .or_else(|| {
                transaction
                    .category_ref()
                    .and_then(|id| self.by_id.get(id).copied())
            })
            .unwrap_or(kind.fallback_label())
            .to_owned()
    }
}
