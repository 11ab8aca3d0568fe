//! Groups a month's records by day for the day charts.

use std::collections::BTreeMap;

use time::{Date, UtcOffset};

use crate::{
    model::{Category, ISO_DATE_FORMAT, Transaction, TransactionKind},
    pipeline::CategoryNames,
    timezone::local_today,
};

/// One record's contribution to a [DayBucket].
#[derive(Debug, Clone, PartialEq)]
pub struct DayDetail {
    pub category: String,
    pub amount: f64,
}

/// The records of a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date: Date,
    pub total_amount: f64,
    /// One entry per record, in the order the records were processed.
    pub details: Vec<DayDetail>,
}

impl DayBucket {
    /// The bucket's date as "YYYY-MM-DD".
    pub fn iso_date(&self) -> String {
        self.date
            .format(ISO_DATE_FORMAT)
            .unwrap_or_else(|_| self.date.to_string())
    }
}

/// Bucket the records dated in the current month of the local timezone.
pub fn bucket_by_day_this_month(
    records: &[Transaction],
    categories: &[Category],
    kind: TransactionKind,
    local_offset: UtcOffset,
) -> Vec<DayBucket> {
    bucket_by_day_in_month(records, categories, kind, local_today(local_offset))
}

/// Bucket the records dated in the same month and year as `today`, one
/// bucket per day, sorted by date.
///
/// Undated records are skipped.
pub fn bucket_by_day_in_month(
    records: &[Transaction],
    categories: &[Category],
    kind: TransactionKind,
    today: Date,
) -> Vec<DayBucket> {
    let names = CategoryNames::new(categories);
    let mut buckets: BTreeMap<Date, DayBucket> = BTreeMap::new();

    for record in records {
        let Some(date) = record.date else {
            continue;
        };

        if date.year() != today.year() || date.month() != today.month() {
            continue;
        }

        let bucket = buckets.entry(date).or_insert_with(|| DayBucket {
            date,
            total_amount: 0.0,
            details: Vec::new(),
        });

        bucket.total_amount += record.amount;
        bucket.details.push(DayDetail {
            category: names.resolve(record, kind),
            amount: record.amount,
        });
    }

    buckets.into_values().collect()
}
