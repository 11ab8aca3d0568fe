use time::Date;

use crate::{
    model::{Category, RecordId, Transaction, TransactionKind},
    pipeline::CategoryNames,
};

/// A line in the dashboard's recent activity list.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub id: RecordId,
    pub kind: TransactionKind,
    pub label: String,
    pub icon: String,
    pub date: Date,
    pub amount: f64,
}

/// The `limit` most recent dated records of either kind, newest first.
pub fn recent_activity(
    incomes: &[Transaction],
    expenses: &[Transaction],
    categories: &[Category],
    limit: usize,
) -> Vec<ActivityEntry> {
    let names = CategoryNames::new(categories);

    let mut entries: Vec<ActivityEntry> = [
        (TransactionKind::Income, incomes),
        (TransactionKind::Expense, expenses),
    ]
    .into_iter()
    .flat_map(|(kind, records)| records.iter().map(move |record| (kind, record)))
    .filter_map(|(kind, record)| {
        let date = record.date?;

        Some(ActivityEntry {
            id: record.id.clone(),
            kind,
            label: names.resolve(record, kind),
            icon: record.icon().unwrap_or(kind.default_icon()).to_owned(),
            date,
            amount: record.amount,
        })
    })
    .collect();

    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries.truncate(limit);

    entries
}

/// The sum of the amounts dated in the same month and year as `today`.
pub fn month_total(records: &[Transaction], today: Date) -> f64 {
    records
        .iter()
        .filter(|record| {
            record
                .date
                .is_some_and(|date| date.year() == today.year() && date.month() == today.month())
        })
        .map(|record| record.amount)
        .sum()
}
