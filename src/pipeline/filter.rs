//! Filtering across both kinds of record for the filters page.

use std::collections::BTreeSet;

use time::Date;

use crate::{
    model::{Category, RecordId, Transaction, TransactionKind},
    pipeline::CategoryNames,
};

/// Which kinds of record the filters page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    Both,
    Only(TransactionKind),
}

impl KindFilter {
    pub const ALL: [KindFilter; 3] = [
        KindFilter::Both,
        KindFilter::Only(TransactionKind::Income),
        KindFilter::Only(TransactionKind::Expense),
    ];

    /// Parse a query string value. Anything other than "INCOME" or "EXPENSE"
    /// (in any case) means both.
    pub fn parse(text: &str) -> Self {
        text.parse::<TransactionKind>()
            .map(KindFilter::Only)
            .unwrap_or_default()
    }

    pub fn includes(self, kind: TransactionKind) -> bool {
        match self {
            KindFilter::Both => true,
            KindFilter::Only(only) => only == kind,
        }
    }

    /// The value used in query strings, e.g. "BOTH".
    pub fn code(self) -> &'static str {
        match self {
            KindFilter::Both => "BOTH",
            KindFilter::Only(kind) => kind.api_code(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KindFilter::Both => "Both",
            KindFilter::Only(kind) => kind.fallback_label(),
        }
    }

    /// Lowercase name used in file names.
    pub fn slug(self) -> &'static str {
        match self {
            KindFilter::Both => "both",
            KindFilter::Only(kind) => kind.slug(),
        }
    }
}

/// The criteria chosen on the filters page. `None` and empty values do not
/// restrict the results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub kind: KindFilter,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub category_ids: BTreeSet<RecordId>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub search_text: String,
}

impl FilterCriteria {
    fn matches_date(&self, date: Date) -> bool {
        self.date_from.is_none_or(|from| date >= from) && self.date_to.is_none_or(|to| date <= to)
    }

    fn matches_category(&self, category_id: Option<&RecordId>) -> bool {
        self.category_ids.is_empty()
            || category_id.is_some_and(|id| self.category_ids.contains(id))
    }

    fn matches_amount(&self, amount: f64) -> bool {
        self.min_amount.is_none_or(|min| amount >= min)
            && self.max_amount.is_none_or(|max| amount <= max)
    }

    fn matches_search(&self, category_name: &str) -> bool {
        let needle = self.search_text.to_lowercase();

        needle.is_empty() || category_name.to_lowercase().contains(&needle)
    }
}

/// A record in the filters page's results table.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RecordId,
    pub kind: TransactionKind,
    pub date: Date,
    pub amount: f64,
    pub category_id: Option<RecordId>,
    pub category_name: String,
}

/// Select the records matching `criteria`, sorted by date. Undated records
/// never match. Records with the same date keep their input order, incomes
/// before expenses.
pub fn filter_records(
    incomes: &[Transaction],
    expenses: &[Transaction],
    categories: &[Category],
    criteria: &FilterCriteria,
) -> Vec<Row> {
    let names = CategoryNames::new(categories);

    let tagged = [
        (TransactionKind::Income, incomes),
        (TransactionKind::Expense, expenses),
    ];

    let mut rows: Vec<Row> = tagged
        .into_iter()
        .filter(|(kind, _)| criteria.kind.includes(*kind))
        .flat_map(|(kind, records)| records.iter().map(move |record| (kind, record)))
        .filter_map(|(kind, record)| {
            Some(Row {
                id: record.id.clone(),
                kind,
                date: record.date?,
                amount: record.amount,
                category_id: record.category_ref().cloned(),
                category_name: names.resolve(record, kind),
            })
        })
        .filter(|row| {
            criteria.matches_date(row.date)
                && criteria.matches_category(row.category_id.as_ref())
                && criteria.matches_amount(row.amount)
                && criteria.matches_search(&row.category_name)
        })
        .collect();

    rows.sort_by_key(|row| row.date);

    rows
}

/// Totals over a set of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub income_total: f64,
    pub expense_total: f64,
    pub net: f64,
    pub count: usize,
}

pub fn summarize(rows: &[Row]) -> Summary {
    let (income_total, expense_total) =
        rows.iter()
            .fold((0.0, 0.0), |(income, expense), row| match row.kind {
                TransactionKind::Income => (income + row.amount, expense),
                TransactionKind::Expense => (income, expense + row.amount),
            });

    Summary {
        income_total,
        expense_total,
        net: income_total - expense_total,
        count: rows.len(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use time::macros::date;

    use crate::{
        model::{RecordId, TransactionKind},
        pipeline::{
            FilterCriteria, KindFilter, Summary, filter_records, summarize,
            test_records::{category, transaction, with_category, with_embedded_name},
        },
    };

    #[test]
    fn kind_filter_parses_query_values() {
        assert_eq!(
            KindFilter::parse("INCOME"),
            KindFilter::Only(TransactionKind::Income)
        );
        assert_eq!(
            KindFilter::parse("expense"),
            KindFilter::Only(TransactionKind::Expense)
        );
        assert_eq!(KindFilter::parse("BOTH"), KindFilter::Both);
        assert_eq!(KindFilter::parse(""), KindFilter::Both);
    }

    #[test]
    fn default_criteria_return_everything_sorted_by_date() {
        let incomes = [
            transaction("i1", 10.0, Some(date!(2024 - 03 - 05))),
            transaction("i2", 20.0, Some(date!(2024 - 01 - 01))),
        ];
        let expenses = [
            transaction("e1", 5.0, Some(date!(2024 - 02 - 10))),
            transaction("e2", 1.0, None),
        ];

        let rows = filter_records(&incomes, &expenses, &[], &FilterCriteria::default());
        let ids: Vec<_> = rows.iter().map(|row| row.id.as_str()).collect();

        assert_eq!(ids, vec!["i2", "e1", "i1"]);
    }

    #[test]
    fn undated_records_are_left_out_of_rows_and_totals() {
        let incomes = [
            transaction("i1", 100.0, Some(date!(2024 - 03 - 05))),
            transaction("i2", 999.0, None),
        ];

        let rows = filter_records(&incomes, &[], &[], &FilterCriteria::default());
        let summary = summarize(&rows);

        assert_eq!(summary.income_total, 100.0);
        assert_eq!(summary.count, 1);
    }

    #[test]
    fn single_kind_excludes_the_other() {
        let incomes = [transaction("i1", 10.0, Some(date!(2024 - 03 - 05)))];
        let expenses = [transaction("e1", 5.0, Some(date!(2024 - 03 - 05)))];
        let criteria = FilterCriteria {
            kind: KindFilter::Only(TransactionKind::Expense),
            ..Default::default()
        };

        let rows = filter_records(&incomes, &expenses, &[], &criteria);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, TransactionKind::Expense);
        assert_eq!(rows[0].category_name, "Expense");
    }

    #[test]
    fn amount_range_is_inclusive() {
        let expenses = [
            transaction("a", 50.0, Some(date!(2024 - 03 - 01))),
            transaction("b", 150.0, Some(date!(2024 - 03 - 02))),
            transaction("c", 250.0, Some(date!(2024 - 03 - 03))),
        ];
        let criteria = FilterCriteria {
            min_amount: Some(100.0),
            max_amount: Some(200.0),
            ..Default::default()
        };

        let rows = filter_records(&[], &expenses, &[], &criteria);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 150.0);
    }

    #[test]
    fn date_range_is_inclusive() {
        let incomes = [
            transaction("a", 1.0, Some(date!(2024 - 02 - 29))),
            transaction("b", 1.0, Some(date!(2024 - 03 - 01))),
            transaction("c", 1.0, Some(date!(2024 - 03 - 31))),
            transaction("d", 1.0, Some(date!(2024 - 04 - 01))),
            transaction("e", 1.0, None),
        ];
        let criteria = FilterCriteria {
            date_from: Some(date!(2024 - 03 - 01)),
            date_to: Some(date!(2024 - 03 - 31)),
            ..Default::default()
        };

        let rows = filter_records(&incomes, &[], &[], &criteria);
        let ids: Vec<_> = rows.iter().map(|row| row.id.as_str()).collect();

        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn open_ended_date_range() {
        let incomes = [
            transaction("a", 1.0, Some(date!(2024 - 02 - 29))),
            transaction("b", 1.0, Some(date!(2024 - 03 - 01))),
        ];
        let criteria = FilterCriteria {
            date_from: Some(date!(2024 - 03 - 01)),
            ..Default::default()
        };

        let rows = filter_records(&incomes, &[], &[], &criteria);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, RecordId::new("b"));
    }

    #[test]
    fn empty_category_set_excludes_nothing() {
        let expenses = [
            with_category(transaction("a", 1.0, Some(date!(2024 - 03 - 01))), "1"),
            transaction("b", 1.0, Some(date!(2024 - 03 - 01))),
        ];

        let rows = filter_records(&[], &expenses, &[], &FilterCriteria::default());

        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn category_set_restricts_to_members() {
        let expenses = [
            with_category(transaction("a", 1.0, Some(date!(2024 - 03 - 01))), "1"),
            with_category(transaction("b", 1.0, Some(date!(2024 - 03 - 01))), "2"),
            transaction("c", 1.0, Some(date!(2024 - 03 - 01))),
        ];
        let criteria = FilterCriteria {
            category_ids: BTreeSet::from([RecordId::new("2")]),
            ..Default::default()
        };

        let rows = filter_records(&[], &expenses, &[], &criteria);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, RecordId::new("b"));
    }

    #[test]
    fn search_matches_category_name_case_insensitively() {
        let categories = [
            category("1", "Groceries", TransactionKind::Expense),
            category("2", "Rent", TransactionKind::Expense),
        ];
        let expenses = [
            with_category(transaction("a", 1.0, Some(date!(2024 - 03 - 01))), "1"),
            with_category(transaction("b", 1.0, Some(date!(2024 - 03 - 01))), "2"),
            with_embedded_name(
                transaction("c", 1.0, Some(date!(2024 - 03 - 01))),
                "Grocery delivery",
            ),
        ];
        let criteria = FilterCriteria {
            search_text: "GROC".to_owned(),
            ..Default::default()
        };

        let rows = filter_records(&[], &expenses, &categories, &criteria);
        let names: Vec<_> = rows.iter().map(|row| row.category_name.as_str()).collect();

        assert_eq!(names, vec!["Groceries", "Grocery delivery"]);
    }

    #[test]
    fn search_text_is_matched_as_typed() {
        let categories = [category("1", "Groceries", TransactionKind::Expense)];
        let expenses = [with_category(
            transaction("a", 1.0, Some(date!(2024 - 03 - 01))),
            "1",
        )];
        let criteria = FilterCriteria {
            search_text: " groc".to_owned(),
            ..Default::default()
        };

        let rows = filter_records(&[], &expenses, &categories, &criteria);

        assert!(rows.is_empty());
    }

    #[test]
    fn summary_net_is_income_minus_expense() {
        let incomes = [
            transaction("i1", 1000.0, Some(date!(2024 - 03 - 01))),
            transaction("i2", 250.5, Some(date!(2024 - 03 - 01))),
        ];
        let expenses = [transaction("e1", 300.0, Some(date!(2024 - 03 - 01)))];
        let rows = filter_records(&incomes, &expenses, &[], &FilterCriteria::default());

        let summary = summarize(&rows);

        assert_eq!(
            summary,
            Summary {
                income_total: 1250.5,
                expense_total: 300.0,
                net: 950.5,
                count: 3,
            }
        );
        assert_eq!(summary.net, summary.income_total - summary.expense_total);
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        assert_eq!(summarize(&[]), Summary::default());
    }
}
