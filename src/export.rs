//! Spreadsheet downloads of transactions.
//!
//! Tables are written as CSV with a UTF-8 byte-order mark so that spreadsheet
//! programs open the file with the rupee sign intact.

use axum::{
    http::{
        HeaderValue,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    html::format_currency,
    model::{Category, ISO_DATE_FORMAT, Transaction, TransactionKind},
    pipeline::{CategoryNames, FilterCriteria, Row},
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const EXPORT_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");

pub const NO_FILTERED_ROWS_NOTICE: &str = "No rows match the current filters.";

/// The notice shown instead of downloading an empty month of `kind` records.
pub fn empty_month_notice(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "No income entries this month to download.",
        TransactionKind::Expense => "No expense entries this month to download.",
    }
}

/// A single sheet of data to download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    /// Shown to the user instead of a download when there are no rows.
    pub empty_notice: &'static str,
}

impl ExportTable {
    /// The table for a transaction page: one row per record in `records`.
    pub fn for_transactions(
        records: &[Transaction],
        categories: &[Category],
        kind: TransactionKind,
    ) -> Self {
        let names = CategoryNames::new(categories);

        let rows = records
            .iter()
            .map(|record| {
                vec![
                    format_export_date(record.date),
                    names.resolve(record, kind),
                    format_currency(record.amount),
                    record.id.to_string(),
                ]
            })
            .collect();

        Self {
            headers: vec!["Date", "Category", "Amount", "Id"],
            rows,
            empty_notice: empty_month_notice(kind),
        }
    }

    /// The table for the filters page.
    pub fn for_filtered_rows(rows: &[Row]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                vec![
                    format_export_date(Some(row.date)),
                    row.kind.fallback_label().to_owned(),
                    row.category_name.clone(),
                    row.amount.to_string(),
                    format_currency(row.amount),
                    row.id.to_string(),
                ]
            })
            .collect();

        Self {
            headers: vec!["Date", "Type", "Category", "Amount", "Amount_INR", "Id"],
            rows,
            empty_notice: NO_FILTERED_ROWS_NOTICE,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn format_export_date(date: Option<Date>) -> String {
    date.and_then(|date| date.format(EXPORT_DATE_FORMAT).ok())
        .unwrap_or_default()
}

/// Write `table` as a CSV sheet: the header record, then one record per row.
///
/// # Errors
///
/// Returns [Error::EmptyExport] with the table's notice if there are no rows,
/// or [Error::ExportFailed] if the CSV could not be written.
pub fn to_csv(table: &ExportTable) -> Result<Vec<u8>, Error> {
    if table.is_empty() {
        return Err(Error::EmptyExport(table.empty_notice));
    }

    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());

    writer
        .write_record(&table.headers)
        .map_err(|error| Error::ExportFailed(error.to_string()))?;

    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|error| Error::ExportFailed(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::ExportFailed(error.to_string()))
}

/// File name for a month of records, e.g. "income_2024-03.csv".
pub fn month_file_name(kind: TransactionKind, today: Date) -> String {
    format!(
        "{}_{}-{:02}.csv",
        kind.slug(),
        today.year(),
        u8::from(today.month())
    )
}

/// File name for a filtered export, e.g. "filters_both_2024-03-01_any.csv".
pub fn filters_file_name(criteria: &FilterCriteria) -> String {
    let bound = |date: Option<Date>| {
        date.and_then(|date| date.format(ISO_DATE_FORMAT).ok())
            .unwrap_or_else(|| "any".to_owned())
    };

    format!(
        "filters_{}_{}_{}.csv",
        criteria.kind.slug(),
        bound(criteria.date_from),
        bound(criteria.date_to)
    )
}

/// Wrap CSV bytes in a response the browser saves as `file_name`.
pub fn attachment(file_name: &str, bytes: Vec<u8>) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (
                CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}
