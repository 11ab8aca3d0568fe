//! The page listing this month's income or expenses with the form for adding more.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    Error,
    api::{ApiError, records},
    chart::{PageChart, chart_head_elements, charts_view, day_chart},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency, load_error_page, rupee_input_styles,
        submit_button,
    },
    model::{Category, Transaction, TransactionKind},
    navigation::NavBar,
    pipeline::{CategoryNames, bucket_by_day_in_month},
    session::Session,
    transaction::TransactionState,
};

/// Display this month's income.
pub async fn get_income_page(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    get_transactions_page(TransactionKind::Income, &state, &session).await
}

/// Display this month's expenses.
pub async fn get_expense_page(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    get_transactions_page(TransactionKind::Expense, &state, &session).await
}

fn load_error_message(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "Failed to load incomes or categories",
        TransactionKind::Expense => "Failed to load expenses or categories",
    }
}

async fn get_transactions_page(
    kind: TransactionKind,
    state: &TransactionState,
    session: &Session,
) -> Result<Response, Error> {
    let token = session.token()?;
    let nav_bar = NavBar::new(endpoints::transactions_view(kind)).with_user(session.user());
    let today = state.today()?;

    let (records, categories) =
        match records::fetch_kind_with_categories(&state.api, token, kind).await {
            Ok(fetched) => fetched,
            Err(ApiError::Unauthorized) => return Err(Error::Unauthorized),
            Err(error) => {
                tracing::error!("Could not load {} page: {error}", kind.slug());
                return Ok(load_error_page(
                    kind.fallback_label(),
                    nav_bar.into_html(),
                    load_error_message(kind),
                )
                .into_response());
            }
        };

    let categories = categories_of_kind(categories, kind);
    let records = this_months_records(records, today);

    Ok(transactions_view(kind, nav_bar, &records, &categories, today).into_response())
}

/// The categories offered when adding a record of `kind`.
pub(super) fn categories_of_kind(categories: Vec<Category>, kind: TransactionKind) -> Vec<Category> {
    categories
        .into_iter()
        .filter(|category| category.is_kind(kind))
        .collect()
}

/// The records dated in the same month as `today`, newest first.
pub(super) fn this_months_records(records: Vec<Transaction>, today: Date) -> Vec<Transaction> {
    let mut records: Vec<Transaction> = records
        .into_iter()
        .filter(|record| {
            record
                .date
                .is_some_and(|date| date.year() == today.year() && date.month() == today.month())
        })
        .collect();

    records.sort_by(|a, b| b.date.cmp(&a.date));

    records
}

/// A record as displayed in the table.
struct TransactionRow {
    label: String,
    icon: String,
    date: Option<Date>,
    amount: f64,
    delete_url: String,
}

impl TransactionRow {
    fn new(record: &Transaction, kind: TransactionKind, names: &CategoryNames<'_>) -> Self {
        Self {
            label: names.resolve(record, kind),
            icon: record.icon().unwrap_or(kind.default_icon()).to_owned(),
            date: record.date,
            amount: record.amount,
            delete_url: format_endpoint(endpoints::transaction_record(kind), &record.id),
        }
    }
}

fn transactions_view(
    kind: TransactionKind,
    nav_bar: NavBar<'_>,
    records: &[Transaction],
    categories: &[Category],
    today: Date,
) -> Markup {
    let title = kind.fallback_label();
    let names = CategoryNames::new(categories);
    let rows: Vec<TransactionRow> = records
        .iter()
        .map(|record| TransactionRow::new(record, kind, &names))
        .collect();
    let buckets = bucket_by_day_in_month(records, categories, kind, today);
    let charts = [PageChart {
        id: chart_id(kind),
        options: day_chart(&format!("{title} Overview"), kind, &buckets).to_string(),
    }];

    let content = html! {
        (nav_bar.into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-5xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { (title) }

                    button
                        type="button"
                        hx-get=(endpoints::transactions_export(kind))
                        hx-target-error="#alert-container"
                        hx-swap="none"
                        title="Download this month"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Download"
                    }
                }

                (charts_view(&charts))

                div class="grid grid-cols-1 lg:grid-cols-3 gap-4"
                {
                    div class={ "lg:col-span-1 " (CARD_STYLE) }
                    {
                        (add_transaction_form(kind, categories, today))
                    }

                    div class="lg:col-span-2 overflow-x-auto"
                    {
                        (transactions_table(kind, &rows))
                    }
                }
            }
        }
    };

    let mut head_elements = chart_head_elements(&charts);
    head_elements.push(rupee_input_styles());

    base(title, &head_elements, &content)
}

fn chart_id(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "income-chart",
        TransactionKind::Expense => "expense-chart",
    }
}

fn add_transaction_form(kind: TransactionKind, categories: &[Category], today: Date) -> Markup {
    html! {
        form
            hx-post=(endpoints::transactions_api(kind))
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#indicator"
            class="w-full space-y-4"
        {
            h2 class="text-lg font-semibold" { "Add " (kind.slug()) }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0"
                        placeholder="e.g., 50000"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=(today)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE)
                {
                    "Category (" (kind.slug()) " only)"
                }

                select
                    name="category_id"
                    id="category_id"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @if categories.is_empty() {
                        option value="" { "No " (kind.slug()) " categories" }
                    }

                    @for category in categories {
                        option value=(category.id.as_str()) { (category.name) }
                    }
                }
            }

            div
            {
                label for="icon" class=(FORM_LABEL_STYLE) { "Icon (optional)" }

                input
                    name="icon"
                    id="icon"
                    type="text"
                    maxlength="8"
                    placeholder=(kind.default_icon())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (submit_button(&format!("Add {}", kind.slug())))
        }
    }
}

fn empty_table_message(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "No income entries this month.",
        TransactionKind::Expense => "No expense entries this month.",
    }
}

fn transactions_table(kind: TransactionKind, rows: &[TransactionRow]) -> Markup {
    html! {
        table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class="px-6 py-4 text-right" { "Amount" }
                    th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                }
            }

            tbody
            {
                @for row in rows {
                    (transaction_row_view(row))
                }

                @if rows.is_empty() {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td colspan="4" class="px-6 py-4 text-center" { (empty_table_message(kind)) }
                    }
                }
            }
        }
    }
}

fn transaction_row_view(row: &TransactionRow) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    span class="grid h-9 w-9 place-items-center rounded-full bg-gray-100 dark:bg-gray-700 text-lg"
                    {
                        (row.icon)
                    }
                    span class="font-semibold text-gray-900 dark:text-white" { (row.label) }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(date) = row.date {
                    time datetime=(date.to_string()) { (date.to_string()) }
                }
            }
            td class="px-6 py-4 text-right tabular-nums" { (format_currency(row.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(row.delete_url)
                    hx-confirm={ "Delete " (row.label) " entry?" }
                    hx-target="closest tr"
                    hx-target-error="#alert-container"
                    hx-swap="delete"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}
