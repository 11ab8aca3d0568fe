//! Dashboard HTTP handler and view rendering.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error,
    api::{
        ApiClient, ApiError,
        records::{self, Records},
    },
    chart::{PageChart, chart_head_elements, charts_view, day_chart, month_split_chart},
    dashboard::cards::{
        MonthTotals, RECENT_ACTIVITY_LIMIT, recent_activity_view, summary_cards_view,
    },
    endpoints,
    html::{base, load_error_page},
    model::TransactionKind,
    navigation::NavBar,
    pipeline::{bucket_by_day_in_month, month_total, recent_activity},
    session::Session,
    timezone::{get_local_offset, local_today},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The client for the remote REST API.
    pub api: ApiClient,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of this month's records.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    let token = session.token()?;
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).with_user(session.user());

    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let records = match records::fetch_all(&state.api, token).await {
        Ok(records) => records,
        Err(ApiError::Unauthorized) => return Err(Error::Unauthorized),
        Err(error) => {
            tracing::error!("Could not load dashboard data: {error}");
            return Ok(load_error_page(
                "Dashboard",
                nav_bar.into_html(),
                "Failed to load dashboard data",
            )
            .into_response());
        }
    };

    let today = local_today(local_timezone);

    Ok(dashboard_view(nav_bar, &records, today).into_response())
}

fn build_charts(records: &Records, today: Date, totals: MonthTotals) -> [PageChart; 3] {
    let income_buckets = bucket_by_day_in_month(
        &records.incomes,
        &records.categories,
        TransactionKind::Income,
        today,
    );
    let expense_buckets = bucket_by_day_in_month(
        &records.expenses,
        &records.categories,
        TransactionKind::Expense,
        today,
    );

    [
        PageChart {
            id: "income-chart",
            options: day_chart("Income Overview", TransactionKind::Income, &income_buckets)
                .to_string(),
        },
        PageChart {
            id: "expense-chart",
            options: day_chart(
                "Expense Overview",
                TransactionKind::Expense,
                &expense_buckets,
            )
            .to_string(),
        },
        PageChart {
            id: "month-split-chart",
            options: month_split_chart(totals.income, totals.expense).to_string(),
        },
    ]
}

fn dashboard_view(nav_bar: NavBar<'_>, records: &Records, today: Date) -> Markup {
    let totals = MonthTotals {
        income: month_total(&records.incomes, today),
        expense: month_total(&records.expenses, today),
    };
    let charts = build_charts(records, today, totals);
    let recent = recent_activity(
        &records.incomes,
        &records.expenses,
        &records.categories,
        RECENT_ACTIVITY_LIMIT,
    );

    let content = html!(
        (nav_bar.into_html())

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white pb-24 lg:pb-8"
        {
            h2 class="w-full mb-4 text-xl font-semibold" { "Dashboard" }

            (summary_cards_view(totals))
            (charts_view(&charts))
            (recent_activity_view(&recent))
        }
    );

    base("Dashboard", &chart_head_elements(&charts), &content)
}
