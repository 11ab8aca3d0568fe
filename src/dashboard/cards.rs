//! Summary cards and the recent activity list.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, format_currency},
    model::TransactionKind,
    pipeline::ActivityEntry,
};

/// The number of records shown under "Recent activity".
pub(super) const RECENT_ACTIVITY_LIMIT: usize = 5;

/// This month's totals for the summary cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct MonthTotals {
    pub income: f64,
    pub expense: f64,
}

impl MonthTotals {
    pub fn net(self) -> f64 {
        self.income - self.expense
    }
}

fn summary_card(icon: &str, icon_style: &str, title: &str, amount: f64) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            div class="flex items-center gap-3"
            {
                span class={ "grid h-12 w-12 place-items-center rounded-full text-white shadow-md " (icon_style) }
                {
                    span class="text-lg" aria-hidden="true" { (icon) }
                }

                div class="flex flex-col"
                {
                    span class="text-sm font-medium text-gray-600 dark:text-gray-400" { (title) }
                    span class="text-2xl font-semibold" { (format_currency(amount)) }
                }
            }
        }
    }
}

pub(super) fn summary_cards_view(totals: MonthTotals) -> Markup {
    html! {
        section id="summary-cards" class="w-full grid grid-cols-1 gap-4 mb-4 sm:grid-cols-2 lg:grid-cols-3"
        {
            (summary_card("📥", "bg-violet-700", "Total Balance", totals.net()))
            (summary_card("👛", "bg-emerald-800", "Total Income", totals.income))
            (summary_card("🪙", "bg-red-900", "Total Expense", totals.expense))
        }
    }
}

fn activity_row(entry: &ActivityEntry) -> Markup {
    let (sign, amount_style) = match entry.kind {
        TransactionKind::Income => ("+", "text-emerald-700 dark:text-emerald-400"),
        TransactionKind::Expense => ("-", "text-rose-700 dark:text-rose-400"),
    };

    html! {
        li class="flex items-center justify-between px-4 py-3"
        {
            div class="flex items-center gap-3"
            {
                span class="grid h-9 w-9 place-items-center rounded-full bg-gray-100 dark:bg-gray-700 text-lg"
                {
                    (entry.icon)
                }

                div class="flex flex-col"
                {
                    span class="text-sm font-semibold" { (entry.label) }
                    span class="text-xs text-gray-500 dark:text-gray-400"
                    {
                        (entry.date.to_string()) " • " (entry.kind.api_code())
                    }
                }
            }

            span class={ "text-sm font-semibold " (amount_style) }
            {
                (sign) " " (format_currency(entry.amount))
            }
        }
    }
}

pub(super) fn recent_activity_view(entries: &[ActivityEntry]) -> Markup {
    html! {
        section id="recent-activity" class={ "w-full " (CARD_STYLE) }
        {
            div class="flex items-center justify-between pb-2"
            {
                h3 class="text-sm font-semibold" { "Recent activity" }
                a href=(endpoints::FILTERS_VIEW) class={ "text-xs " (LINK_STYLE) } { "View all" }
            }

            @if entries.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" { "No recent items." }
            } @else {
                ul class="divide-y divide-gray-100 dark:divide-gray-700"
                {
                    @for entry in entries {
                        (activity_row(entry))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        model::{RecordId, TransactionKind},
        pipeline::ActivityEntry,
    };

    use super::{MonthTotals, recent_activity_view, summary_cards_view};

    #[test]
    fn balance_card_shows_net() {
        let html = summary_cards_view(MonthTotals {
            income: 1000.0,
            expense: 1250.5,
        })
        .into_string();

        assert!(html.contains("-₹250.50"), "got {html}");
        assert!(html.contains("₹1,000.00"), "got {html}");
    }

    #[test]
    fn activity_shows_sign_by_kind() {
        let entries = [
            ActivityEntry {
                id: RecordId::new("i1"),
                kind: TransactionKind::Income,
                label: "Salary".to_owned(),
                icon: "💰".to_owned(),
                date: date!(2024 - 03 - 02),
                amount: 500.0,
            },
            ActivityEntry {
                id: RecordId::new("e1"),
                kind: TransactionKind::Expense,
                label: "Rent".to_owned(),
                icon: "🧾".to_owned(),
                date: date!(2024 - 03 - 01),
                amount: 300.0,
            },
        ];

        let html = recent_activity_view(&entries).into_string();

        assert!(html.contains("+ ₹500.00"), "got {html}");
        assert!(html.contains("- ₹300.00"), "got {html}");
        assert!(html.contains("2024-03-02"), "got {html}");
    }

    #[test]
    fn empty_activity_shows_notice() {
        let html = recent_activity_view(&[]).into_string();

        assert!(html.contains("No recent items."));
    }
}
