//! ECharts charts shared by the dashboard and the income and expense pages.
//!
//! Each chart is built with `charming`, serialized to an options object and
//! initialised by a script in the page head.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AreaStyle, AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip,
        Trigger,
    },
    series::{Line, Pie},
};
use maud::{Markup, PreEscaped, html};
use serde::Serialize;

use crate::{
    html::HeadElement,
    model::TransactionKind,
    pipeline::{DayBucket, chart_domain_max, day_label},
};

pub const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

/// A chart with its HTML container ID and ECharts configuration.
pub struct PageChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JavaScript object literal
    pub options: String,
}

/// Renders the HTML containers for `charts` in a responsive grid.
pub fn charts_view(charts: &[PageChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        data-chart-id=(chart.id)
                        class="min-h-[320px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the script that initialises `charts` once the page has loaded,
/// with dark mode support and responsive resizing.
pub fn charts_script(charts: &[PageChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// The head elements a page with `charts` needs.
pub fn chart_head_elements(charts: &[PageChart]) -> Vec<HeadElement> {
    vec![
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(charts),
    ]
}

#[derive(Serialize)]
struct TooltipDetail<'a> {
    category: &'a str,
    amount: f64,
}

/// An area chart of the daily totals in `buckets`.
///
/// The tooltip lists each record's category and amount for the hovered day.
pub fn day_chart(title: &str, kind: TransactionKind, buckets: &[DayBucket]) -> Chart {
    let labels: Vec<String> = buckets
        .iter()
        .map(|bucket| day_label(bucket.date))
        .collect();
    let values: Vec<f64> = buckets.iter().map(|bucket| bucket.total_amount).collect();

    Chart::new()
        .title(Title::new().text(title).subtext("This month, by day"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .formatter(day_tooltip_formatter(buckets))
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Line)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .boundary_gap(false)
                .data(labels),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .min(0.0)
                .max(chart_domain_max(buckets))
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name(kind.fallback_label())
                .smooth(true)
                .area_style(AreaStyle::new())
                .data(values),
        )
}

/// A donut chart of the month's income, expense and remaining balance.
///
/// The balance slice is never negative.
pub fn month_split_chart(income_total: f64, expense_total: f64) -> Chart {
    let balance = (income_total - expense_total).max(0.0);

    Chart::new()
        .title(Title::new().text("This month").subtext("Income vs expense"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left("center"))
        .series(
            Pie::new()
                .name("This month")
                .radius(vec!["45%", "70%"])
                .data(vec![
                    (income_total, "Income"),
                    (expense_total, "Expense"),
                    (balance, "Balance"),
                ]),
        )
}

fn day_tooltip_formatter(buckets: &[DayBucket]) -> JsFunction {
    let details: Vec<Vec<TooltipDetail>> = buckets
        .iter()
        .map(|bucket| {
            bucket
                .details
                .iter()
                .map(|detail| TooltipDetail {
                    category: &detail.category,
                    amount: detail.amount,
                })
                .collect()
        })
        .collect();

    // Category names are user input and must not close the script tag.
    let details = serde_json::to_string(&details)
        .unwrap_or_else(|_| "[]".to_owned())
        .replace('<', "\\u003c");

    JsFunction::new_with_args(
        "params",
        &format!(
            "const details = {details};
            const point = Array.isArray(params) ? params[0] : params;
            const format = new Intl.NumberFormat('en-IN', {{ style: 'currency', currency: 'INR' }}).format;
            const escape = (text) => String(text).replace(/[&<>\"']/g, (c) => '&#' + c.charCodeAt(0) + ';');
            const lines = (details[point.dataIndex] || []).map((d) => escape(d.category) + ': ' + format(d.amount));
            return [escape(point.name), 'Total: ' + format(point.value)].concat(lines).join('<br/>');"
        ),
    )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IN', {
              style: 'currency',
              currency: 'INR',
              maximumFractionDigits: 0
            });
            return (number) ? currencyFormatter.format(number) : \"₹0\";",
    )
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        model::TransactionKind,
        pipeline::{DayBucket, DayDetail},
    };

    use super::{PageChart, charts_view, day_chart, month_split_chart};

    fn buckets() -> Vec<DayBucket> {
        vec![DayBucket {
            date: date!(2024 - 03 - 01),
            total_amount: 1500.0,
            details: vec![DayDetail {
                category: "<b>Rent</b>".to_owned(),
                amount: 1500.0,
            }],
        }]
    }

    #[test]
    fn day_chart_uses_day_labels_and_domain_max() {
        let options = day_chart("Income", TransactionKind::Income, &buckets()).to_string();

        assert!(options.contains("1st Mar"), "got {options}");
        assert!(options.contains("2000"), "got {options}");
    }

    #[test]
    fn day_chart_tooltip_escapes_category_names() {
        let options = day_chart("Expenses", TransactionKind::Expense, &buckets()).to_string();

        assert!(!options.contains("<b>Rent"), "got {options}");
        assert!(options.contains("Rent"), "got {options}");
    }

    #[test]
    fn month_split_chart_clamps_balance() {
        let options = month_split_chart(100.0, 250.0).to_string();

        assert!(options.contains("Balance"), "got {options}");
        assert!(options.contains("250"), "got {options}");
    }

    #[test]
    fn charts_view_renders_containers() {
        let charts = [PageChart {
            id: "income-chart",
            options: "{}".to_owned(),
        }];

        let html = charts_view(&charts).into_string();

        assert!(html.contains(r#"id="income-chart""#));
    }
}
