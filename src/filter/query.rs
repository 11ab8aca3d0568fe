//! Parsing the filters page's query string into [FilterCriteria].

use serde::Deserialize;
use time::Date;

use crate::{
    endpoints,
    model::{RecordId, parse_day},
    pipeline::{FilterCriteria, KindFilter, QuickRange},
};

/// The raw query string of the filters page.
///
/// Every field is optional and an empty string means the field is unset.
/// `category` may be repeated.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub min: Option<String>,
    #[serde(default)]
    pub max: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    /// A quick range code, e.g. "THIS_MONTH". Overrides `from` and `to`.
    #[serde(default)]
    pub range: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_amount(value: Option<&str>) -> Option<f64> {
    non_empty(value)
        .and_then(|amount| amount.parse::<f64>().ok())
        .filter(|amount| amount.is_finite())
}

impl FilterQuery {
    /// Interpret the query. Values that do not parse are treated as unset.
    pub fn to_criteria(&self, today: Date) -> FilterCriteria {
        let (date_from, date_to) = match non_empty(self.range.as_deref()).and_then(QuickRange::parse)
        {
            Some(range) => {
                let (from, to) = range.bounds(today);
                (Some(from), Some(to))
            }
            None => (
                non_empty(self.from.as_deref()).and_then(parse_day),
                non_empty(self.to.as_deref()).and_then(parse_day),
            ),
        };

        FilterCriteria {
            kind: non_empty(self.kind.as_deref())
                .map(KindFilter::parse)
                .unwrap_or_default(),
            date_from,
            date_to,
            category_ids: self
                .category
                .iter()
                .filter_map(|id| non_empty(Some(id.as_str())))
                .map(RecordId::new)
                .collect(),
            min_amount: parse_amount(self.min.as_deref()),
            max_amount: parse_amount(self.max.as_deref()),
            search_text: self.q.clone().unwrap_or_default(),
        }
    }
}

/// `endpoint` with the raw query string appended when there is one.
pub(super) fn with_query(endpoint: &str, raw_query: Option<&str>) -> String {
    match non_empty(raw_query) {
        Some(query) => format!("{endpoint}?{query}"),
        None => endpoint.to_owned(),
    }
}

pub(super) fn export_url(raw_query: Option<&str>) -> String {
    with_query(endpoints::FILTERS_EXPORT, raw_query)
}
