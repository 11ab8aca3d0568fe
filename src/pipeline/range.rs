use time::{Date, Duration};

/// Preset date ranges offered on the filters page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickRange {
    ThisMonth,
    Last30Days,
    YearToDate,
}

impl QuickRange {
    pub const ALL: [QuickRange; 3] = [
        QuickRange::ThisMonth,
        QuickRange::Last30Days,
        QuickRange::YearToDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QuickRange::ThisMonth => "This month",
            QuickRange::Last30Days => "Last 30 days",
            QuickRange::YearToDate => "Year to date",
        }
    }

    /// The value used in query strings, e.g. "LAST_30_DAYS".
    pub fn code(self) -> &'static str {
        match self {
            QuickRange::ThisMonth => "THIS_MONTH",
            QuickRange::Last30Days => "LAST_30_DAYS",
            QuickRange::YearToDate => "YEAR_TO_DATE",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|range| range.code().eq_ignore_ascii_case(text.trim()))
    }

    /// The inclusive `(from, to)` dates of the range ending `today`.
    pub fn bounds(self, today: Date) -> (Date, Date) {
        let from = match self {
            QuickRange::ThisMonth => today.replace_day(1).unwrap_or(today),
            QuickRange::Last30Days => today.checked_sub(Duration::days(29)).unwrap_or(Date::MIN),
            QuickRange::YearToDate => Date::from_ordinal_date(today.year(), 1).unwrap_or(today),
        };

        (from, today)
    }
}
