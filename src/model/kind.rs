use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether a transaction or category is money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Income, TransactionKind::Expense];

    /// The label shown when a record's category cannot be resolved.
    pub fn fallback_label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    /// The icon shown for records that do not have their own.
    pub fn default_icon(self) -> &'static str {
        match self {
            TransactionKind::Income => "💰",
            TransactionKind::Expense => "🧾",
        }
    }

    /// The value used by the remote API, e.g. "INCOME".
    pub fn api_code(self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }

    /// Lowercase name used in URLs and file names.
    pub fn slug(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fallback_label())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("income") {
            Ok(TransactionKind::Income)
        } else if s.eq_ignore_ascii_case("expense") {
            Ok(TransactionKind::Expense)
        } else {
            Err(Error::InvalidKind(s.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TransactionKind;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("INCOME".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!("expense".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("BOTH".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn serializes_as_api_code() {
        let json = serde_json::to_string(&TransactionKind::Expense).unwrap();

        assert_eq!(json, r#""EXPENSE""#);
    }
}
