use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The kinds of money a student budget is split across.
///
/// The set is closed: allocation and reporting iterate it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CurrencyKind {
    #[serde(rename = "diningDollars")]
    DiningDollars,
    #[serde(rename = "tigerBucks")]
    TigerBucks,
    #[serde(rename = "USD")]
    Usd,
}

impl CurrencyKind {
    /// Every currency kind, in display order
    pub const ALL: [CurrencyKind; 3] = [
        CurrencyKind::DiningDollars,
        CurrencyKind::TigerBucks,
        CurrencyKind::Usd,
    ];

    /// Human-readable name used in reports and messages
    pub fn display_name(&self) -> &'static str {
        match self {
            CurrencyKind::DiningDollars => "Dining Dollars",
            CurrencyKind::TigerBucks => "Tiger Bucks",
            CurrencyKind::Usd => "USD",
        }
    }

    /// Stable key used when persisting balances
    pub fn key(&self) -> &'static str {
        match self {
            CurrencyKind::DiningDollars => "diningDollars",
            CurrencyKind::TigerBucks => "tigerBucks",
            CurrencyKind::Usd => "USD",
        }
    }
}

impl fmt::Display for CurrencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for CurrencyKind {
    type Err = ParseCurrencyKindError;

    /// Accepts the persisted key or a short alias, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diningdollars" | "dining" | "dining_dollars" | "dd" => Ok(CurrencyKind::DiningDollars),
            "tigerbucks" | "tiger" | "tiger_bucks" | "tb" => Ok(CurrencyKind::TigerBucks),
            "usd" | "dollars" | "$" => Ok(CurrencyKind::Usd),
            _ => Err(ParseCurrencyKindError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseCurrencyKindError(pub String);

impl fmt::Display for ParseCurrencyKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown currency '{}'. Use one of: dining, tiger, usd",
            self.0
        )
    }
}

impl std::error::Error for ParseCurrencyKindError {}

/// Requests a front end can send to the budget backend.
///
/// Each variant maps to exactly one backend operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum BudgetCommand {
    /// Create the user's budget with starting balances and an end date
    Setup {
        starting_balances: BTreeMap<CurrencyKind, f64>,
        end_date: NaiveDate,
    },
    /// Current balances, allowance and breaks
    Report,
    /// Ledger listing, optionally bounded by an inclusive date range
    Transactions {
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    },
    /// Record an expense
    Spend {
        amount: f64,
        description: String,
        currency: CurrencyKind,
    },
    /// Record money added to a balance
    Credit {
        amount: f64,
        description: String,
        currency: CurrencyKind,
    },
    /// Recompute the allowance from current balances
    Respread,
    SetEndDate {
        end_date: NaiveDate,
    },
    SetFloor {
        floor: f64,
    },
    /// Overwrite a balance without a ledger entry
    SetBalance {
        currency: CurrencyKind,
        amount: f64,
    },
    ListBreaks,
    AddBreak {
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Remove a break by its position in `ListBreaks`
    RemoveBreak {
        index: usize,
    },
}

impl BudgetCommand {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            BudgetCommand::Setup { .. } => "setup",
            BudgetCommand::Report => "report",
            BudgetCommand::Transactions { .. } => "transactions",
            BudgetCommand::Spend { .. } => "spend",
            BudgetCommand::Credit { .. } => "credit",
            BudgetCommand::Respread => "respread",
            BudgetCommand::SetEndDate { .. } => "set-end-date",
            BudgetCommand::SetFloor { .. } => "set-floor",
            BudgetCommand::SetBalance { .. } => "set-balance",
            BudgetCommand::ListBreaks => "list-breaks",
            BudgetCommand::AddBreak { .. } => "add-break",
            BudgetCommand::RemoveBreak { .. } => "remove-break",
        }
    }

    /// Whether the command changes the stored record
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            BudgetCommand::Report | BudgetCommand::Transactions { .. } | BudgetCommand::ListBreaks
        )
    }
}

/// Response returned for every successfully executed command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// User-facing text
    pub message: String,
    /// Allowance after the command ran
    pub daily_budget: Option<f64>,
    /// Sum of all balances after the command ran
    pub total_balance: Option<f64>,
}

impl CommandResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            daily_budget: None,
            total_balance: None,
        }
    }

    pub fn with_figures(mut self, daily_budget: f64, total_balance: f64) -> Self {
        self.daily_budget = Some(daily_budget);
        self.total_balance = Some(total_balance);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_display_names() {
        let names: Vec<&str> = CurrencyKind::ALL.iter().map(|k| k.display_name()).collect();
        assert_eq!(names, vec!["Dining Dollars", "Tiger Bucks", "USD"]);
    }

    #[test]
    fn test_currency_from_str_aliases() {
        assert_eq!("dining".parse::<CurrencyKind>().unwrap(), CurrencyKind::DiningDollars);
        assert_eq!("diningDollars".parse::<CurrencyKind>().unwrap(), CurrencyKind::DiningDollars);
        assert_eq!("TIGER".parse::<CurrencyKind>().unwrap(), CurrencyKind::TigerBucks);
        assert_eq!(" usd ".parse::<CurrencyKind>().unwrap(), CurrencyKind::Usd);

        let err = "euro".parse::<CurrencyKind>().unwrap_err();
        assert!(err.to_string().contains("euro"));
    }

    #[test]
    fn test_currency_keys_match_serde() {
        for kind in CurrencyKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.key()));
            assert_eq!(kind.key().parse::<CurrencyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_balances_map_serializes_with_keys() {
        let mut balances = BTreeMap::new();
        balances.insert(CurrencyKind::DiningDollars, 50.0);
        balances.insert(CurrencyKind::Usd, 20.0);

        let json = serde_json::to_string(&balances).unwrap();
        assert_eq!(json, r#"{"diningDollars":50.0,"USD":20.0}"#);
    }

    #[test]
    fn test_command_names_and_mutation() {
        assert_eq!(BudgetCommand::Report.name(), "report");
        assert!(!BudgetCommand::Report.is_mutating());
        assert!(!BudgetCommand::ListBreaks.is_mutating());
        assert!(BudgetCommand::Respread.is_mutating());
        assert!(BudgetCommand::RemoveBreak { index: 0 }.is_mutating());
    }

    #[test]
    fn test_command_json_shape() {
        let command = BudgetCommand::Spend {
            amount: 12.5,
            description: "Lunch".to_string(),
            currency: CurrencyKind::TigerBucks,
        };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["command"], "spend");
        assert_eq!(json["currency"], "tigerBucks");

        let back: BudgetCommand = serde_json::from_value(json).unwrap();
        assert_eq!(back, command);
    }
}
