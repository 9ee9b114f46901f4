use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel owner id for categories that are shared by all users.
///
/// Rows with this user id are the built-in default categories: visible to
/// everyone, not individually deletable.
pub const DEFAULT_CATEGORY_USER_ID: i64 = 0;

/// A registered account (or the implicit guest account).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Auto-assigned by the database on insert
    #[serde(default)]
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Stored as entered; there is no hashing in this app
    pub password: String,
}

/// A spending/income category.
///
/// Transactions reference categories by name, not by id, so renaming or
/// deleting a category leaves existing transactions pointing at a name that
/// no longer resolves. Callers that need an icon/color for such a name fall
/// back to [`Category::fallback`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Auto-assigned by the database on insert
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub icon_name: String,
    pub color_hex: String,
    #[serde(default)]
    pub is_default: bool,
    /// Owning user, or [`DEFAULT_CATEGORY_USER_ID`] for shared defaults
    pub user_id: i64,
}

impl Category {
    /// The category used when a transaction's category name no longer
    /// resolves to a stored row.
    pub fn fallback() -> Self {
        Self {
            id: 0,
            name: "Other".to_string(),
            icon_name: "ic_category_other".to_string(),
            color_hex: "#808080".to_string(),
            is_default: true,
            user_id: DEFAULT_CATEGORY_USER_ID,
        }
    }
}

/// Whether a transaction adds to or subtracts from the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Column value used in the database and in filter queries.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    /// Parse a stored column value. Anything unrecognized reads back as
    /// Expense, matching the loose string typing of the schema.
    pub fn from_column(value: &str) -> Self {
        match value {
            "Income" => TransactionType::Income,
            _ => TransactionType::Expense,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single income or expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Auto-assigned by the database on insert
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Category name, a loose string link to `Category::name`
    pub category: String,
    /// Epoch milliseconds (UTC)
    pub date: i64,
    /// Always positive; the sign is carried by `kind`
    pub amount: f64,
    pub user_id: i64,
}

impl Transaction {
    /// The entry date as a UTC timestamp, for display formatting.
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.date)
    }

    /// Signed amount: positive for income, negative for expense.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// One snapshot in the append-only budget ledger.
///
/// The "current" budget for a user is the row with the greatest id; older
/// rows are kept as history and only removed by restore or full reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Auto-assigned by the database on insert
    #[serde(default)]
    pub id: i64,
    pub amount: f64,
    pub user_id: i64,
}

/// Per-category sum of transaction amounts, used for pie-chart breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// The backup file contents: a user's transactions, their non-default
/// categories, and the latest budget snapshot (if any).
///
/// Serialized as a single JSON object with exactly these three fields. Old
/// ids are carried along in the document but discarded on restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupData {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub budget: Option<Budget>,
}

impl BackupData {
    /// True when there is nothing worth writing to a file.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.categories.is_empty() && self.budget.is_none()
    }
}

/// Counts reported after a successful restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoreSummary {
    pub transactions_restored: usize,
    pub categories_restored: usize,
    pub budget_restored: bool,
}

/// Appearance preference, persisted with the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::System => "System",
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
        }
    }

    /// Parse a stored column value, defaulting to System.
    pub fn from_column(value: &str) -> Self {
        match value {
            "Light" => ThemeMode::Light,
            "Dark" => ThemeMode::Dark,
            _ => ThemeMode::System,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password change form; confirmation mismatch is rejected before any
/// database access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub icon_name: String,
    pub color_hex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub kind: TransactionType,
    pub category: String,
    /// Must be strictly positive
    pub amount: f64,
    /// Epoch milliseconds; current time when omitted
    pub date: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    pub id: i64,
    pub kind: TransactionType,
    pub category: String,
    pub amount: f64,
    pub date: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_column_round_trip() {
        assert_eq!(
            TransactionType::from_column(TransactionType::Income.as_str()),
            TransactionType::Income
        );
        assert_eq!(
            TransactionType::from_column(TransactionType::Expense.as_str()),
            TransactionType::Expense
        );
        // Loose typing: unknown values degrade to Expense
        assert_eq!(TransactionType::from_column("garbage"), TransactionType::Expense);
    }

    #[test]
    fn signed_amount_follows_kind() {
        let mut t = Transaction {
            id: 1,
            kind: TransactionType::Income,
            category: "Salary".to_string(),
            date: 0,
            amount: 25.0,
            user_id: 1,
        };
        assert_eq!(t.signed_amount(), 25.0);
        t.kind = TransactionType::Expense;
        assert_eq!(t.signed_amount(), -25.0);
    }

    #[test]
    fn transaction_serializes_with_type_field() {
        let t = Transaction {
            id: 3,
            kind: TransactionType::Expense,
            category: "Food".to_string(),
            date: 1735689600000,
            amount: 12.5,
            user_id: 1,
        };
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "Expense");
        assert_eq!(json["category"], "Food");
    }

    #[test]
    fn backup_data_missing_field_is_rejected() {
        let err = serde_json::from_str::<BackupData>(r#"{"transactions": []}"#);
        assert!(err.is_err());
    }

    #[test]
    fn theme_mode_defaults_to_system() {
        assert_eq!(ThemeMode::default(), ThemeMode::System);
        assert_eq!(ThemeMode::from_column("weird"), ThemeMode::System);
    }
}
