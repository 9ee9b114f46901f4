//! # Domain Module
//!
//! Business logic for the finance tracker, independent of any UI shell.
//!
//! Each service owns the repositories it needs and exposes the operations
//! one settings/home/transactions screen would call:
//!
//! - **user_service**: signup, login (including guest), password changes,
//!   logout and the full app-data reset
//! - **category_service**: category CRUD with the default-set guard and
//!   name resolution for rendering
//! - **transaction_service**: transaction CRUD plus the budget-ledger
//!   append that accompanies every creation
//! - **budget_service**: latest-budget lookup, manual budget updates and
//!   per-category totals
//! - **session_service**: the persisted current-user/theme record
//! - **backup_service**: JSON export and destructive restore
//!
//! Validation happens here, before any storage call; repositories never
//! reject data on their own.

pub mod user_service;
pub mod category_service;
pub mod transaction_service;
pub mod budget_service;
pub mod session_service;
pub mod backup_service;

pub use user_service::UserService;
pub use category_service::CategoryService;
pub use transaction_service::TransactionService;
pub use budget_service::BudgetService;
pub use session_service::SessionService;
pub use backup_service::{BackupError, BackupService};
