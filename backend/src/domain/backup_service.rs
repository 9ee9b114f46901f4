//! Backup and restore of a user's data as a single JSON document.
//!
//! The document holds three fields: the user's transactions, their
//! non-default categories, and the latest budget snapshot (or null). The
//! file location always comes from the caller (the file picker); this
//! service never chooses a path itself.
//!
//! Restore is destructive: once the document parses, the user's existing
//! transactions, non-default categories and budget history are deleted and
//! replaced by the document's contents, re-stamped with the current user id
//! and with fresh auto-assigned ids. A document that fails to parse leaves
//! everything untouched.

use log::{info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use shared::{BackupData, Budget, Category, RestoreSummary, Transaction};
use crate::storage::{
    connection::DbConnection,
    repositories::{BudgetRepository, CategoryRepository, TransactionRepository},
};

/// Distinct failure modes for backup and restore. Each variant's message is
/// the user-facing text; callers surface them verbatim.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("No data to back up")]
    Empty,
    #[error("No backup file found")]
    NotFound,
    #[error("Failed to access backup file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Backup file is not valid: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct BackupService {
    transaction_repository: TransactionRepository,
    category_repository: CategoryRepository,
    budget_repository: BudgetRepository,
}

impl BackupService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        let transaction_repository = TransactionRepository::new((*db).clone());
        let category_repository = CategoryRepository::new((*db).clone());
        let budget_repository = BudgetRepository::new((*db).clone());
        Self {
            transaction_repository,
            category_repository,
            budget_repository,
        }
    }

    /// Collect a user's backup document. Shared default categories are
    /// never included. A user with no data at all gets [`BackupError::Empty`]
    /// instead of an empty document.
    pub async fn export_backup(&self, user_id: i64) -> Result<BackupData, BackupError> {
        let transactions = self.transaction_repository.get_all_transactions(user_id).await?;
        let categories = self.category_repository.get_user_categories(user_id).await?;
        let budget = self.budget_repository.get_latest_budget(user_id).await?;

        let data = BackupData {
            transactions,
            categories,
            budget,
        };
        if data.is_empty() {
            return Err(BackupError::Empty);
        }
        Ok(data)
    }

    /// Serialize the user's backup document to the given file, returning
    /// the number of transactions written.
    pub async fn write_backup(&self, user_id: i64, path: &Path) -> Result<usize, BackupError> {
        let data = self.export_backup(user_id).await?;
        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json)?;

        info!(
            "Wrote backup for user {}: {} transactions, {} categories",
            user_id,
            data.transactions.len(),
            data.categories.len()
        );
        Ok(data.transactions.len())
    }

    /// Replace the user's data with the contents of a backup file.
    ///
    /// The file is read and parsed in full before anything is deleted, so a
    /// missing, unreadable or malformed file leaves existing rows intact.
    pub async fn restore_backup(&self, user_id: i64, path: &Path) -> Result<RestoreSummary, BackupError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Restore failed for user {}: no backup file at {:?}", user_id, path);
                return Err(BackupError::NotFound);
            }
            Err(e) => return Err(BackupError::Io(e)),
        };
        let data: BackupData = serde_json::from_str(&json)?;

        // Parse succeeded; from here on the replace is intentional.
        self.transaction_repository.clear_user_transactions(user_id).await?;
        self.category_repository.clear_user_categories(user_id).await?;
        self.budget_repository.clear_user_budgets(user_id).await?;

        let mut transactions_restored = 0;
        for imported in &data.transactions {
            let transaction = Transaction {
                id: 0,
                kind: imported.kind,
                category: imported.category.clone(),
                date: imported.date,
                amount: imported.amount,
                user_id,
            };
            self.transaction_repository.store_transaction(&transaction).await?;
            transactions_restored += 1;
        }

        let mut categories_restored = 0;
        for imported in &data.categories {
            // Imported rows never come back as defaults, whatever the file says
            let category = Category {
                id: 0,
                name: imported.name.clone(),
                icon_name: imported.icon_name.clone(),
                color_hex: imported.color_hex.clone(),
                is_default: false,
                user_id,
            };
            self.category_repository.store_category(&category).await?;
            categories_restored += 1;
        }

        let budget_restored = match &data.budget {
            Some(imported) => {
                let budget = Budget {
                    id: 0,
                    amount: imported.amount,
                    user_id,
                };
                self.budget_repository.store_budget(&budget).await?;
                true
            }
            None => false,
        };

        info!(
            "Restored backup for user {}: {} transactions, {} categories, budget: {}",
            user_id, transactions_restored, categories_restored, budget_restored
        );

        Ok(RestoreSummary {
            transactions_restored,
            categories_restored,
            budget_restored,
        })
    }
}
