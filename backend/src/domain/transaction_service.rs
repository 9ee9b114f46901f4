//! Transaction CRUD and the budget-ledger side effect of creation.

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::info;
use std::sync::Arc;
use shared::{CreateTransactionRequest, Transaction, TransactionType, UpdateTransactionRequest};
use crate::storage::{connection::DbConnection, repositories::TransactionRepository};

#[derive(Clone)]
pub struct TransactionService {
    transaction_repository: TransactionRepository,
}

impl TransactionService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        let transaction_repository = TransactionRepository::new((*db).clone());
        Self { transaction_repository }
    }

    /// Record a new transaction for a user.
    ///
    /// When a budget ledger exists, the matching snapshot (budget ± amount)
    /// is appended in the same database transaction as the insert. Without
    /// a ledger the budget is left untracked until the user sets one.
    pub async fn create_transaction(
        &self,
        user_id: i64,
        request: CreateTransactionRequest,
    ) -> Result<Transaction> {
        validate_amount(request.amount)?;
        let category = request.category.trim();
        if category.is_empty() {
            return Err(anyhow!("Please choose a category"));
        }

        let mut transaction = Transaction {
            id: 0,
            kind: request.kind,
            category: category.to_string(),
            date: request.date.unwrap_or_else(|| Utc::now().timestamp_millis()),
            amount: request.amount,
            user_id,
        };

        let (id, new_budget) = self
            .transaction_repository
            .store_transaction_with_budget(&transaction)
            .await?;
        transaction.id = id;

        match &new_budget {
            Some(budget) => info!(
                "Added {} of {:.2} in '{}' for user {}, budget now {:.2}",
                transaction.kind, transaction.amount, transaction.category, user_id, budget.amount
            ),
            None => info!(
                "Added {} of {:.2} in '{}' for user {}, no budget tracked",
                transaction.kind, transaction.amount, transaction.category, user_id
            ),
        }

        Ok(transaction)
    }

    /// Edit an existing transaction in place. The budget ledger is NOT
    /// recomputed: only creation moves the budget, so the displayed budget
    /// is allowed to drift after edits. An unknown id is a silent no-op.
    pub async fn update_transaction(
        &self,
        user_id: i64,
        request: UpdateTransactionRequest,
    ) -> Result<Transaction> {
        validate_amount(request.amount)?;
        let category = request.category.trim();
        if category.is_empty() {
            return Err(anyhow!("Please choose a category"));
        }

        let transaction = Transaction {
            id: request.id,
            kind: request.kind,
            category: category.to_string(),
            date: request.date,
            amount: request.amount,
            user_id,
        };
        self.transaction_repository.update_transaction(&transaction).await?;
        Ok(transaction)
    }

    /// Delete a transaction by id. As with edits, the budget ledger is left
    /// alone.
    pub async fn delete_transaction(&self, transaction_id: i64) -> Result<()> {
        self.transaction_repository.delete_transaction(transaction_id).await?;
        info!("Deleted transaction {}", transaction_id);
        Ok(())
    }

    /// Get a single transaction; absent is an empty state, not an error.
    pub async fn get_transaction(&self, transaction_id: i64) -> Result<Option<Transaction>> {
        self.transaction_repository.get_transaction_by_id(transaction_id).await
    }

    /// List all of a user's transactions, newest first.
    pub async fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        self.transaction_repository.get_all_transactions(user_id).await
    }

    /// List a user's transactions of one type, newest first.
    pub async fn list_transactions_by_type(
        &self,
        user_id: i64,
        kind: TransactionType,
    ) -> Result<Vec<Transaction>> {
        self.transaction_repository.get_transactions_by_type(user_id, kind).await
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(anyhow!("Please enter a valid amount"));
    }
    Ok(())
}
