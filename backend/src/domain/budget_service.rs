//! Budget and aggregation queries: the latest ledger snapshot, manual
//! budget updates, and per-category totals for the pie charts.

use anyhow::{anyhow, Result};
use log::info;
use std::sync::Arc;
use shared::{Budget, CategoryTotal, TransactionType};
use crate::storage::{
    connection::DbConnection,
    repositories::{BudgetRepository, TransactionRepository},
};

#[derive(Clone)]
pub struct BudgetService {
    budget_repository: BudgetRepository,
    transaction_repository: TransactionRepository,
}

impl BudgetService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        let budget_repository = BudgetRepository::new((*db).clone());
        let transaction_repository = TransactionRepository::new((*db).clone());
        Self {
            budget_repository,
            transaction_repository,
        }
    }

    /// The user's current budget: the newest ledger row, or None when the
    /// user has never set one.
    pub async fn latest_budget(&self, user_id: i64) -> Result<Option<Budget>> {
        self.budget_repository.get_latest_budget(user_id).await
    }

    /// Manually set the budget by appending a fresh snapshot. This is also
    /// what activates budget tracking for transaction creation.
    pub async fn set_budget(&self, user_id: i64, amount: f64) -> Result<Budget> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(anyhow!("Please enter a valid amount"));
        }

        let mut budget = Budget { id: 0, amount, user_id };
        budget.id = self.budget_repository.store_budget(&budget).await?;

        info!("Budget for user {} manually set to {:.2}", user_id, amount);
        Ok(budget)
    }

    /// Per-category income totals for a user. Unordered; categories with
    /// no income are omitted rather than reported as zero.
    pub async fn income_by_category(&self, user_id: i64) -> Result<Vec<CategoryTotal>> {
        self.transaction_repository
            .totals_by_category(user_id, TransactionType::Income)
            .await
    }

    /// Per-category expense totals for a user.
    pub async fn expense_by_category(&self, user_id: i64) -> Result<Vec<CategoryTotal>> {
        self.transaction_repository
            .totals_by_category(user_id, TransactionType::Expense)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction_service::TransactionService;
    use shared::CreateTransactionRequest;

    async fn create_test_services() -> (BudgetService, TransactionService) {
        let db = Arc::new(DbConnection::init_test().await.unwrap());
        (BudgetService::new(db.clone()), TransactionService::new(db))
    }

    async fn add(service: &TransactionService, kind: TransactionType, category: &str, amount: f64) {
        service
            .create_transaction(
                1,
                CreateTransactionRequest {
                    kind,
                    category: category.to_string(),
                    amount,
                    date: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_set_budget_validation() {
        let (service, _) = create_test_services().await;

        assert!(service.set_budget(1, 0.0).await.is_err());
        assert!(service.set_budget(1, -10.0).await.is_err());
        assert!(service.set_budget(1, f64::INFINITY).await.is_err());
        assert!(service.latest_budget(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_manual_set_appends_snapshot() {
        let (service, _) = create_test_services().await;

        service.set_budget(1, 100.0).await.unwrap();
        let second = service.set_budget(1, 80.0).await.unwrap();

        let latest = service.latest_budget(1).await.unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_eq!(latest.amount, 80.0);
    }

    #[tokio::test]
    async fn test_category_totals_match_inserted_sums() {
        let (service, transactions) = create_test_services().await;

        add(&transactions, TransactionType::Income, "Salary", 1000.0).await;
        add(&transactions, TransactionType::Income, "Salary", 250.0).await;
        add(&transactions, TransactionType::Income, "Other", 40.0).await;
        add(&transactions, TransactionType::Expense, "Food", 60.0).await;

        let mut income = service.income_by_category(1).await.unwrap();
        income.sort_by(|a, b| a.category.cmp(&b.category));
        assert_eq!(income.len(), 2);
        assert_eq!(income[0].category, "Other");
        assert!((income[0].total - 40.0).abs() < 1e-9);
        assert_eq!(income[1].category, "Salary");
        assert!((income[1].total - 1250.0).abs() < 1e-9);

        let expenses = service.expense_by_category(1).await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, "Food");
    }

    #[tokio::test]
    async fn test_totals_empty_without_transactions() {
        let (service, _) = create_test_services().await;
        assert!(service.income_by_category(1).await.unwrap().is_empty());
        assert!(service.expense_by_category(1).await.unwrap().is_empty());
    }
}
