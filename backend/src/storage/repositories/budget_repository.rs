use anyhow::Result;
use sqlx::Row;
use shared::Budget;
use crate::storage::connection::DbConnection;

/// Repository for the append-only budget ledger
#[derive(Clone)]
pub struct BudgetRepository {
    db: DbConnection,
}

impl BudgetRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Append a budget snapshot, returning the assigned id
    pub async fn store_budget(&self, budget: &Budget) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO budgets (amount, user_id)
            VALUES (?, ?)
            "#,
        )
        .bind(budget.amount)
        .bind(budget.user_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get the most recently appended budget snapshot for a user
    pub async fn get_latest_budget(&self, user_id: i64) -> Result<Option<Budget>> {
        let row = sqlx::query(
            r#"
            SELECT id, amount, user_id
            FROM budgets
            WHERE user_id = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Budget {
                id: r.get("id"),
                amount: r.get("amount"),
                user_id: r.get("user_id"),
            })),
            None => Ok(None),
        }
    }

    /// Delete a user's entire budget history
    pub async fn clear_user_budgets(&self, user_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM budgets WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> BudgetRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        BudgetRepository::new(db)
    }

    #[tokio::test]
    async fn test_latest_budget_is_newest_row() {
        let repo = setup_test().await;

        assert!(repo.get_latest_budget(1).await.unwrap().is_none());

        repo.store_budget(&Budget { id: 0, amount: 100.0, user_id: 1 }).await.unwrap();
        repo.store_budget(&Budget { id: 0, amount: 150.0, user_id: 1 }).await.unwrap();
        repo.store_budget(&Budget { id: 0, amount: 120.0, user_id: 1 }).await.unwrap();

        let latest = repo.get_latest_budget(1).await.unwrap().unwrap();
        assert_eq!(latest.amount, 120.0);

        // History stays intact; another user's ledger is separate
        assert!(repo.get_latest_budget(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_user_budgets() {
        let repo = setup_test().await;

        repo.store_budget(&Budget { id: 0, amount: 100.0, user_id: 1 }).await.unwrap();
        repo.store_budget(&Budget { id: 0, amount: 75.0, user_id: 2 }).await.unwrap();

        repo.clear_user_budgets(1).await.unwrap();

        assert!(repo.get_latest_budget(1).await.unwrap().is_none());
        assert!(repo.get_latest_budget(2).await.unwrap().is_some());
    }
}
