use anyhow::Result;
use sqlx::Row;
use shared::{Budget, CategoryTotal, Transaction, TransactionType};
use crate::storage::connection::DbConnection;

/// Repository for transaction operations
#[derive(Clone)]
pub struct TransactionRepository {
    db: DbConnection,
}

impl TransactionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a transaction in the database, returning the assigned id
    pub async fn store_transaction(&self, transaction: &Transaction) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (type, category, date, amount, user_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.kind.as_str())
        .bind(&transaction.category)
        .bind(transaction.date)
        .bind(transaction.amount)
        .bind(transaction.user_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Store a transaction and, when a budget ledger exists for the user,
    /// append the next budget snapshot in the same database transaction.
    ///
    /// Doing both writes in one unit keeps concurrent inserts from reading
    /// the same "latest" snapshot and losing one delta. With no ledger row
    /// yet, budget tracking is inactive and only the transaction is written.
    pub async fn store_transaction_with_budget(
        &self,
        transaction: &Transaction,
    ) -> Result<(i64, Option<Budget>)> {
        let mut tx = self.db.pool().begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (type, category, date, amount, user_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.kind.as_str())
        .bind(&transaction.category)
        .bind(transaction.date)
        .bind(transaction.amount)
        .bind(transaction.user_id)
        .execute(&mut *tx)
        .await?;
        let transaction_id = result.last_insert_rowid();

        let latest = sqlx::query(
            r#"
            SELECT id, amount, user_id
            FROM budgets
            WHERE user_id = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(transaction.user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let new_budget = match latest {
            Some(row) => {
                let current: f64 = row.get("amount");
                let next = current + transaction.signed_amount();
                let result = sqlx::query(
                    r#"
                    INSERT INTO budgets (amount, user_id)
                    VALUES (?, ?)
                    "#,
                )
                .bind(next)
                .bind(transaction.user_id)
                .execute(&mut *tx)
                .await?;
                Some(Budget {
                    id: result.last_insert_rowid(),
                    amount: next,
                    user_id: transaction.user_id,
                })
            }
            None => None,
        };

        tx.commit().await?;
        Ok((transaction_id, new_budget))
    }

    /// Get a transaction by id
    pub async fn get_transaction_by_id(&self, transaction_id: i64) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, type, category, date, amount, user_id
            FROM transactions
            WHERE id = ?
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| Self::map_row(&r)))
    }

    /// List all of a user's transactions, newest first
    pub async fn get_all_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, type, category, date, amount, user_id
            FROM transactions
            WHERE user_id = ?
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::map_row).collect())
    }

    /// List a user's transactions of one type, newest first
    pub async fn get_transactions_by_type(
        &self,
        user_id: i64,
        kind: TransactionType,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, type, category, date, amount, user_id
            FROM transactions
            WHERE user_id = ? AND type = ?
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::map_row).collect())
    }

    /// Sum a user's transaction amounts of one type, grouped by category
    /// name. Categories with no transactions do not appear.
    pub async fn totals_by_category(
        &self,
        user_id: i64,
        kind: TransactionType,
    ) -> Result<Vec<CategoryTotal>> {
        let rows = sqlx::query(
            r#"
            SELECT category, SUM(amount) AS total
            FROM transactions
            WHERE user_id = ? AND type = ?
            GROUP BY category
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_all(self.db.pool())
        .await?;

        let totals = rows
            .iter()
            .map(|row| CategoryTotal {
                category: row.get("category"),
                total: row.get("total"),
            })
            .collect();

        Ok(totals)
    }

    /// Update a transaction by id. A missing id is a silent no-op.
    pub async fn update_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE transactions
            SET type = ?, category = ?, date = ?, amount = ?
            WHERE id = ?
            "#,
        )
        .bind(transaction.kind.as_str())
        .bind(&transaction.category)
        .bind(transaction.date)
        .bind(transaction.amount)
        .bind(transaction.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Delete a transaction by id
    pub async fn delete_transaction(&self, transaction_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM transactions WHERE id = ?
            "#,
        )
        .bind(transaction_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Delete all of a user's transactions
    pub async fn clear_user_transactions(&self, user_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM transactions WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    fn map_row(row: &sqlx::sqlite::SqliteRow) -> Transaction {
        Transaction {
            id: row.get("id"),
            kind: TransactionType::from_column(row.get::<String, _>("type").as_str()),
            category: row.get("category"),
            date: row.get("date"),
            amount: row.get("amount"),
            user_id: row.get("user_id"),
        }
    }
}
