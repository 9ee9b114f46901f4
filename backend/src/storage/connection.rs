use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:finance_tracker.db";

/// Built-in category set, seeded once when the database is first created.
/// The owner id 0 marks them as shared defaults visible to every user.
const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Food", "ic_category_food", "#FF9800"),
    ("Transport", "ic_category_transport", "#2196F3"),
    ("Shopping", "ic_category_shopping", "#9C27B0"),
    ("Health", "ic_category_health", "#F44336"),
    ("Salary", "ic_category_salary", "#4CAF50"),
    ("Other", "ic_category_other", "#808080"),
];

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Create users table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                email TEXT NOT NULL,
                password TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for email lookups at login
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_users_email
            ON users(email);
            "#,
        )
        .execute(pool)
        .await?;

        // Create categories table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                icon_name TEXT NOT NULL,
                color_hex TEXT NOT NULL,
                is_default BOOLEAN NOT NULL DEFAULT FALSE,
                user_id INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for per-user category listing
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_categories_user_id
            ON categories(user_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Create transactions table. The category column is a loose string
        // link to categories.name, intentionally without a foreign key.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                date INTEGER NOT NULL,
                amount REAL NOT NULL,
                user_id INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for per-user listing ordered by date
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_transactions_user_date
            ON transactions(user_id, date DESC);
            "#,
        )
        .execute(pool)
        .await?;

        // Create budgets table (append-only ledger; latest row per user wins)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS budgets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                user_id INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for latest-budget lookup
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_budgets_user_id
            ON budgets(user_id, id DESC);
            "#,
        )
        .execute(pool)
        .await?;

        // Create session table (single row holding the logged-in user and
        // the theme preference)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                current_user_id INTEGER,
                theme_mode TEXT NOT NULL DEFAULT 'System',
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(pool)
        .await?;

        Self::seed_default_categories(pool).await?;

        Ok(())
    }

    /// Insert the built-in category set if this is a fresh database.
    async fn seed_default_categories(pool: &SqlitePool) -> Result<()> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count FROM categories WHERE user_id = 0
            "#,
        )
        .fetch_one(pool)
        .await?;

        let count: i64 = row.get("count");
        if count > 0 {
            return Ok(());
        }

        for &(name, icon_name, color_hex) in DEFAULT_CATEGORIES {
            sqlx::query(
                r#"
                INSERT INTO categories (name, icon_name, color_hex, is_default, user_id)
                VALUES (?, ?, ?, TRUE, 0)
                "#,
            )
            .bind(name)
            .bind(icon_name)
            .bind(color_hex)
            .execute(pool)
            .await?;
        }

        Ok(())
    }

    /// Wipe every table and the session row. Used by the full app-data
    /// reset; defaults are reseeded the next time a connection is opened.
    pub async fn clear_all_tables(&self) -> Result<()> {
        for table in ["transactions", "budgets", "categories", "users", "session"] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(self.pool())
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_setup_seeds_defaults_once() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        let row = sqlx::query("SELECT COUNT(*) AS count FROM categories WHERE user_id = 0")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let count: i64 = row.get("count");
        assert_eq!(count, DEFAULT_CATEGORIES.len() as i64);

        // Running setup again must not duplicate the seed set
        DbConnection::setup_schema(db.pool()).await.unwrap();
        let row = sqlx::query("SELECT COUNT(*) AS count FROM categories WHERE user_id = 0")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let count: i64 = row.get("count");
        assert_eq!(count, DEFAULT_CATEGORIES.len() as i64);
    }

    #[tokio::test]
    async fn test_clear_all_tables() {
        let db = DbConnection::init_test().await.unwrap();

        sqlx::query("INSERT INTO users (username, email, password) VALUES ('a', 'a@b.c', 'secret')")
            .execute(db.pool())
            .await
            .unwrap();

        db.clear_all_tables().await.unwrap();

        let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let count: i64 = row.get("count");
        assert_eq!(count, 0);
        let row = sqlx::query("SELECT COUNT(*) AS count FROM categories")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let count: i64 = row.get("count");
        assert_eq!(count, 0);
    }
}
