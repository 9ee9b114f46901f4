use anyhow::Result;
use sqlx::Row;
use shared::User;
use crate::storage::connection::DbConnection;

/// Repository for user account operations
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a user in the database, returning the assigned id
    pub async fn store_user(&self, user: &User) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .execute(self.db.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Look up a user by login credentials
    pub async fn get_user(&self, email: &str, password: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password
            FROM users
            WHERE email = ? AND password = ?
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(password)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(User {
                id: r.get("id"),
                username: r.get("username"),
                email: r.get("email"),
                password: r.get("password"),
            })),
            None => Ok(None),
        }
    }

    /// Get a user by id
    pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password
            FROM users
            WHERE id = ?
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(User {
                id: r.get("id"),
                username: r.get("username"),
                email: r.get("email"),
                password: r.get("password"),
            })),
            None => Ok(None),
        }
    }

    /// Get a user by email address
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password
            FROM users
            WHERE email = ?
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(User {
                id: r.get("id"),
                username: r.get("username"),
                email: r.get("email"),
                password: r.get("password"),
            })),
            None => Ok(None),
        }
    }

    /// Update a user by id. A missing id is a silent no-op.
    pub async fn update_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, password = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> UserRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        UserRepository::new(db)
    }

    fn test_user(email: &str) -> User {
        User {
            id: 0,
            username: "tester".to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_and_get_user() {
        let repo = setup_test().await;

        let id = repo.store_user(&test_user("a@example.com")).await.unwrap();
        assert!(id > 0);

        let found = repo.get_user("a@example.com", "secret123").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id, id);

        // Wrong password is an empty lookup, not an error
        let missing = repo.get_user("a@example.com", "wrong").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_user_changes_password() {
        let repo = setup_test().await;

        let id = repo.store_user(&test_user("b@example.com")).await.unwrap();
        let mut user = repo.get_user_by_id(id).await.unwrap().unwrap();
        user.password = "newsecret".to_string();
        repo.update_user(&user).await.unwrap();

        let reloaded = repo.get_user_by_id(id).await.unwrap().unwrap();
        assert_eq!(reloaded.password, "newsecret");
    }

    #[tokio::test]
    async fn test_update_missing_user_is_noop() {
        let repo = setup_test().await;

        let mut ghost = test_user("ghost@example.com");
        ghost.id = 999;
        repo.update_user(&ghost).await.unwrap();

        assert!(repo.get_user_by_id(999).await.unwrap().is_none());
    }
}
