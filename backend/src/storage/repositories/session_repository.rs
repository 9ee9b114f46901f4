use anyhow::Result;
use sqlx::Row;
use shared::ThemeMode;
use crate::storage::connection::DbConnection;

/// Repository for the single-row durable session record: the logged-in
/// user id and the theme preference.
#[derive(Clone)]
pub struct SessionRepository {
    db: DbConnection,
}

impl SessionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Get the currently logged-in user id, if any
    pub async fn get_current_user_id(&self) -> Result<Option<i64>> {
        let row = sqlx::query(
            r#"
            SELECT current_user_id
            FROM session
            WHERE id = 1
            "#,
        )
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(r.get("current_user_id")),
            None => Ok(None),
        }
    }

    /// Record the logged-in user, keeping the stored theme preference
    pub async fn set_current_user(&self, user_id: i64) -> Result<()> {
        self.ensure_row().await?;
        sqlx::query(
            r#"
            UPDATE session
            SET current_user_id = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = 1
            "#,
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Get the persisted theme preference, defaulting to System
    pub async fn get_theme_mode(&self) -> Result<ThemeMode> {
        let row = sqlx::query(
            r#"
            SELECT theme_mode
            FROM session
            WHERE id = 1
            "#,
        )
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(ThemeMode::from_column(r.get::<String, _>("theme_mode").as_str())),
            None => Ok(ThemeMode::default()),
        }
    }

    /// Persist the theme preference
    pub async fn set_theme_mode(&self, mode: ThemeMode) -> Result<()> {
        self.ensure_row().await?;
        sqlx::query(
            r#"
            UPDATE session
            SET theme_mode = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = 1
            "#,
        )
        .bind(mode.as_str())
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Drop the session row entirely. This clears the logged-in user AND
    /// resets the theme preference, matching the original app's behavior.
    pub async fn clear(&self) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM session WHERE id = 1
            "#,
        )
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn ensure_row(&self) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO session (id, current_user_id, theme_mode)
            VALUES (1, NULL, 'System')
            "#,
        )
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> SessionRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        SessionRepository::new(db)
    }

    #[tokio::test]
    async fn test_user_id_round_trip() {
        let repo = setup_test().await;

        assert!(repo.get_current_user_id().await.unwrap().is_none());

        repo.set_current_user(7).await.unwrap();
        assert_eq!(repo.get_current_user_id().await.unwrap(), Some(7));

        repo.set_current_user(9).await.unwrap();
        assert_eq!(repo.get_current_user_id().await.unwrap(), Some(9));
    }

    #[tokio::test]
    async fn test_theme_defaults_to_system() {
        let repo = setup_test().await;
        assert_eq!(repo.get_theme_mode().await.unwrap(), ThemeMode::System);
    }

    #[tokio::test]
    async fn test_theme_survives_user_switch() {
        let repo = setup_test().await;

        repo.set_theme_mode(ThemeMode::Dark).await.unwrap();
        repo.set_current_user(3).await.unwrap();

        assert_eq!(repo.get_theme_mode().await.unwrap(), ThemeMode::Dark);
        assert_eq!(repo.get_current_user_id().await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let repo = setup_test().await;

        repo.set_current_user(3).await.unwrap();
        repo.set_theme_mode(ThemeMode::Light).await.unwrap();
        repo.clear().await.unwrap();

        assert!(repo.get_current_user_id().await.unwrap().is_none());
        assert_eq!(repo.get_theme_mode().await.unwrap(), ThemeMode::System);
    }
}
