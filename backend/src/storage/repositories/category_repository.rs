use anyhow::Result;
use sqlx::Row;
use shared::Category;
use crate::storage::connection::DbConnection;

/// Repository for category operations
#[derive(Clone)]
pub struct CategoryRepository {
    db: DbConnection,
}

impl CategoryRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a category in the database, returning the assigned id
    pub async fn store_category(&self, category: &Category) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO categories (name, icon_name, color_hex, is_default, user_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&category.name)
        .bind(&category.icon_name)
        .bind(&category.color_hex)
        .bind(category.is_default)
        .bind(category.user_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a category by id
    pub async fn get_category(&self, category_id: i64) -> Result<Option<Category>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, icon_name, color_hex, is_default, user_id
            FROM categories
            WHERE id = ?
            "#,
        )
        .bind(category_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| Self::map_row(&r)))
    }

    /// List the categories visible to a user: the shared defaults plus the
    /// user's own rows, ordered by name.
    pub async fn get_all_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, icon_name, color_hex, is_default, user_id
            FROM categories
            WHERE user_id = 0 OR user_id = ?
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::map_row).collect())
    }

    /// List only the user's own non-default categories (the set included in
    /// a backup).
    pub async fn get_user_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, icon_name, color_hex, is_default, user_id
            FROM categories
            WHERE user_id = ? AND is_default = FALSE
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::map_row).collect())
    }

    /// Resolve a category name for a user, preferring the user's own row
    /// over a shared default with the same name.
    pub async fn get_by_name(&self, user_id: i64, name: &str) -> Result<Option<Category>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, icon_name, color_hex, is_default, user_id
            FROM categories
            WHERE name = ? AND (user_id = ? OR user_id = 0)
            ORDER BY user_id DESC
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| Self::map_row(&r)))
    }

    /// Delete a category by id
    pub async fn delete_category(&self, category_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM categories WHERE id = ?
            "#,
        )
        .bind(category_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Delete the user's non-default categories; shared defaults survive.
    pub async fn clear_user_categories(&self, user_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM categories WHERE user_id = ? AND is_default = FALSE
            "#,
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    fn map_row(row: &sqlx::sqlite::SqliteRow) -> Category {
        Category {
            id: row.get("id"),
            name: row.get("name"),
            icon_name: row.get("icon_name"),
            color_hex: row.get("color_hex"),
            is_default: row.get("is_default"),
            user_id: row.get("user_id"),
        }
    }
}
