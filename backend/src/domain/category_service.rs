//! Category management: listing, creation, deletion (with the default-set
//! guard) and name resolution for rendering.

use anyhow::{anyhow, Result};
use log::info;
use std::sync::Arc;
use shared::{Category, CreateCategoryRequest};
use crate::storage::{connection::DbConnection, repositories::CategoryRepository};

#[derive(Clone)]
pub struct CategoryService {
    category_repository: CategoryRepository,
}

impl CategoryService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        let category_repository = CategoryRepository::new((*db).clone());
        Self { category_repository }
    }

    /// List the categories visible to a user (shared defaults plus own).
    pub async fn list_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        self.category_repository.get_all_categories(user_id).await
    }

    /// Create a user-owned category. User-created rows are never defaults,
    /// whatever the caller sends.
    pub async fn create_category(&self, user_id: i64, request: CreateCategoryRequest) -> Result<Category> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Category name cannot be empty"));
        }

        let icon_name = if request.icon_name.trim().is_empty() {
            "ic_category_other".to_string()
        } else {
            request.icon_name
        };
        let color_hex = if request.color_hex.trim().is_empty() {
            "#808080".to_string()
        } else {
            request.color_hex
        };

        let mut category = Category {
            id: 0,
            name: name.to_string(),
            icon_name,
            color_hex,
            is_default: false,
            user_id,
        };
        category.id = self.category_repository.store_category(&category).await?;

        info!("Created category '{}' for user {}", category.name, user_id);
        Ok(category)
    }

    /// Delete a category by id. Shared defaults are protected; an id that
    /// no longer exists is a silent no-op.
    pub async fn delete_category(&self, category_id: i64) -> Result<()> {
        match self.category_repository.get_category(category_id).await? {
            Some(category) if category.is_default => {
                Err(anyhow!("Default categories cannot be deleted"))
            }
            Some(category) => {
                self.category_repository.delete_category(category_id).await?;
                info!("Deleted category '{}'", category.name);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Resolve a transaction's category name to a category for icon/color
    /// rendering. Names that no longer exist (renamed or deleted since the
    /// transaction was written) resolve to the built-in fallback.
    pub async fn resolve_category(&self, user_id: i64, name: &str) -> Result<Category> {
        match self.category_repository.get_by_name(user_id, name).await? {
            Some(category) => Ok(category),
            None => Ok(Category::fallback()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_service() -> CategoryService {
        let db = Arc::new(DbConnection::init_test().await.unwrap());
        CategoryService::new(db)
    }

    fn request(name: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: name.to_string(),
            icon_name: "ic_category_star".to_string(),
            color_hex: "#224466".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_category_blank_name_refused() {
        let service = create_test_service().await;
        assert!(service.create_category(1, request("   ")).await.is_err());
    }

    #[tokio::test]
    async fn test_create_category_is_never_default() {
        let service = create_test_service().await;
        let created = service.create_category(1, request("Books")).await.unwrap();
        assert!(!created.is_default);
        assert_eq!(created.user_id, 1);
        assert!(created.id > 0);
    }

    #[tokio::test]
    async fn test_delete_default_refused() {
        let service = create_test_service().await;

        let defaults = service.list_categories(1).await.unwrap();
        let food = defaults.iter().find(|c| c.name == "Food").unwrap();

        let err = service.delete_category(food.id).await.unwrap_err();
        assert!(err.to_string().contains("cannot be deleted"));
        // Still there afterwards
        assert!(service
            .list_categories(1)
            .await
            .unwrap()
            .iter()
            .any(|c| c.name == "Food"));
    }

    #[tokio::test]
    async fn test_delete_user_category_and_missing_noop() {
        let service = create_test_service().await;

        let created = service.create_category(1, request("Books")).await.unwrap();
        service.delete_category(created.id).await.unwrap();
        // Deleting again is fine
        service.delete_category(created.id).await.unwrap();

        assert!(!service
            .list_categories(1)
            .await
            .unwrap()
            .iter()
            .any(|c| c.name == "Books"));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_for_stale_name() {
        let service = create_test_service().await;

        let food = service.resolve_category(1, "Food").await.unwrap();
        assert_eq!(food.name, "Food");

        let stale = service.resolve_category(1, "Long Gone").await.unwrap();
        assert_eq!(stale, Category::fallback());
    }
}
