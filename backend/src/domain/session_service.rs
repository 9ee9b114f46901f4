//! Session façade: the logged-in user id and theme preference, persisted
//! in the single-row session table.

use anyhow::Result;
use std::sync::Arc;
use shared::ThemeMode;
use crate::storage::{connection::DbConnection, repositories::SessionRepository};

#[derive(Clone)]
pub struct SessionService {
    session_repository: SessionRepository,
}

impl SessionService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        let session_repository = SessionRepository::new((*db).clone());
        Self { session_repository }
    }

    /// The logged-in user id, or None when nobody is logged in.
    pub async fn current_user_id(&self) -> Result<Option<i64>> {
        self.session_repository.get_current_user_id().await
    }

    pub async fn set_current_user(&self, user_id: i64) -> Result<()> {
        self.session_repository.set_current_user(user_id).await
    }

    pub async fn theme_mode(&self) -> Result<ThemeMode> {
        self.session_repository.get_theme_mode().await
    }

    pub async fn set_theme_mode(&self, mode: ThemeMode) -> Result<()> {
        self.session_repository.set_theme_mode(mode).await
    }

    /// Clear the session record (user id and theme preference together).
    pub async fn clear(&self) -> Result<()> {
        self.session_repository.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_round_trip() {
        let db = Arc::new(DbConnection::init_test().await.unwrap());
        let service = SessionService::new(db);

        assert!(service.current_user_id().await.unwrap().is_none());
        service.set_current_user(4).await.unwrap();
        service.set_theme_mode(ThemeMode::Dark).await.unwrap();

        assert_eq!(service.current_user_id().await.unwrap(), Some(4));
        assert_eq!(service.theme_mode().await.unwrap(), ThemeMode::Dark);

        service.clear().await.unwrap();
        assert!(service.current_user_id().await.unwrap().is_none());
        assert_eq!(service.theme_mode().await.unwrap(), ThemeMode::System);
    }
}
