//! # Finance Tracker Backend
//!
//! Contains all non-UI logic for the finance tracker application.
//!
//! The backend is layered: a UI shell calls domain services, services call
//! repositories, repositories talk to the embedded SQLite store. Every
//! store access is async; shells dispatch onto the runtime and marshal the
//! result back to their foreground thread.
//!
//! ```text
//! UI Layer (mobile shell)
//!     ↓
//! Domain Layer (services)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```
//!
//! Screen rendering, navigation, dialogs, notification scheduling and the
//! file picker all live in the shell; the backend only exposes the data
//! operations those screens need.

pub mod storage;
pub mod domain;

use std::sync::Arc;

use anyhow::Result;
use log::info;
use tracing::Level;

use crate::domain::{
    BackupService, BudgetService, CategoryService, SessionService, TransactionService, UserService,
};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub category_service: CategoryService,
    pub transaction_service: TransactionService,
    pub budget_service: BudgetService,
    pub session_service: SessionService,
    pub backup_service: BackupService,
}

impl AppState {
    /// Build every service over one shared connection handle
    pub fn new(db: Arc<DbConnection>) -> Self {
        Self {
            user_service: UserService::new(db.clone()),
            category_service: CategoryService::new(db.clone()),
            transaction_service: TransactionService::new(db.clone()),
            budget_service: BudgetService::new(db.clone()),
            session_service: SessionService::new(db.clone()),
            backup_service: BackupService::new(db),
        }
    }
}

/// Initialize the backend against a specific database URL
pub async fn initialize_backend_with_url(url: &str) -> Result<AppState> {
    info!("Setting up database");
    let db = Arc::new(DbConnection::new(url).await?);

    info!("Setting up domain services");
    Ok(AppState::new(db))
}

/// Initialize the backend with the standard on-disk database
pub async fn initialize_backend() -> Result<AppState> {
    info!("Setting up database");
    let db = Arc::new(DbConnection::init().await?);
    Ok(AppState::new(db))
}

/// Initialize logging for hosts that do not bring their own subscriber
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();
}
