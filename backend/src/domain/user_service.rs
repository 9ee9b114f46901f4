//! Account management: signup, login, guest access, password changes and
//! the full app-data reset.

use anyhow::{anyhow, Result};
use log::{info, warn};
use std::sync::Arc;
use shared::{ChangePasswordRequest, LoginRequest, SignupRequest, User};
use crate::storage::{connection::DbConnection, repositories::{SessionRepository, UserRepository}};

/// Email of the implicit account used by "continue as guest".
const GUEST_EMAIL: &str = "guest@local";

#[derive(Clone)]
pub struct UserService {
    db: Arc<DbConnection>,
    user_repository: UserRepository,
    session_repository: SessionRepository,
}

impl UserService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        let user_repository = UserRepository::new((*db).clone());
        let session_repository = SessionRepository::new((*db).clone());
        Self {
            db,
            user_repository,
            session_repository,
        }
    }

    /// Create an account and log it in.
    ///
    /// All validation happens before any store write: no field may be
    /// blank, the email must look like an email, the password must be at
    /// least 6 characters, and the email must not already have an account.
    pub async fn sign_up(&self, request: SignupRequest) -> Result<User> {
        let username = request.username.trim();
        let email = request.email.trim();
        let password = request.password.trim();

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(anyhow!("Please fill all fields"));
        }
        if !is_valid_email(email) {
            return Err(anyhow!("Invalid email format"));
        }
        if password.len() < 6 {
            return Err(anyhow!("Password must be at least 6 characters"));
        }
        if self.user_repository.get_user_by_email(email).await?.is_some() {
            return Err(anyhow!("An account with this email already exists"));
        }

        let mut user = User {
            id: 0,
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        user.id = self.user_repository.store_user(&user).await?;
        self.session_repository.set_current_user(user.id).await?;

        info!("Created account {} for {}", user.id, user.email);
        Ok(user)
    }

    /// Log in with email and password. An unknown combination is a
    /// user-facing error, not a crash.
    pub async fn log_in(&self, request: LoginRequest) -> Result<User> {
        let email = request.email.trim();
        let password = request.password.trim();

        if email.is_empty() || password.is_empty() {
            return Err(anyhow!("Please fill all fields"));
        }
        if !is_valid_email(email) {
            return Err(anyhow!("Invalid email format"));
        }
        if password.len() < 6 {
            return Err(anyhow!("Password must be at least 6 characters"));
        }

        match self.user_repository.get_user(email, password).await? {
            Some(user) => {
                self.session_repository.set_current_user(user.id).await?;
                info!("User {} logged in", user.id);
                Ok(user)
            }
            None => {
                warn!("Failed login attempt for {}", email);
                Err(anyhow!("Invalid credentials"))
            }
        }
    }

    /// Log in without an account, creating the shared guest user on first
    /// use and reusing it afterwards.
    pub async fn log_in_as_guest(&self) -> Result<User> {
        let user = match self.user_repository.get_user_by_email(GUEST_EMAIL).await? {
            Some(existing) => existing,
            None => {
                let mut guest = User {
                    id: 0,
                    username: "Guest".to_string(),
                    email: GUEST_EMAIL.to_string(),
                    password: String::new(),
                };
                guest.id = self.user_repository.store_user(&guest).await?;
                info!("Created guest account {}", guest.id);
                guest
            }
        };

        self.session_repository.set_current_user(user.id).await?;
        Ok(user)
    }

    /// Change a user's password after checking the current one.
    pub async fn change_password(&self, user_id: i64, request: ChangePasswordRequest) -> Result<()> {
        if request.new_password != request.confirm_new_password {
            return Err(anyhow!("New passwords do not match"));
        }
        if request.new_password.trim().len() < 6 {
            return Err(anyhow!("Password must be at least 6 characters"));
        }

        let user = self.user_repository.get_user_by_id(user_id).await?;
        match user {
            Some(user) if user.password == request.current_password => {
                let updated = User {
                    password: request.new_password.trim().to_string(),
                    ..user
                };
                self.user_repository.update_user(&updated).await?;
                info!("Password updated for user {}", user_id);
                Ok(())
            }
            _ => Err(anyhow!("Current password is incorrect")),
        }
    }

    /// Get the profile for display on the settings screen. A missing user
    /// is an empty state, not an error.
    pub async fn get_profile(&self, user_id: i64) -> Result<Option<User>> {
        self.user_repository.get_user_by_id(user_id).await
    }

    /// Clear the session; the stored data stays put.
    pub async fn log_out(&self) -> Result<()> {
        self.session_repository.clear().await
    }

    /// Wipe every table and the session. Default categories come back the
    /// next time the database is opened.
    pub async fn reset_app_data(&self) -> Result<()> {
        warn!("Resetting all app data");
        self.db.clear_all_tables().await?;
        self.session_repository.clear().await?;
        Ok(())
    }
}

/// Minimal email shape check: one '@' with a dot somewhere after it.
fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
