//! In-memory user directory and the register/login endpoints.
//!
//! The directory is the identity collaborator for the ticket core: it issues
//! the role-bearing tokens every ticket endpoint is gated on. Accounts live
//! for the process lifetime only.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::security::{hash_password, verify_password};
use crate::shared::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    Client,
    ItStaff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::ItStaff => "it-staff",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("{0}")]
    Validation(String),

    #[error("a user with email {0} already exists")]
    DuplicateEmail(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DirectoryError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DuplicateEmail(_) => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DirectoryError> for (StatusCode, String) {
    fn from(err: DirectoryError) -> Self {
        (err.status_code(), err.to_string())
    }
}

#[derive(Clone, Default)]
pub struct UserDirectory {
    users: Arc<RwLock<Vec<UserAccount>>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<UserAccount, DirectoryError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(DirectoryError::Validation("name is required".into()));
        }
        if email.is_empty() {
            return Err(DirectoryError::Validation("email is required".into()));
        }
        if password.is_empty() {
            return Err(DirectoryError::Validation("password is required".into()));
        }

        let password_hash = hash_password(password)?;
        let account = UserAccount {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            created_at: Utc::now(),
        };

        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == account.email) {
            return Err(DirectoryError::DuplicateEmail(account.email));
        }
        users.push(account.clone());

        Ok(account)
    }

    /// Verifies a credential pair and returns the matching account. A missing
    /// user and a wrong password are indistinguishable to the caller.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserAccount, DirectoryError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(DirectoryError::Validation(
                "user and password are required".into(),
            ));
        }

        let account = {
            let users = self.users.read().await;
            users.iter().find(|u| u.email == email.trim()).cloned()
        };

        let Some(account) = account else {
            return Err(DirectoryError::InvalidCredentials);
        };

        if verify_password(password, &account.password_hash)? {
            Ok(account)
        } else {
            Err(DirectoryError::InvalidCredentials)
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Option<UserAccount> {
        let users = self.users.read().await;
        users.iter().find(|u| u.email == email).cloned()
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub user_type: UserRole,
}

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<UserAccount> for RegisteredUser {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredUser>), (StatusCode, String)> {
    let account = state
        .directory
        .register(&req.name, &req.email, &req.password, req.user_type)
        .await?;

    info!("user {} registered as {}", account.email, account.role.as_str());
    Ok((StatusCode::CREATED, Json(account.into())))
}

pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let account = match state.directory.authenticate(&req.user, &req.password).await {
        Ok(account) => account,
        Err(err) => {
            warn!("login rejected for {}: {err}", req.user);
            return Err(err.into());
        }
    };

    let token = state
        .jwt
        .issue_token(account.id, &account.email, account.role)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Token error: {e}")))?;

    info!("user {} logged in", account.email);
    Ok(Json(LoginResponse { token }))
}

pub fn configure_user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/register", post(register_user))
        .route("/users/login", post(login_user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let directory = UserDirectory::new();

        let account = directory
            .register("Alice", "alice@example.com", "s3cret-pass", UserRole::Client)
            .await
            .expect("Failed to register");
        assert_eq!(account.role, UserRole::Client);
        assert_ne!(account.password_hash, "s3cret-pass");

        let authed = directory
            .authenticate("alice@example.com", "s3cret-pass")
            .await
            .expect("Failed to authenticate");
        assert_eq!(authed.id, account.id);

        let found = directory
            .find_by_email("alice@example.com")
            .await
            .expect("User not found");
        assert_eq!(found.id, account.id);
        assert!(directory.find_by_email("nobody@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let directory = UserDirectory::new();

        directory
            .register("Alice", "alice@example.com", "s3cret-pass", UserRole::Client)
            .await
            .expect("Failed to register");

        let result = directory
            .register("Other Alice", "alice@example.com", "different", UserRole::ItStaff)
            .await;
        assert!(matches!(result, Err(DirectoryError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let directory = UserDirectory::new();

        directory
            .register("Alice", "alice@example.com", "s3cret-pass", UserRole::Client)
            .await
            .expect("Failed to register");

        let result = directory.authenticate("alice@example.com", "wrong").await;
        assert!(matches!(result, Err(DirectoryError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_user_rejected() {
        let directory = UserDirectory::new();
        let result = directory.authenticate("nobody@example.com", "whatever").await;
        assert!(matches!(result, Err(DirectoryError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_blank_fields_rejected() {
        let directory = UserDirectory::new();

        let result = directory
            .register("  ", "alice@example.com", "s3cret-pass", UserRole::Client)
            .await;
        assert!(matches!(result, Err(DirectoryError::Validation(_))));

        let result = directory.authenticate("", "").await;
        assert!(matches!(result, Err(DirectoryError::Validation(_))));
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(
            serde_json::to_string(&UserRole::ItStaff).expect("serialize"),
            "\"it-staff\""
        );
        assert_eq!(
            serde_json::from_str::<UserRole>("\"client\"").expect("deserialize"),
            UserRole::Client
        );
    }
}
