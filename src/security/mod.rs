//! Session token validation and the per-request viewer context.

pub mod jwt;
pub mod password;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, StatusCode},
};
use std::sync::Arc;

use crate::directory::UserRole;
use crate::shared::error::TicketError;
use crate::shared::state::AppState;

pub use jwt::{Claims, JwtConfig, JwtManager};
pub use password::{hash_password, verify_password};

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|auth| {
            if auth.to_lowercase().starts_with("bearer ") {
                Some(auth[7..].to_string())
            } else {
                None
            }
        })
}

/// The authenticated caller of a request: identity string plus role. Every
/// ticket read is gated on this, so it is resolved once per request from the
/// bearer token.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub identity: String,
    pub role: UserRole,
}

impl Viewer {
    pub fn is_staff(&self) -> bool {
        self.role == UserRole::ItStaff
    }

    pub fn require_staff(&self) -> Result<(), TicketError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(TicketError::StaffOnly)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);

        let token = extract_bearer_token(&parts.headers)
            .ok_or((StatusCode::UNAUTHORIZED, "No authentication token"))?;

        let claims = state
            .jwt
            .validate_token(&token)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid token"))?;

        Ok(Viewer {
            identity: claims.email,
            role: claims.role,
        })
    }
}
