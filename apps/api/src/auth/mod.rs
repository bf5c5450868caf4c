//! Service-layer authentication. The pipeline never sees credentials; routes
//! that need a caller take an `AuthUser` extractor.

pub mod handlers;

use std::collections::HashMap;
use std::sync::RwLock;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone)]
struct Session {
    email: String,
    expires_at: DateTime<Utc>,
}

/// In-memory bearer sessions keyed by opaque token.
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Issues a fresh token and drops sessions that have already expired.
    pub fn issue(&self, email: &str) -> Uuid {
        self.issue_at(email, Utc::now())
    }

    /// Returns the session's email if the token is known and unexpired.
    pub fn validate(&self, token: Uuid) -> Option<String> {
        self.validate_at(token, Utc::now())
    }

    fn issue_at(&self, email: &str, now: DateTime<Utc>) -> Uuid {
        let token = Uuid::new_v4();
        let mut sessions = self.sessions.write().unwrap_or_else(|p| p.into_inner());
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(
            token,
            Session {
                email: email.to_string(),
                expires_at: now + self.ttl,
            },
        );
        token
    }

    fn validate_at(&self, token: Uuid, now: DateTime<Utc>) -> Option<String> {
        let sessions = self.sessions.read().unwrap_or_else(|p| p.into_inner());
        sessions
            .get(&token)
            .filter(|s| s.expires_at > now)
            .map(|s| s.email.clone())
    }
}

/// An authenticated caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|t| Uuid::parse_str(t.trim()).ok())
            .ok_or(AppError::Unauthorized)?;

        let email = state
            .sessions
            .validate(token)
            .ok_or(AppError::Unauthorized)?;
        Ok(AuthUser { email })
    }
}
