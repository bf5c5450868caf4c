use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// POST /api/v1/token
///
/// Exchanges the configured account's credentials for a bearer token.
pub async fn handle_token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let account = &state.config.auth;
    if !form.username.eq_ignore_ascii_case(&account.email) || form.password != account.password {
        warn!("Rejected login for '{}'", form.username);
        return Err(AppError::Unauthorized);
    }

    let token = state.sessions.issue(&account.email);
    info!("Issued session token for '{}'", account.email);

    Ok(Json(TokenResponse {
        access_token: token.to_string(),
        token_type: "bearer",
    }))
}
