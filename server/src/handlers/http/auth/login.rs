use std::convert::Infallible;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use tracing::{error, info, warn};

use shared::types::{LoginData, LoginResponse};

use crate::AppState;
use crate::database::utils::{
    canonical_email, decoy_password_hash, get_timestamp, verify_password,
};
use crate::error::ApiError;
use crate::handlers::http::utils::{deliver_serialized_json, read_json};

/// `POST /login`
pub async fn handle_login(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing login request");

    let limit = state.config.server.max_body_bytes;
    let data: LoginData = match read_json(req, limit).await {
        Ok(data) => data,
        Err(e) => return e.into_response(),
    };

    match attempt_login(data, &state).await {
        Ok(response) => deliver_serialized_json(&response, StatusCode::OK),
        Err(e) => e.into_response(),
    }
}

async fn attempt_login(data: LoginData, state: &AppState) -> Result<LoginResponse, ApiError> {
    let email = canonical_email(&data.email);
    if email.is_empty() || data.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let Some(user) = state.store.get_user_auth(&email).await? else {
        if let Some(decoy) = decoy_password_hash() {
            let _ = verify_password(decoy, &data.password);
        }
        warn!("Login failed: unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    let password_ok = check_password(&user.password_hash, &data.password).map_err(|e| {
        error!(user_id = user.id, "Stored password hash unreadable: {}", e);
        e
    })?;
    if !password_ok {
        warn!(user_id = user.id, "Login failed: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let now = u64::try_from(get_timestamp()).unwrap_or(0);
    let token = state.tokens.issue(user.id, now).map_err(|e| {
        error!(user_id = user.id, "Token signing failed: {}", e);
        ApiError::Internal(e.to_string())
    })?;

    info!(user_id = user.id, "User logged in");

    Ok(LoginResponse {
        token,
        expires_in: state.tokens.lifetime_secs(),
    })
}

/// An unreadable stored hash is a server fault, not a wrong password.
fn check_password(hash: &str, password: &str) -> Result<bool, ApiError> {
    verify_password(hash, password).map_err(|e| ApiError::Internal(e.to_string()))
}
