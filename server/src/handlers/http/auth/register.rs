use std::convert::Infallible;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use tracing::{info, warn};

use shared::types::{RegistrationData, RegistrationResponse};

use crate::AppState;
use crate::database::NewUser;
use crate::database::utils::{canonical_email, hash_password, is_valid_email};
use crate::error::ApiError;
use crate::handlers::http::utils::{deliver_serialized_json, read_json};

/// `POST /register`
pub async fn handle_register(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing registration request");

    let limit = state.config.server.max_body_bytes;
    let data: RegistrationData = match read_json(req, limit).await {
        Ok(data) => data,
        Err(e) => return e.into_response(),
    };

    match register(data, &state).await {
        Ok(user_id) => deliver_serialized_json(
            &RegistrationResponse {
                message: "User registered successfully".to_string(),
                user_id,
            },
            StatusCode::CREATED,
        ),
        Err(e) => e.into_response(),
    }
}

async fn register(data: RegistrationData, state: &AppState) -> Result<i64, ApiError> {
    let email = canonical_email(&data.email);
    validate_registration(&email, &data.password)?;

    if state.store.email_exists(&email).await? {
        warn!("Registration rejected, email already registered");
        return Err(ApiError::Conflict);
    }

    let password_hash =
        hash_password(&data.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    // A concurrent registration can still win the race; the UNIQUE index
    // turns that into `Conflict` as well.
    let user_id = state
        .store
        .create_user(NewUser {
            email,
            password_hash,
        })
        .await?;

    info!(user_id, "User registered");
    Ok(user_id)
}

fn validate_registration(email: &str, password: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::Validation("Missing required field: email".to_string()));
    }
    if !is_valid_email(email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    if password.is_empty() {
        return Err(ApiError::Validation("Missing required field: password".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_registration() {
        assert!(validate_registration("user@example.com", "hunter22").is_ok());
    }

    #[test]
    fn rejects_bad_email_and_blank_password() {
        assert!(matches!(
            validate_registration("not-an-email", "pw"),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validate_registration("", "pw"),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validate_registration("user@example.com", ""),
            Err(ApiError::Validation(_))
        ));
    }
}
