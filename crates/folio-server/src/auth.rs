//! Sign-in, sign-up and the bearer token guards

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use folio_core::{CoreError, Credentials, LoginForm, User, validate_login};
use serde_json::json;
use tracing::{info, warn};

use crate::protocol::ApiError;
use crate::server::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub(crate) async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = bearer_token(headers).ok_or(CoreError::Unauthorized)?;
    let user = state
        .auth
        .user_for_token(token)
        .await?
        .ok_or(CoreError::Unauthorized)?;
    Ok(user)
}

/// The admin flag is managed outside the API (`folio admin grant`)
pub(crate) async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let user = require_user(state, headers).await?;
    if !user.is_admin {
        warn!("Rejected admin request from {}", user.email);
        return Err(CoreError::Forbidden.into());
    }
    Ok(user)
}

fn credentials(form: LoginForm) -> Credentials {
    Credentials {
        email: form.email,
        password: form.password,
    }
}

/// POST /api/auth/sign-up - Create a (non-admin) account
pub(crate) async fn api_sign_up(
    State(state): State<AppState>,
    payload: Result<Json<LoginForm>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(form) = payload?;
    validate_login(&form).map_err(ApiError::fields)?;

    match state.auth.sign_up(&credentials(form)).await {
        Ok(user) => {
            info!("Account created for {}", user.email);
            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "user": user,
                    "message": "Your account has been created. Note: You need admin privileges to access the dashboard."
                })),
            )
                .into_response())
        }
        Err(CoreError::Auth(raw)) => Err(ApiError::auth(StatusCode::CONFLICT, &raw)),
        Err(e) => Err(e.into()),
    }
}

/// POST /api/auth/sign-in - Exchange credentials for a bearer token
pub(crate) async fn api_sign_in(
    State(state): State<AppState>,
    payload: Result<Json<LoginForm>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(form) = payload?;
    validate_login(&form).map_err(ApiError::fields)?;

    let session = state.auth.sign_in(&credentials(form)).await?;
    Ok(Json(session).into_response())
}

/// POST /api/auth/sign-out - Drop the current session
pub(crate) async fn api_sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers).ok_or(CoreError::Unauthorized)?;
    state.auth.sign_out(token).await?;
    Ok(Json(json!({ "message": "Signed out" })).into_response())
}

/// GET /api/auth/me - Current user
pub(crate) async fn api_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let user = require_user(&state, &headers).await?;
    Ok(Json(user).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
