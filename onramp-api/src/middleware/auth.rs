//! Authentication middleware
//!
//! Validates HTTP Basic credentials against the configured admin account.
//! Every route except /healthz sits behind this middleware; a config flag
//! can disable it for development.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::ErrorResponse;
use crate::state::AppState;

/// Rejection emitted when authentication fails
pub struct AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "authentication credentials are invalid or missing",
            )),
        )
            .into_response()
    }
}

/// Extracted user information from authentication
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}

/// Basic-auth middleware
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if state.config.auth.disabled {
        request.extensions_mut().insert(AuthUser {
            username: "anonymous".to_string(),
        });
        return Ok(next.run(request).await);
    }

    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError)?;

    let (username, password) = parse_basic(header).ok_or(AuthError)?;

    if !constant_time_eq(&username, &state.config.auth.admin_username)
        || !constant_time_eq(&password, &state.config.auth.admin_password)
    {
        return Err(AuthError);
    }

    request.extensions_mut().insert(AuthUser { username });
    Ok(next.run(request).await)
}

/// Parse an `Authorization: Basic ...` header value into credentials
fn parse_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Constant-time string comparison
fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        // "admin:secret"
        let (user, pass) = parse_basic("Basic YWRtaW46c2VjcmV0").unwrap();
        assert_eq!(user, "admin");
        assert_eq!(pass, "secret");
    }

    #[test]
    fn test_parse_basic_password_with_colon() {
        // "admin:pa:ss"
        let (user, pass) = parse_basic("Basic YWRtaW46cGE6c3M=").unwrap();
        assert_eq!(user, "admin");
        assert_eq!(pass, "pa:ss");
    }

    #[test]
    fn test_parse_basic_rejects_other_schemes() {
        assert!(parse_basic("Bearer abcdef").is_none());
        assert!(parse_basic("Basic !!!").is_none());
    }

    #[test]
    fn test_parse_basic_requires_separator() {
        // "adminsecret" without a colon
        assert!(parse_basic("Basic YWRtaW5zZWNyZXQ=").is_none());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("secret", "secret"));
        assert!(!constant_time_eq("secret", "secrex"));
        assert!(!constant_time_eq("secret", "secrets"));
        assert!(!constant_time_eq("", "x"));
    }
}
