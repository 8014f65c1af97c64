// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token verification middleware.
//!
//! Sessions are issued by the hosted identity service; this service only
//! checks the signature and pulls out the user ID.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie set by the web client's SSR helper.
pub const SESSION_COOKIE: &str = "sb-access-token";
/// Audience the identity service stamps on signed-in sessions.
pub const SESSION_AUDIENCE: &str = "authenticated";

/// JWT claims issued by the identity service.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user UUID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    pub aud: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Authenticated user extracted from the session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    /// Raw token, forwarded to the data service so row-level security applies
    pub token: String,
}

/// Middleware that requires a valid session token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Header first, then cookie
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
        Some(_) => return Err(StatusCode::UNAUTHORIZED),
        None => match jar.get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => return Err(StatusCode::UNAUTHORIZED),
        },
    };

    let user_id = verify_session_token(&token, &state.config.backend_jwt_secret)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(AuthUser { user_id, token });

    Ok(next.run(request).await)
}

/// Verify a session token and return its subject.
pub fn verify_session_token(token: &str, secret: &[u8]) -> Option<String> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[SESSION_AUDIENCE]);

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) if !data.claims.sub.is_empty() => Some(data.claims.sub),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected session token");
            None
        }
    }
}
