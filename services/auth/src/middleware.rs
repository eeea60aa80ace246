//! Middleware for cookie-carried JWT validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::{
    AppState,
    cookies::cookie_name,
    error::{AuthError, AuthResult},
    jwt::{Claims, JwtService, TokenType},
};

/// Verified token attached to the request for downstream handlers
///
/// Handlers need the raw token to compare it with the stored session.
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub claims: Claims,
    pub token: String,
}

/// Check a token taken from the request against the required kind
///
/// A missing token is rejected without touching the codec.
pub fn authorize(
    jwt: &JwtService,
    token: Option<&str>,
    kind: TokenType,
) -> AuthResult<AuthPayload> {
    let token = token.ok_or_else(|| AuthError::Unauthorized("no token provided".to_string()))?;

    let claims = jwt.verify(token, kind).map_err(|e| {
        warn!("Rejected {} token: {}", kind, e);
        AuthError::Unauthorized("invalid token".to_string())
    })?;

    Ok(AuthPayload {
        claims,
        token: token.to_string(),
    })
}

async fn gate(
    state: &AppState,
    jar: &CookieJar,
    kind: TokenType,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = jar.get(cookie_name(kind)).map(|cookie| cookie.value());
    let payload = authorize(state.auth_service.jwt_service(), token, kind)?;

    req.extensions_mut().insert(payload);
    Ok(next.run(req).await)
}

/// Require a valid `accessToken` cookie
pub async fn require_access_token(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    gate(&state, &jar, TokenType::Access, req, next).await
}

/// Require a valid `refreshToken` cookie
pub async fn require_refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    gate(&state, &jar, TokenType::Refresh, req, next).await
}
