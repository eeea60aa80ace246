//! Auth cookie names and `Set-Cookie` values

use axum::http::{HeaderName, header};

use crate::jwt::{JwtService, TokenPair, TokenType};

/// Cookie carrying the access token
pub const ACCESS_COOKIE_NAME: &str = "accessToken";

/// Cookie carrying the refresh token
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Name of the cookie that carries tokens of `kind`
pub fn cookie_name(kind: TokenType) -> &'static str {
    match kind {
        TokenType::Access => ACCESS_COOKIE_NAME,
        TokenType::Refresh => REFRESH_COOKIE_NAME,
    }
}

/// HttpOnly cookie living for `max_age` seconds
pub fn set_cookie(name: &str, value: &str, max_age: u64, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
        name, value, max_age, secure
    )
}

/// Expire a cookie immediately
pub fn clear_cookie(name: &str, secure: bool) -> String {
    set_cookie(name, "", 0, secure)
}

/// `Set-Cookie` headers delivering both halves of a pair
pub fn token_cookies(
    pair: &TokenPair,
    jwt: &JwtService,
    secure: bool,
) -> [(HeaderName, String); 2] {
    [
        (
            header::SET_COOKIE,
            set_cookie(
                ACCESS_COOKIE_NAME,
                &pair.access_token,
                jwt.expiry(TokenType::Access),
                secure,
            ),
        ),
        (
            header::SET_COOKIE,
            set_cookie(
                REFRESH_COOKIE_NAME,
                &pair.refresh_token,
                jwt.expiry(TokenType::Refresh),
                secure,
            ),
        ),
    ]
}

/// `Set-Cookie` headers removing both tokens
pub fn cleared_cookies(secure: bool) -> [(HeaderName, String); 2] {
    [
        (header::SET_COOKIE, clear_cookie(ACCESS_COOKIE_NAME, secure)),
        (header::SET_COOKIE, clear_cookie(REFRESH_COOKIE_NAME, secure)),
    ]
}
