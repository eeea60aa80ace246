//! JWT service for token generation and validation
//!
//! Access and refresh tokens are HS256-signed with two independent secrets.
//! Every token carries its kind in the `tokenType` claim and a verifier only
//! accepts the kind it was asked for.

use anyhow::Result;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Upper bound for any token lifetime (one year)
pub const MAX_TOKEN_EXPIRY: u64 = 365 * 24 * 60 * 60;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret used to sign access tokens
    pub access_secret: String,
    /// Secret used to sign refresh tokens
    pub refresh_secret: String,
    /// Access token expiration time in seconds (default: 15 minutes)
    pub access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 24 hours)
    pub refresh_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_ACCESS_SECRET`: Secret for access tokens
    /// - `JWT_REFRESH_SECRET`: Secret for refresh tokens, must differ from the access secret
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refresh token expiry in seconds (default: 86400)
    pub fn from_env() -> Result<Self> {
        let access_secret = std::env::var("JWT_ACCESS_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_ACCESS_SECRET environment variable not set"))?;

        let refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_REFRESH_SECRET environment variable not set"))?;

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "900".to_string()) // 15 minutes
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid JWT_ACCESS_TOKEN_EXPIRY: {}", e))?;

        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "86400".to_string()) // 24 hours
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid JWT_REFRESH_TOKEN_EXPIRY: {}", e))?;

        let config = JwtConfig {
            access_secret,
            refresh_secret,
            access_token_expiry,
            refresh_token_expiry,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the token service relies on
    pub fn validate(&self) -> Result<()> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            anyhow::bail!("JWT secrets must not be empty");
        }
        if self.access_secret == self.refresh_secret {
            anyhow::bail!("Access and refresh tokens must be signed with different secrets");
        }
        if self.access_token_expiry == 0 {
            anyhow::bail!("Access token expiry must be positive");
        }
        if self.refresh_token_expiry > MAX_TOKEN_EXPIRY {
            anyhow::bail!(
                "Refresh token expiry ({}s) exceeds the maximum of {}s",
                self.refresh_token_expiry,
                MAX_TOKEN_EXPIRY
            );
        }
        if self.access_token_expiry >= self.refresh_token_expiry {
            anyhow::bail!(
                "Access token expiry ({}s) must be shorter than refresh token expiry ({}s)",
                self.access_token_expiry,
                self.refresh_token_expiry
            );
        }
        Ok(())
    }
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

impl TokenType {
    fn other(self) -> Self {
        match self {
            TokenType::Access => TokenType::Refresh,
            TokenType::Refresh => TokenType::Access,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Access => f.write_str("access"),
            TokenType::Refresh => f.write_str("refresh"),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Username at the time the token was issued
    pub username: String,
    /// Token type (access or refresh)
    #[serde(rename = "tokenType")]
    pub token_type: TokenType,
    /// Unique token identifier
    pub jti: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Access and refresh token issued together
///
/// Only ever delivered to clients as HttpOnly cookies, never in a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Failures of the token codec
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Signature does not verify with the expected secret and algorithm
    #[error("invalid token signature")]
    InvalidSignature,
    /// Token is past its `exp`
    #[error("token expired")]
    Expired,
    /// Token is genuine but of the other kind
    #[error("expected {expected} token, got {found}")]
    WrongKind {
        expected: TokenType,
        found: TokenType,
    },
    /// Token could not be parsed
    #[error("malformed token: {0}")]
    Malformed(String),
    /// Token could not be produced
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

#[derive(Clone)]
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    access_keys: KeyPair,
    refresh_keys: KeyPair,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        config.validate()?;

        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(JwtService {
            access_keys: KeyPair::from_secret(&config.access_secret),
            refresh_keys: KeyPair::from_secret(&config.refresh_secret),
            validation,
            config,
        })
    }

    fn keys(&self, kind: TokenType) -> &KeyPair {
        match kind {
            TokenType::Access => &self.access_keys,
            TokenType::Refresh => &self.refresh_keys,
        }
    }

    /// Lifetime in seconds of tokens of the given kind
    pub fn expiry(&self, kind: TokenType) -> u64 {
        match kind {
            TokenType::Access => self.config.access_token_expiry,
            TokenType::Refresh => self.config.refresh_token_expiry,
        }
    }

    /// Build fresh claims for a user, valid from now for the kind's lifetime
    pub fn issue_claims(
        &self,
        user_id: Uuid,
        username: &str,
        kind: TokenType,
    ) -> Result<Claims, TokenError> {
        let now = now_secs()?;
        let exp = now
            .checked_add(self.expiry(kind))
            .ok_or_else(|| TokenError::Signing(format!("{} token expiry overflows", kind)))?;

        Ok(Claims {
            sub: user_id,
            username: username.to_string(),
            token_type: kind,
            jti: Uuid::new_v4(),
            iat: now,
            exp,
        })
    }

    /// Sign claims with the secret bound to `kind`
    pub fn mint(&self, claims: &Claims, kind: TokenType) -> Result<String, TokenError> {
        if claims.token_type != kind {
            return Err(TokenError::WrongKind {
                expected: kind,
                found: claims.token_type,
            });
        }

        encode(&Header::new(ALGORITHM), claims, &self.keys(kind).encoding).map_err(|e| {
            error!("Failed to sign {} token: {}", kind, e);
            TokenError::Signing(e.to_string())
        })
    }

    /// Mint an access and a refresh token for the same user
    pub fn generate_pair(&self, user_id: Uuid, username: &str) -> Result<TokenPair, TokenError> {
        let access = self.issue_claims(user_id, username, TokenType::Access)?;
        let refresh = self.issue_claims(user_id, username, TokenType::Refresh)?;

        Ok(TokenPair {
            access_token: self.mint(&access, TokenType::Access)?,
            refresh_token: self.mint(&refresh, TokenType::Refresh)?,
        })
    }

    /// Validate a token of the expected kind and return its claims
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let claims = match self.decode_with(token, expected) {
            Ok(claims) => claims,
            Err(TokenError::InvalidSignature) => {
                // A genuine token of the other kind is reported as such.
                return match self.decode_with(token, expected.other()) {
                    Ok(claims) => Err(TokenError::WrongKind {
                        expected,
                        found: claims.token_type,
                    }),
                    Err(_) => Err(TokenError::InvalidSignature),
                };
            }
            Err(e) => return Err(e),
        };

        if claims.token_type != expected {
            return Err(TokenError::WrongKind {
                expected,
                found: claims.token_type,
            });
        }

        Ok(claims)
    }

    fn decode_with(&self, token: &str, kind: TokenType) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation)?;
        Ok(token_data.claims)
    }
}

fn now_secs() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| TokenError::Signing(format!("Failed to get current time: {}", e)))
}
