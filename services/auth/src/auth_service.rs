//! Login, refresh, logout and registration flows
//!
//! A user is logged in while their session record holds a refresh token and
//! logged out when it holds none. Login and refresh overwrite the stored token,
//! logout clears it. Only the stored token is ever accepted for refresh or
//! logout, so a superseded token is dead even if its signature is still valid.

use std::sync::Arc;

use common::error::StoreError;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::{AuthError, AuthResult},
    jwt::{JwtService, TokenPair, TokenType},
    models::{LoginRequest, NewUser, RegisterRequest, UpdateUserRequest, User, UserChanges},
    password::PasswordHasher,
    repositories::{CredentialStore, SessionStore},
};

/// Auth orchestrator
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: Arc<dyn PasswordHasher>,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        hasher: Arc<dyn PasswordHasher>,
        jwt_service: JwtService,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            jwt_service,
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Exchange credentials for a fresh token pair
    ///
    /// Any session the user already had is replaced.
    pub async fn login(&self, request: &LoginRequest) -> AuthResult<TokenPair> {
        let user = match self
            .users
            .find_by_email(&request.email)
            .await
            .map_err(|e| store_failure("look up user by email", e))?
        {
            Some(user) => user,
            None => {
                // Pay the same hashing cost as a wrong password.
                let _ = self.hasher.hash(&request.password);
                info!("Login rejected: unknown email {}", request.email);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let matches = self
            .hasher
            .verify(&user.password_hash, &request.password)
            .map_err(|e| {
                error!("Failed to verify password for user {}: {}", user.id, e);
                AuthError::Internal("password verification failed".to_string())
            })?;

        if !matches {
            info!("Login rejected: wrong password for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.start_session(&user).await?;
        info!("User {} logged in", user.id);
        Ok(pair)
    }

    /// Rotate the token pair using the current refresh token
    ///
    /// `claimed_user_id` is untrusted and only cross-checked against the
    /// verified claims; identity always comes from the token subject.
    pub async fn refresh_token(
        &self,
        presented: &str,
        claimed_user_id: Uuid,
    ) -> AuthResult<TokenPair> {
        let claims = self
            .jwt_service
            .verify(presented, TokenType::Refresh)
            .map_err(|e| {
                warn!("Refresh rejected: {}", e);
                AuthError::Unauthorized("invalid token".to_string())
            })?;

        if claims.sub != claimed_user_id {
            warn!(
                "Refresh rejected: token subject {} does not match claimed user {}",
                claims.sub, claimed_user_id
            );
            return Err(AuthError::invalid_refresh_token());
        }

        let user = self
            .users
            .find_by_id(claims.sub)
            .await
            .map_err(|e| store_failure("look up user by id", e))?
            .ok_or_else(AuthError::invalid_refresh_token)?;

        // A username change makes every earlier token stale.
        if claims.username != user.username {
            warn!("Refresh rejected: stale username for user {}", user.id);
            return Err(AuthError::invalid_refresh_token());
        }

        self.ensure_current(user.id, presented).await?;

        let pair = self.start_session(&user).await?;
        info!("Rotated refresh token for user {}", user.id);
        Ok(pair)
    }

    /// Clear the session held by `presented`
    pub async fn logout(&self, presented: &str, user_id: Uuid) -> AuthResult<()> {
        self.ensure_current(user_id, presented).await?;

        self.sessions
            .set_session(user_id, None)
            .await
            .map_err(|e| store_failure("clear session", e))?;

        info!("User {} logged out", user_id);
        Ok(())
    }

    /// Create a user together with an empty session record
    pub async fn register(&self, request: &RegisterRequest) -> AuthResult<User> {
        let password_hash = self.hasher.hash(&request.password).map_err(|e| {
            error!("Failed to hash password: {}", e);
            AuthError::Internal("password hashing failed".to_string())
        })?;

        let new_user = NewUser {
            username: request.username.clone(),
            email: request.email.clone(),
            password_hash,
            short_bio: request.short_bio.clone(),
        };

        let user = self
            .users
            .create_with_session(&new_user)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(constraint) => {
                    info!("Registration rejected by constraint {}", constraint);
                    AuthError::BadRequest("duplicate username or email".to_string())
                }
                other => store_failure("create user", other),
            })?;

        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Profile of the authenticated user
    pub async fn current_user(&self, user_id: Uuid) -> AuthResult<User> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(|e| store_failure("look up user by id", e))?
            .ok_or_else(|| AuthError::NotFound("user not found".to_string()))
    }

    /// Apply a profile update for the authenticated user
    ///
    /// Renaming does not touch the session; the next refresh fails because the
    /// token still names the old username.
    pub async fn update_user(
        &self,
        user_id: Uuid,
        request: &UpdateUserRequest,
    ) -> AuthResult<User> {
        let password_hash = request
            .password()
            .map(|password| self.hasher.hash(password))
            .transpose()
            .map_err(|e| {
                error!("Failed to hash password: {}", e);
                AuthError::Internal("password hashing failed".to_string())
            })?;

        let changes = UserChanges {
            username: request.username().map(str::to_string),
            password_hash,
            short_bio: request.short_bio().map(str::to_string),
        };

        let user = self
            .users
            .update_user(user_id, &changes)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AuthError::NotFound("user not found".to_string()),
                StoreError::Conflict(constraint) => {
                    info!("Update rejected by constraint {}", constraint);
                    AuthError::BadRequest("duplicate username".to_string())
                }
                other => store_failure("update user", other),
            })?;

        info!("Updated user {}", user.id);
        Ok(user)
    }

    /// Succeeds only when `presented` is the refresh token stored for the user
    async fn ensure_current(&self, user_id: Uuid, presented: &str) -> AuthResult<()> {
        let session = match self.sessions.get_session(user_id).await {
            Ok(session) => session,
            Err(StoreError::NotFound) => {
                warn!("No session record for user {}", user_id);
                return Err(AuthError::invalid_refresh_token());
            }
            Err(e) => return Err(store_failure("load session", e)),
        };

        if !session.holds(presented) {
            warn!(
                "Presented refresh token is not the current one for user {}",
                user_id
            );
            return Err(AuthError::invalid_refresh_token());
        }

        Ok(())
    }

    /// Mint a pair and make its refresh half the only valid one
    async fn start_session(&self, user: &User) -> AuthResult<TokenPair> {
        let pair = self
            .jwt_service
            .generate_pair(user.id, &user.username)
            .map_err(|e| {
                error!("Failed to generate tokens for user {}: {}", user.id, e);
                AuthError::Internal("token generation failed".to_string())
            })?;

        self.sessions
            .set_session(user.id, Some(&pair.refresh_token))
            .await
            .map_err(|e| store_failure("store session", e))?;

        Ok(pair)
    }
}

fn store_failure(action: &str, err: StoreError) -> AuthError {
    error!("Failed to {}: {}", action, err);
    AuthError::Internal(format!("failed to {}", action))
}
