//! Persistence seams used by the auth service
//!
//! The service only talks to these traits; the PostgreSQL repositories are the
//! production implementations.

use async_trait::async_trait;
use common::error::StoreResult;
use uuid::Uuid;

use crate::models::{NewUser, SessionRecord, User, UserChanges};

pub mod session;
pub mod user;

pub use session::SessionRepository;
pub use user::UserRepository;

/// Lookup and creation of user credentials
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Create the user and its empty session record atomically
    async fn create_with_session(&self, new_user: &NewUser) -> StoreResult<User>;

    /// Apply the present fields of `changes`; `StoreError::NotFound` for an unknown id
    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> StoreResult<User>;
}

/// The single refresh-token slot of each user
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// `StoreError::NotFound` when the user has no session record
    async fn get_session(&self, user_id: Uuid) -> StoreResult<SessionRecord>;

    /// Replace the stored token; `None` logs the user out
    async fn set_session(&self, user_id: Uuid, refresh_token: Option<&str>) -> StoreResult<()>;
}
