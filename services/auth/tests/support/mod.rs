//! Shared fixtures: in-memory stores and a fast password hasher.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use auth::{
    AppState,
    auth_service::AuthService,
    jwt::{JwtConfig, JwtService},
    models::{NewUser, SessionRecord, User, UserChanges},
    password::PasswordHasher,
    repositories::{CredentialStore, SessionStore},
};
use chrono::Utc;
use common::error::{StoreError, StoreResult};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const PASSWORD: &str = "correct-horse";

/// Users and their session slots, kept in one place so paired creation is atomic
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    sessions: Mutex<HashMap<Uuid, Option<String>>>,
}

impl MemoryStore {
    pub async fn seed_user(&self, username: &str, email: &str) -> User {
        self.create_with_session(&NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: PlainHasher.hash(PASSWORD).unwrap(),
            short_bio: String::new(),
        })
        .await
        .unwrap()
    }

    pub async fn stored_token(&self, user_id: Uuid) -> Option<String> {
        self.sessions.lock().await.get(&user_id).cloned().flatten()
    }

    pub async fn drop_session(&self, user_id: Uuid) {
        self.sessions.lock().await.remove(&user_id);
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn create_with_session(&self, new_user: &NewUser) -> StoreResult<User> {
        let mut users = self.users.lock().await;
        let mut sessions = self.sessions.lock().await;

        if users
            .values()
            .any(|u| u.username == new_user.username || u.email == new_user.email)
        {
            return Err(StoreError::Conflict("users_unique".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            short_bio: new_user.short_bio.clone(),
            created_at: now,
            updated_at: now,
        };

        users.insert(user.id, user.clone());
        sessions.insert(user.id, None);
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> StoreResult<User> {
        let mut users = self.users.lock().await;

        if let Some(username) = &changes.username {
            if users.values().any(|u| u.id != id && &u.username == username) {
                return Err(StoreError::Conflict("users_username_key".to_string()));
            }
        }

        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(username) = &changes.username {
            user.username = username.clone();
        }
        if let Some(password_hash) = &changes.password_hash {
            user.password_hash = password_hash.clone();
        }
        if let Some(short_bio) = &changes.short_bio {
            user.short_bio = short_bio.clone();
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get_session(&self, user_id: Uuid) -> StoreResult<SessionRecord> {
        let sessions = self.sessions.lock().await;
        let refresh_token = sessions.get(&user_id).ok_or(StoreError::NotFound)?;

        Ok(SessionRecord {
            user_id,
            refresh_token: refresh_token.clone(),
            updated_at: Utc::now(),
        })
    }

    async fn set_session(&self, user_id: Uuid, refresh_token: Option<&str>) -> StoreResult<()> {
        let mut sessions = self.sessions.lock().await;
        let slot = sessions.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        *slot = refresh_token.map(str::to_string);
        Ok(())
    }
}

/// Reversible "hash" so tests do not pay for Argon2
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> anyhow::Result<String> {
        Ok(format!("plain${}", password))
    }

    fn verify(&self, hash: &str, password: &str) -> anyhow::Result<bool> {
        let stored = hash
            .strip_prefix("plain$")
            .ok_or_else(|| anyhow::anyhow!("not a plain hash"))?;
        Ok(stored == password)
    }
}

/// Wraps `PlainHasher` and counts every hash or verify call
#[derive(Default)]
pub struct CountingHasher {
    pub calls: AtomicUsize,
}

impl CountingHasher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PasswordHasher for CountingHasher {
    fn hash(&self, password: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        PlainHasher.hash(password)
    }

    fn verify(&self, hash: &str, password: &str) -> anyhow::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        PlainHasher.verify(hash, password)
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test-access-secret".to_string(),
        refresh_secret: "test-refresh-secret".to_string(),
        access_token_expiry: 300,
        refresh_token_expiry: 3600,
    }
}

pub fn jwt_service() -> JwtService {
    JwtService::new(jwt_config()).unwrap()
}

pub fn auth_service(store: Arc<MemoryStore>) -> AuthService {
    auth_service_with_hasher(store, Arc::new(PlainHasher))
}

pub fn auth_service_with_hasher(
    store: Arc<MemoryStore>,
    hasher: Arc<dyn PasswordHasher>,
) -> AuthService {
    let users: Arc<dyn CredentialStore> = store.clone();
    let sessions: Arc<dyn SessionStore> = store;
    AuthService::new(users, sessions, hasher, jwt_service())
}

pub fn app_state(store: Arc<MemoryStore>) -> AppState {
    AppState {
        auth_service: auth_service(store),
        secure_cookies: false,
    }
}
