//! Session model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-user session record
///
/// `refresh_token` is the single refresh token currently accepted for the
/// user; `None` means the user is logged out.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SessionRecord {
    pub user_id: Uuid,
    pub refresh_token: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Byte-for-byte comparison against the stored token
    pub fn holds(&self, presented: &str) -> bool {
        self.refresh_token.as_deref() == Some(presented)
    }
}
