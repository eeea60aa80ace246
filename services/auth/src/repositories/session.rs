//! Session repository backed by the `user_sessions` table

use async_trait::async_trait;
use common::error::{StoreError, StoreResult};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::SessionStore;
use crate::models::SessionRecord;

/// Session repository
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn get_session(&self, user_id: Uuid) -> StoreResult<SessionRecord> {
        let record = sqlx::query_as::<_, SessionRecord>(
            r#"
            SELECT user_id, refresh_token, updated_at
            FROM user_sessions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or(StoreError::NotFound)
    }

    async fn set_session(&self, user_id: Uuid, refresh_token: Option<&str>) -> StoreResult<()> {
        info!(
            "Updating session for user {} ({})",
            user_id,
            if refresh_token.is_some() { "rotate" } else { "clear" }
        );

        let result = sqlx::query(
            r#"
            UPDATE user_sessions
            SET refresh_token = $2, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(refresh_token)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
