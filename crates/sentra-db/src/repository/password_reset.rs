//! SurrealDB implementation of [`PasswordResetRepository`].

use chrono::{DateTime, Utc};
use sentra_core::error::CoreResult;
use sentra_core::models::password_reset::{CreatePasswordResetToken, PasswordResetToken};
use sentra_core::repository::PasswordResetRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ResetRow {
    user_id: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    used: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ResetRowWithId {
    record_id: String,
    user_id: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    used: bool,
    created_at: DateTime<Utc>,
}

fn row_to_token(row: ResetRow, id: Uuid) -> Result<PasswordResetToken, DbError> {
    let user_id = Uuid::parse_str(&row.user_id)
        .map_err(|e| DbError::Conversion(format!("invalid user UUID: {e}")))?;
    Ok(PasswordResetToken {
        id,
        user_id,
        token_hash: row.token_hash,
        expires_at: row.expires_at,
        used: row.used,
        created_at: row.created_at,
    })
}

/// SurrealDB implementation of the password reset token repository.
#[derive(Clone)]
pub struct SurrealPasswordResetRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPasswordResetRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PasswordResetRepository for SurrealPasswordResetRepository<C> {
    async fn create(&self, input: CreatePasswordResetToken) -> CoreResult<PasswordResetToken> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('password_reset', $id) SET \
                 user_id = $user_id, \
                 token_hash = $token_hash, \
                 expires_at = $expires_at, \
                 used = false",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("token_hash", input.token_hash))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ResetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "password_reset".into(),
            id: id_str,
        })?;

        Ok(row_to_token(row, id)?)
    }

    async fn find_active(&self, user_id: Uuid, token_hash: &str) -> CoreResult<PasswordResetToken> {
        let token_hash_owned = token_hash.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM password_reset \
                 WHERE user_id = $user_id \
                 AND token_hash = $token_hash \
                 AND used = false \
                 AND expires_at > time::now()",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("token_hash", token_hash_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResetRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "password_reset".into(),
            id: format!("user_id={user_id}"),
        })?;

        let id = Uuid::parse_str(&row.record_id)
            .map_err(|e| DbError::Conversion(format!("invalid UUID: {e}")))?;
        Ok(row_to_token(
            ResetRow {
                user_id: row.user_id,
                token_hash: row.token_hash,
                expires_at: row.expires_at,
                used: row.used,
                created_at: row.created_at,
            },
            id,
        )?)
    }

    async fn mark_used(&self, id: Uuid) -> CoreResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("UPDATE type::record('password_reset', $id) SET used = true")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResetRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "password_reset".into(),
                id: id_str,
            }
            .into());
        }
        Ok(())
    }
}
