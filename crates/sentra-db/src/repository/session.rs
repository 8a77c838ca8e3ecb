//! SurrealDB implementation of [`SessionRepository`].
//!
//! One record per login family. The rotation pointer advance is a
//! single conditional UPDATE so two racing refreshes cannot both
//! succeed from the same starting pointer.

use chrono::{DateTime, Utc};
use sentra_core::error::CoreResult;
use sentra_core::models::session::{CreateSession, Session};
use sentra_core::repository::SessionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SessionRow {
    user_id: String,
    family: String,
    current_jti: String,
    revoked_at: Option<DateTime<Utc>>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct SessionRowWithId {
    record_id: String,
    user_id: String,
    family: String,
    current_jti: String,
    revoked_at: Option<DateTime<Utc>>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Conversion(format!("invalid {what} UUID: {e}")))
}

fn row_to_session(row: SessionRow, id: Uuid) -> Result<Session, DbError> {
    Ok(Session {
        id,
        user_id: parse_uuid(&row.user_id, "user")?,
        family: parse_uuid(&row.family, "family")?,
        current_jti: parse_uuid(&row.current_jti, "jti")?,
        revoked_at: row.revoked_at,
        ip_address: row.ip_address,
        user_agent: row.user_agent,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl SessionRowWithId {
    fn try_into_session(self) -> Result<Session, DbError> {
        let id = parse_uuid(&self.record_id, "session")?;
        row_to_session(
            SessionRow {
                user_id: self.user_id,
                family: self.family,
                current_jti: self.current_jti,
                revoked_at: self.revoked_at,
                ip_address: self.ip_address,
                user_agent: self.user_agent,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            id,
        )
    }
}

/// SurrealDB implementation of the Session repository.
#[derive(Clone)]
pub struct SurrealSessionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSessionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SessionRepository for SurrealSessionRepository<C> {
    async fn create(&self, input: CreateSession) -> CoreResult<Session> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('session', $id) SET \
                 user_id = $user_id, \
                 family = $family, \
                 current_jti = $current_jti, \
                 revoked_at = NONE, \
                 ip_address = $ip_address, \
                 user_agent = $user_agent",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("family", input.family.to_string()))
            .bind(("current_jti", input.current_jti.to_string()))
            .bind(("ip_address", input.ip_address))
            .bind(("user_agent", input.user_agent))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "session".into(),
            id: id_str,
        })?;

        Ok(row_to_session(row, id)?)
    }

    async fn get_by_family(&self, family: Uuid) -> CoreResult<Session> {
        let family_str = family.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM session \
                 WHERE family = $family",
            )
            .bind(("family", family_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SessionRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "session".into(),
            id: format!("family={family_str}"),
        })?;

        Ok(row.try_into_session()?)
    }

    async fn advance_current(
        &self,
        family: Uuid,
        expected_jti: Uuid,
        next_jti: Uuid,
    ) -> CoreResult<bool> {
        // Compare-and-swap: the WHERE clause makes the pointer advance
        // conditional on the stored value still being `expected_jti`.
        // A concurrent rotation or a replayed token matches zero rows.
        let mut result = self
            .db
            .query(
                "UPDATE session SET \
                 current_jti = $next_jti, updated_at = time::now() \
                 WHERE family = $family \
                 AND current_jti = $expected_jti \
                 AND revoked_at IS NONE \
                 RETURN AFTER",
            )
            .bind(("family", family.to_string()))
            .bind(("expected_jti", expected_jti.to_string()))
            .bind(("next_jti", next_jti.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        Ok(!rows.is_empty())
    }

    async fn revoke_family(&self, user_id: Uuid, family: Uuid) -> CoreResult<()> {
        // Already-revoked families match zero rows; re-revoking is a
        // no-op, not an error.
        self.db
            .query(
                "UPDATE session SET \
                 revoked_at = time::now(), updated_at = time::now() \
                 WHERE family = $family \
                 AND user_id = $user_id \
                 AND revoked_at IS NONE",
            )
            .bind(("family", family.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> CoreResult<()> {
        self.db
            .query(
                "UPDATE session SET \
                 revoked_at = time::now(), updated_at = time::now() \
                 WHERE user_id = $user_id \
                 AND revoked_at IS NONE",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
