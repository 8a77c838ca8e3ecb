//! SurrealDB implementation of [`AuditLogRepository`].

use chrono::{DateTime, Utc};
use sentra_core::error::CoreResult;
use sentra_core::models::audit::{AuditLogEntry, CreateAuditLogEntry};
use sentra_core::repository::AuditLogRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AuditRow {
    actor_id: Option<String>,
    tenant_id: Option<String>,
    action: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    timestamp: DateTime<Utc>,
}

fn parse_optional_uuid(s: Option<String>, what: &str) -> Result<Option<Uuid>, DbError> {
    s.map(|v| {
        Uuid::parse_str(&v).map_err(|e| DbError::Conversion(format!("invalid {what} UUID: {e}")))
    })
    .transpose()
}

/// SurrealDB implementation of the append-only audit log.
#[derive(Clone)]
pub struct SurrealAuditLogRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAuditLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AuditLogRepository for SurrealAuditLogRepository<C> {
    async fn append(&self, input: CreateAuditLogEntry) -> CoreResult<AuditLogEntry> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('audit_log', $id) SET \
                 actor_id = $actor_id, \
                 tenant_id = $tenant_id, \
                 action = $action, \
                 ip_address = $ip_address, \
                 user_agent = $user_agent",
            )
            .bind(("id", id_str.clone()))
            .bind(("actor_id", input.actor_id.map(|a| a.to_string())))
            .bind(("tenant_id", input.tenant_id.map(|t| t.to_string())))
            .bind(("action", input.action))
            .bind(("ip_address", input.ip_address))
            .bind(("user_agent", input.user_agent))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "audit_log".into(),
            id: id_str,
        })?;

        Ok(AuditLogEntry {
            id,
            actor_id: parse_optional_uuid(row.actor_id, "actor")?,
            tenant_id: parse_optional_uuid(row.tenant_id, "tenant")?,
            action: row.action,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            timestamp: row.timestamp,
        })
    }
}
