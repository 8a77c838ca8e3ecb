//! Session domain model.
//!
//! A session represents one continuous login lineage ("family"). The
//! family id is stable for the life of the login; `current_jti` is the
//! only refresh-token id considered valid at any moment and advances on
//! every rotation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub family: Uuid,
    pub current_jti: Uuid,
    /// Terminal: set by logout or reuse detection, never cleared.
    pub revoked_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    pub user_id: Uuid,
    pub family: Uuid,
    pub current_jti: Uuid,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
