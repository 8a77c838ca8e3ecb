//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups are global: multi-
//! tenancy is carried as a tenant identifier field on the principal,
//! with globally unique email and username.

use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::{
    audit::{AuditLogEntry, CreateAuditLogEntry},
    password_reset::{CreatePasswordResetToken, PasswordResetToken},
    session::{CreateSession, Session},
    user::{CreateUser, UpdateUser, User},
};

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = CoreResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoreResult<User>> + Send;
    fn get_by_username(&self, username: &str) -> impl Future<Output = CoreResult<User>> + Send;
    /// Email lookup is exact-match against the stored lowercase form;
    /// callers normalize before querying.
    fn get_by_email(&self, email: &str) -> impl Future<Output = CoreResult<User>> + Send;
    fn update(&self, id: Uuid, input: UpdateUser) -> impl Future<Output = CoreResult<User>> + Send;
    /// Re-hash and store a new password.
    fn set_password(
        &self,
        id: Uuid,
        password: &str,
    ) -> impl Future<Output = CoreResult<()>> + Send;
}

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = CoreResult<Session>> + Send;
    fn get_by_family(&self, family: Uuid) -> impl Future<Output = CoreResult<Session>> + Send;

    /// Atomically advance the family's refresh pointer: succeeds only
    /// where the stored pointer still equals `expected_jti` and the
    /// session is not revoked. Returns `false` when the conditional
    /// update matched nothing (pointer moved, family revoked, or
    /// family unknown) — the caller decides the reuse policy.
    fn advance_current(
        &self,
        family: Uuid,
        expected_jti: Uuid,
        next_jti: Uuid,
    ) -> impl Future<Output = CoreResult<bool>> + Send;

    /// Idempotently mark the family revoked.
    fn revoke_family(
        &self,
        user_id: Uuid,
        family: Uuid,
    ) -> impl Future<Output = CoreResult<()>> + Send;

    /// Revoke every family belonging to a user (e.g. after password
    /// reset).
    fn revoke_all_for_user(&self, user_id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
}

pub trait PasswordResetRepository: Send + Sync {
    fn create(
        &self,
        input: CreatePasswordResetToken,
    ) -> impl Future<Output = CoreResult<PasswordResetToken>> + Send;

    /// Look up an unused, unexpired token by owner and secret hash.
    fn find_active(
        &self,
        user_id: Uuid,
        token_hash: &str,
    ) -> impl Future<Output = CoreResult<PasswordResetToken>> + Send;

    fn mark_used(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
}

pub trait AuditLogRepository: Send + Sync {
    /// Append a new audit log entry. No update or delete operations exist.
    fn append(
        &self,
        input: CreateAuditLogEntry,
    ) -> impl Future<Output = CoreResult<AuditLogEntry>> + Send;
}
