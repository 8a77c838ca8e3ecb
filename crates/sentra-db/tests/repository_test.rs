//! Integration tests for the SurrealDB repositories.

use chrono::{Duration, Utc};
use sentra_core::error::CoreError;
use sentra_core::models::audit::CreateAuditLogEntry;
use sentra_core::models::password_reset::CreatePasswordResetToken;
use sentra_core::models::session::CreateSession;
use sentra_core::models::user::{CreateUser, MfaMethod, OtpChallenge, Role, UpdateUser};
use sentra_core::repository::{
    AuditLogRepository, PasswordResetRepository, SessionRepository, UserRepository,
};
use sentra_db::repository::{
    SurrealAuditLogRepository, SurrealPasswordResetRepository, SurrealSessionRepository,
    SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Spin up an in-memory DB and run migrations.
async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    sentra_db::run_migrations(&db).await.unwrap();
    db
}

fn alice_input() -> CreateUser {
    CreateUser {
        tenant_id: None,
        username: "alice".into(),
        email: "alice@example.com".into(),
        password: Some("correct-horse-battery".into()),
        role: Role::User,
        phone: None,
    }
}

// -----------------------------------------------------------------------
// Users
// -----------------------------------------------------------------------

#[tokio::test]
async fn user_create_and_lookup() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let created = repo.create(alice_input()).await.unwrap();
    assert!(created.is_active);
    assert_eq!(created.failed_login_attempts, 0);
    assert!(created.password_hash.is_some());
    assert!(!created.mfa_enabled);
    assert!(created.backup_codes.is_empty());
    assert!(created.otp.is_none());

    let by_id = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(by_id.username, "alice");

    let by_username = repo.get_by_username("alice").await.unwrap();
    assert_eq!(by_username.id, created.id);

    let by_email = repo.get_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.id, created.id);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let err = repo.get_by_username("nobody").await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);
    repo.create(alice_input()).await.unwrap();

    let mut dup = alice_input();
    dup.username = "alice2".into();
    assert!(repo.create(dup).await.is_err());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);
    repo.create(alice_input()).await.unwrap();

    let mut dup = alice_input();
    dup.email = "alice2@example.com".into();
    assert!(repo.create(dup).await.is_err());
}

#[tokio::test]
async fn oauth_only_user_has_no_password_hash() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let mut input = alice_input();
    input.password = None;
    let created = repo.create(input).await.unwrap();
    assert!(created.password_hash.is_none());
}

#[tokio::test]
async fn lockout_fields_round_trip() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);
    let user = repo.create(alice_input()).await.unwrap();

    let until = Utc::now() + Duration::minutes(15);
    let updated = repo
        .update(
            user.id,
            UpdateUser {
                failed_login_attempts: Some(3),
                locked_until: Some(Some(until)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.failed_login_attempts, 3);
    assert!(updated.locked_until.is_some());

    // Clear the lock.
    let cleared = repo
        .update(
            user.id,
            UpdateUser {
                failed_login_attempts: Some(0),
                locked_until: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.failed_login_attempts, 0);
    assert!(cleared.locked_until.is_none());
}

#[tokio::test]
async fn otp_challenge_round_trips_and_clears() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);
    let user = repo.create(alice_input()).await.unwrap();

    let challenge = OtpChallenge {
        hash: "abc123".into(),
        method: MfaMethod::Email,
        expires_at: Utc::now() + Duration::minutes(5),
        attempts: 0,
    };
    let updated = repo
        .update(
            user.id,
            UpdateUser {
                otp: Some(Some(challenge.clone())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let stored = updated.otp.expect("challenge stored");
    assert_eq!(stored.hash, "abc123");
    assert_eq!(stored.method, MfaMethod::Email);
    assert_eq!(stored.attempts, 0);

    let cleared = repo
        .update(
            user.id,
            UpdateUser {
                otp: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.otp.is_none());
}

#[tokio::test]
async fn mfa_fields_round_trip() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);
    let user = repo.create(alice_input()).await.unwrap();

    let updated = repo
        .update(
            user.id,
            UpdateUser {
                mfa_enabled: Some(true),
                mfa_method: Some(Some(MfaMethod::Totp)),
                totp_secret: Some(Some("encrypted-blob".into())),
                backup_codes: Some(vec!["h1".into(), "h2".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.mfa_enabled);
    assert_eq!(updated.mfa_method, Some(MfaMethod::Totp));
    assert_eq!(updated.totp_secret.as_deref(), Some("encrypted-blob"));
    assert_eq!(updated.backup_codes.len(), 2);

    let reset = repo
        .update(
            user.id,
            UpdateUser {
                mfa_enabled: Some(false),
                mfa_method: Some(None),
                totp_secret: Some(None),
                backup_codes: Some(Vec::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!reset.mfa_enabled);
    assert!(reset.mfa_method.is_none());
    assert!(reset.totp_secret.is_none());
    assert!(reset.backup_codes.is_empty());
}

#[tokio::test]
async fn set_password_replaces_hash() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);
    let user = repo.create(alice_input()).await.unwrap();
    let old_hash = user.password_hash.clone().unwrap();

    repo.set_password(user.id, "new-password-123").await.unwrap();
    let reloaded = repo.get_by_id(user.id).await.unwrap();
    assert_ne!(reloaded.password_hash.unwrap(), old_hash);
}

#[tokio::test]
async fn set_password_for_unknown_user_fails() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);
    let err = repo
        .set_password(Uuid::new_v4(), "whatever-password")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

// -----------------------------------------------------------------------
// Sessions — rotation pointer CAS
// -----------------------------------------------------------------------

async fn new_family(repo: &SurrealSessionRepository<Db>) -> (Uuid, Uuid, Uuid) {
    let user_id = Uuid::new_v4();
    let family = Uuid::new_v4();
    let jti = Uuid::new_v4();
    repo.create(CreateSession {
        user_id,
        family,
        current_jti: jti,
        ip_address: Some("127.0.0.1".into()),
        user_agent: Some("TestAgent".into()),
    })
    .await
    .unwrap();
    (user_id, family, jti)
}

#[tokio::test]
async fn session_create_and_get() {
    let db = setup().await;
    let repo = SurrealSessionRepository::new(db);
    let (user_id, family, jti) = new_family(&repo).await;

    let session = repo.get_by_family(family).await.unwrap();
    assert_eq!(session.user_id, user_id);
    assert_eq!(session.family, family);
    assert_eq!(session.current_jti, jti);
    assert!(!session.is_revoked());
}

#[tokio::test]
async fn advance_succeeds_only_from_current_pointer() {
    let db = setup().await;
    let repo = SurrealSessionRepository::new(db);
    let (_, family, jti) = new_family(&repo).await;

    let next = Uuid::new_v4();
    assert!(repo.advance_current(family, jti, next).await.unwrap());

    // The old pointer no longer matches.
    assert!(
        !repo
            .advance_current(family, jti, Uuid::new_v4())
            .await
            .unwrap()
    );

    // The new pointer does.
    assert!(
        repo.advance_current(family, next, Uuid::new_v4())
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn advance_fails_for_unknown_family() {
    let db = setup().await;
    let repo = SurrealSessionRepository::new(db);
    assert!(
        !repo
            .advance_current(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn revoked_family_cannot_advance() {
    let db = setup().await;
    let repo = SurrealSessionRepository::new(db);
    let (user_id, family, jti) = new_family(&repo).await;

    repo.revoke_family(user_id, family).await.unwrap();
    let session = repo.get_by_family(family).await.unwrap();
    assert!(session.is_revoked());

    assert!(
        !repo
            .advance_current(family, jti, Uuid::new_v4())
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn revoke_is_idempotent() {
    let db = setup().await;
    let repo = SurrealSessionRepository::new(db);
    let (user_id, family, _) = new_family(&repo).await;

    repo.revoke_family(user_id, family).await.unwrap();
    let first = repo.get_by_family(family).await.unwrap().revoked_at;
    repo.revoke_family(user_id, family).await.unwrap();
    let second = repo.get_by_family(family).await.unwrap().revoked_at;
    // The original revocation timestamp is preserved.
    assert_eq!(first, second);
}

#[tokio::test]
async fn revoke_all_for_user_spans_families() {
    let db = setup().await;
    let repo = SurrealSessionRepository::new(db);

    let user_id = Uuid::new_v4();
    let mut families = Vec::new();
    for _ in 0..3 {
        let family = Uuid::new_v4();
        repo.create(CreateSession {
            user_id,
            family,
            current_jti: Uuid::new_v4(),
            ip_address: None,
            user_agent: None,
        })
        .await
        .unwrap();
        families.push(family);
    }

    repo.revoke_all_for_user(user_id).await.unwrap();
    for family in families {
        assert!(repo.get_by_family(family).await.unwrap().is_revoked());
    }
}

// -----------------------------------------------------------------------
// Password reset tokens
// -----------------------------------------------------------------------

#[tokio::test]
async fn reset_token_is_found_then_consumed() {
    let db = setup().await;
    let repo = SurrealPasswordResetRepository::new(db);
    let user_id = Uuid::new_v4();

    let created = repo
        .create(CreatePasswordResetToken {
            user_id,
            token_hash: "deadbeef".into(),
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await
        .unwrap();
    assert!(!created.used);

    let found = repo.find_active(user_id, "deadbeef").await.unwrap();
    assert_eq!(found.id, created.id);

    repo.mark_used(created.id).await.unwrap();
    let err = repo.find_active(user_id, "deadbeef").await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn expired_reset_token_is_not_found() {
    let db = setup().await;
    let repo = SurrealPasswordResetRepository::new(db);
    let user_id = Uuid::new_v4();

    repo.create(CreatePasswordResetToken {
        user_id,
        token_hash: "deadbeef".into(),
        expires_at: Utc::now() - Duration::seconds(1),
    })
    .await
    .unwrap();

    let err = repo.find_active(user_id, "deadbeef").await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn reset_token_is_scoped_to_its_owner() {
    let db = setup().await;
    let repo = SurrealPasswordResetRepository::new(db);

    repo.create(CreatePasswordResetToken {
        user_id: Uuid::new_v4(),
        token_hash: "deadbeef".into(),
        expires_at: Utc::now() + Duration::hours(1),
    })
    .await
    .unwrap();

    let err = repo
        .find_active(Uuid::new_v4(), "deadbeef")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

// -----------------------------------------------------------------------
// Audit log
// -----------------------------------------------------------------------

#[tokio::test]
async fn audit_append_returns_the_entry() {
    let db = setup().await;
    let repo = SurrealAuditLogRepository::new(db);
    let actor = Uuid::new_v4();

    let entry = repo
        .append(CreateAuditLogEntry {
            actor_id: Some(actor),
            tenant_id: None,
            action: "login".into(),
            ip_address: Some("127.0.0.1".into()),
            user_agent: None,
        })
        .await
        .unwrap();

    assert_eq!(entry.actor_id, Some(actor));
    assert_eq!(entry.action, "login");
    assert!(entry.tenant_id.is_none());
}
