//! User (principal) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Superadmin,
    TenantAdmin,
    Manager,
    User,
}

impl Role {
    /// Wire/storage representation, also used in JWT claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::TenantAdmin => "tenant_admin",
            Role::Manager => "manager",
            Role::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "superadmin" => Some(Role::Superadmin),
            "tenant_admin" => Some(Role::TenantAdmin),
            "manager" => Some(Role::Manager),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MfaMethod {
    Totp,
    Sms,
    Email,
}

impl MfaMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MfaMethod::Totp => "totp",
            MfaMethod::Sms => "sms",
            MfaMethod::Email => "email",
        }
    }

    pub fn parse(s: &str) -> Option<MfaMethod> {
        match s {
            "totp" => Some(MfaMethod::Totp),
            "sms" => Some(MfaMethod::Sms),
            "email" => Some(MfaMethod::Email),
            _ => None,
        }
    }
}

/// Pending one-time-PIN challenge, embedded in the user record.
///
/// At most one challenge is pending at a time; issuing a new one
/// overwrites the previous.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OtpChallenge {
    /// SHA-256 hex of the normalized code.
    pub hash: String,
    pub method: MfaMethod,
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Tenant reference; `None` for global accounts.
    pub tenant_id: Option<Uuid>,
    pub username: String,
    /// Stored lowercase; unique.
    pub email: String,
    /// Argon2id PHC string; `None` for OAuth-only accounts.
    pub password_hash: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub failed_login_attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
    /// Phone number for SMS one-time codes.
    pub phone: Option<String>,
    pub mfa_enabled: bool,
    pub mfa_method: Option<MfaMethod>,
    /// AES-256-GCM encrypted TOTP secret (if TOTP is enrolled).
    pub totp_secret: Option<String>,
    /// SHA-256 hex of normalized backup codes; entries are removed as
    /// codes are consumed.
    pub backup_codes: Vec<String>,
    pub otp: Option<OtpChallenge>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the account is currently under a failed-login lockout.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub tenant_id: Option<Uuid>,
    pub username: String,
    pub email: String,
    /// Raw password (hashed with Argon2id before storage); `None` for
    /// OAuth-only accounts.
    pub password: Option<String>,
    pub role: Role,
    pub phone: Option<String>,
}

/// Partial update for a user record.
///
/// Nullable columns use `Some(Some(val))` = set, `Some(None)` = clear,
/// `None` = no change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub is_active: Option<bool>,
    pub failed_login_attempts: Option<u32>,
    pub locked_until: Option<Option<DateTime<Utc>>>,
    pub phone: Option<Option<String>>,
    pub mfa_enabled: Option<bool>,
    pub mfa_method: Option<Option<MfaMethod>>,
    pub totp_secret: Option<Option<String>>,
    /// Replaces the whole hash set.
    pub backup_codes: Option<Vec<String>>,
    pub otp: Option<Option<OtpChallenge>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user_with_lock(locked_until: Option<DateTime<Utc>>) -> User {
        User {
            id: Uuid::new_v4(),
            tenant_id: None,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: None,
            role: Role::User,
            is_active: true,
            failed_login_attempts: 0,
            locked_until,
            phone: None,
            mfa_enabled: false,
            mfa_method: None,
            totp_secret: None,
            backup_codes: Vec::new(),
            otp: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn lock_in_future_is_locked() {
        let now = Utc::now();
        let user = user_with_lock(Some(now + Duration::minutes(10)));
        assert!(user.is_locked(now));
    }

    #[test]
    fn elapsed_lock_is_not_locked() {
        let now = Utc::now();
        let user = user_with_lock(Some(now - Duration::seconds(1)));
        assert!(!user.is_locked(now));
    }

    #[test]
    fn no_lock_is_not_locked() {
        let user = user_with_lock(None);
        assert!(!user.is_locked(Utc::now()));
    }

    #[test]
    fn role_round_trips() {
        for role in [Role::Superadmin, Role::TenantAdmin, Role::Manager, Role::User] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
    }
}
