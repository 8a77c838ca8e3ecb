//! Authentication service — login, MFA, refresh rotation, and
//! password-reset orchestration.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use rand::Rng;
use sentra_core::error::{CoreError, CoreResult};
use sentra_core::models::audit::CreateAuditLogEntry;
use sentra_core::models::password_reset::CreatePasswordResetToken;
use sentra_core::models::session::CreateSession;
use sentra_core::models::user::{CreateUser, MfaMethod, Role, UpdateUser, User};
use sentra_core::repository::{
    AuditLogRepository, PasswordResetRepository, SessionRepository, UserRepository,
};
use sentra_core::ttl::TtlStore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{error, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::mailer::MessageSender;
use crate::otp::{self, OtpCheck};
use crate::password;
use crate::token;
use crate::totp;

/// Connection metadata attached to sessions and audit records.
#[derive(Debug, Clone, Default)]
pub struct ConnectionMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    /// `None` for OAuth-only accounts.
    pub password: Option<String>,
    pub role: Role,
    pub tenant_id: Option<Uuid>,
    pub phone: Option<String>,
}

#[derive(Debug)]
pub struct LoginInput {
    pub username_or_email: String,
    pub password: String,
    pub meta: ConnectionMeta,
}

/// Caller-facing view of a principal.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub mfa_enabled: bool,
    pub mfa_method: Option<MfaMethod>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            mfa_enabled: user.mfa_enabled,
            mfa_method: user.mfa_method,
        }
    }
}

/// Successful session establishment.
#[derive(Debug)]
pub struct LoginOutput {
    pub access_token: String,
    pub refresh_token: String,
    /// Session family ID (used for logout).
    pub family: Uuid,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub user: UserSummary,
}

/// Result of the first login step.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Password accepted; MFA completion is required before a session
    /// exists. The challenge token bridges to `complete_mfa_login`.
    MfaRequired {
        challenge_token: String,
        user: UserSummary,
    },
    Established(LoginOutput),
}

/// Successful refresh rotation (new token pair).
#[derive(Debug)]
pub struct RefreshOutput {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

/// Everything returned once at TOTP enrollment.
#[derive(Debug)]
pub struct TotpEnrollmentOutput {
    pub secret_base32: String,
    pub otpauth_uri: String,
    pub qr_png_base64: String,
    pub backup_codes: Vec<String>,
}

fn sha256_hex(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

/// Authentication service.
///
/// Generic over repository, dispatch, and cache implementations so the
/// auth layer has no dependency on the database crate.
pub struct AuthService<U, S, R, A, M, T> {
    users: U,
    sessions: S,
    resets: R,
    audit: A,
    sender: Arc<M>,
    challenges: T,
    config: AuthConfig,
}

impl<U, S, R, A, M, T> AuthService<U, S, R, A, M, T>
where
    U: UserRepository,
    S: SessionRepository,
    R: PasswordResetRepository,
    A: AuditLogRepository,
    M: MessageSender + 'static,
    T: TtlStore,
{
    pub fn new(
        users: U,
        sessions: S,
        resets: R,
        audit: A,
        sender: Arc<M>,
        challenges: T,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            resets,
            audit,
            sender,
            challenges,
            config,
        }
    }

    // -----------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------

    pub async fn register(&self, input: RegisterInput) -> CoreResult<User> {
        let email = input.email.trim().to_lowercase();

        if let Some(password) = &input.password {
            if password.len() < self.config.min_password_length {
                return Err(CoreError::Validation {
                    message: format!(
                        "password must be at least {} characters",
                        self.config.min_password_length
                    ),
                });
            }
        }

        match self.users.get_by_email(&email).await {
            Ok(_) => {
                return Err(CoreError::AlreadyExists {
                    entity: "user".into(),
                });
            }
            Err(CoreError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }
        match self.users.get_by_username(&input.username).await {
            Ok(_) => {
                return Err(CoreError::AlreadyExists {
                    entity: "user".into(),
                });
            }
            Err(CoreError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        self.users
            .create(CreateUser {
                tenant_id: input.tenant_id,
                username: input.username,
                email,
                password: input.password,
                role: input.role,
                phone: input.phone,
            })
            .await
    }

    // -----------------------------------------------------------------
    // Login
    // -----------------------------------------------------------------

    /// Authenticate with username/email + password.
    ///
    /// When MFA is enabled no session is established yet; the returned
    /// challenge token must be presented to [`Self::complete_mfa_login`].
    pub async fn login(&self, input: LoginInput) -> CoreResult<LoginOutcome> {
        let user = self.resolve_principal(&input.username_or_email).await?;
        assert_account_usable(&user)?;
        self.verify_password_or_lock(&user, &input.password).await?;

        if user.mfa_enabled {
            let challenge_token = token::issue_mfa_challenge(user.id, &self.config)?;
            // The caller holds no access token at this point, so a
            // code for the email/SMS methods is dispatched here.
            if let Some(method @ (MfaMethod::Email | MfaMethod::Sms)) = user.mfa_method {
                if let Err(e) = self.create_and_send_otp(&user, method).await {
                    warn!(user_id = %user.id, error = %e, "login OTP dispatch failed");
                }
            }
            return Ok(LoginOutcome::MfaRequired {
                challenge_token,
                user: UserSummary::from(&user),
            });
        }

        let output = self.establish_session(&user, &input.meta).await?;
        self.audit_best_effort(Some(user.id), user.tenant_id, "login", &input.meta)
            .await;
        Ok(LoginOutcome::Established(output))
    }

    /// Complete a login that required MFA.
    ///
    /// `code` is a 6-digit TOTP code, a backup code, or a one-time PIN
    /// depending on the principal's enrolled method. Each bridge token
    /// establishes at most one session.
    pub async fn complete_mfa_login(
        &self,
        challenge_token: &str,
        code: &str,
        meta: ConnectionMeta,
    ) -> CoreResult<LoginOutput> {
        let claims = token::decode_mfa_challenge(challenge_token, &self.config)?;

        let challenge_key = format!("mfa-challenge:{}", claims.jti);
        if self.challenges.exists(&challenge_key).await? {
            return Err(AuthError::InvalidOrExpiredToken.into());
        }

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidOrExpiredToken)?;
        let user = match self.users.get_by_id(user_id).await {
            Ok(u) => u,
            Err(CoreError::NotFound { .. }) => {
                return Err(AuthError::InvalidOrExpiredToken.into());
            }
            Err(e) => return Err(e),
        };
        assert_account_usable(&user)?;
        if !user.mfa_enabled {
            // MFA was disabled between challenge and completion.
            return Err(AuthError::InvalidOrExpiredToken.into());
        }

        match user.mfa_method {
            Some(MfaMethod::Totp) => self.verify_totp_or_backup(&user, code).await?,
            Some(MfaMethod::Email | MfaMethod::Sms) => {
                self.consume_otp(&user, code).await?;
            }
            None => return Err(AuthError::NotEnrolled.into()),
        }

        let remaining = (claims.exp - Utc::now().timestamp()).max(1) as u64;
        self.challenges
            .put(challenge_key, StdDuration::from_secs(remaining))
            .await?;

        let output = self.establish_session(&user, &meta).await?;
        self.audit_best_effort(Some(user.id), user.tenant_id, "login", &meta)
            .await;
        Ok(output)
    }

    // -----------------------------------------------------------------
    // Refresh rotation & logout
    // -----------------------------------------------------------------

    /// Rotate a refresh token.
    ///
    /// The presented token must carry the family's current `jti`. A
    /// stale `jti` means either a replayed (possibly stolen) token or
    /// the loser of a concurrent-refresh race; both are treated as
    /// compromise: the family is revoked and the caller must log in
    /// again.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        meta: ConnectionMeta,
    ) -> CoreResult<RefreshOutput> {
        let claims = token::decode_refresh_token(refresh_token, &self.config)?;
        let family = Uuid::parse_str(&claims.sid).map_err(|_| AuthError::InvalidRefresh)?;
        let presented_jti = Uuid::parse_str(&claims.jti).map_err(|_| AuthError::InvalidRefresh)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefresh)?;

        let session = match self.sessions.get_by_family(family).await {
            Ok(s) => s,
            Err(CoreError::NotFound { .. }) => return Err(AuthError::InvalidRefresh.into()),
            Err(e) => return Err(e),
        };
        if session.user_id != user_id || session.is_revoked() {
            return Err(AuthError::InvalidRefresh.into());
        }

        let next_jti = Uuid::new_v4();
        let advanced = self
            .sessions
            .advance_current(family, presented_jti, next_jti)
            .await?;
        if !advanced {
            self.sessions.revoke_family(user_id, family).await?;
            self.audit_best_effort(Some(user_id), None, "refresh_reuse_detected", &meta)
                .await;
            return Err(AuthError::ReuseDetected.into());
        }

        let user = self.users.get_by_id(user_id).await?;
        assert_account_usable(&user)?;

        let access_token = token::issue_access_token(
            user.id,
            user.role.as_str(),
            user.mfa_enabled,
            family,
            &self.config,
        )?;
        let refresh_token = token::issue_refresh_token(user.id, family, next_jti, &self.config)?;

        Ok(RefreshOutput {
            access_token,
            refresh_token,
            expires_in: self.config.access_token_lifetime_secs,
        })
    }

    /// Revoke a session family (logout). Idempotent.
    pub async fn logout(&self, user_id: Uuid, family: Uuid, meta: ConnectionMeta) -> CoreResult<()> {
        self.sessions.revoke_family(user_id, family).await?;
        self.audit_best_effort(Some(user_id), None, "logout", &meta)
            .await;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Password reset
    // -----------------------------------------------------------------

    /// Always succeeds, whether or not the account exists.
    pub async fn forgot_password(&self, email: &str, base_url: &str) -> CoreResult<()> {
        let user = match self.users.get_by_email(&email.trim().to_lowercase()).await {
            Ok(u) => u,
            Err(CoreError::NotFound { .. }) => return Ok(()),
            Err(e) => return Err(e),
        };

        let raw: [u8; 32] = rand::rng().random();
        let raw_hex = hex::encode(raw);
        let expires_at = Utc::now() + Duration::seconds(self.config.reset_token_ttl_secs as i64);
        self.resets
            .create(CreatePasswordResetToken {
                user_id: user.id,
                token_hash: sha256_hex(&raw_hex),
                expires_at,
            })
            .await?;

        let reset_url = format!("{base_url}/reset?token={raw_hex}&uid={}", user.id);
        self.dispatch_fire_and_forget(
            user.email,
            "Password reset".into(),
            format!("Reset your password: {reset_url}"),
        );
        Ok(())
    }

    pub async fn reset_password(
        &self,
        user_id: Uuid,
        raw_token: &str,
        new_password: &str,
    ) -> CoreResult<()> {
        if new_password.len() < self.config.min_password_length {
            return Err(CoreError::Validation {
                message: format!(
                    "password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }

        let reset = match self
            .resets
            .find_active(user_id, &sha256_hex(raw_token))
            .await
        {
            Ok(r) => r,
            Err(CoreError::NotFound { .. }) => {
                return Err(AuthError::InvalidOrExpiredToken.into());
            }
            Err(e) => return Err(e),
        };

        self.users.set_password(user_id, new_password).await?;
        self.resets.mark_used(reset.id).await?;
        // Sessions established before the credential compromise was
        // remediated are no longer trusted.
        self.sessions.revoke_all_for_user(user_id).await?;
        self.audit_best_effort(Some(user_id), None, "password_reset", &ConnectionMeta::default())
            .await;
        Ok(())
    }

    // -----------------------------------------------------------------
    // MFA management
    // -----------------------------------------------------------------

    /// Start TOTP enrollment: fresh secret, provisioning URI/QR, and
    /// backup codes. `mfa_enabled` stays false until the first code is
    /// verified. Re-enrolling while enabled requires `rotate`.
    pub async fn mfa_enroll_totp(
        &self,
        user_id: Uuid,
        rotate: bool,
    ) -> CoreResult<TotpEnrollmentOutput> {
        let user = self.users.get_by_id(user_id).await?;
        if user.mfa_enabled && user.mfa_method == Some(MfaMethod::Totp) && !rotate {
            return Err(AuthError::AlreadyEnrolled.into());
        }
        let Some(key) = self.config.mfa_encryption_key.as_ref() else {
            return Err(AuthError::Crypto("MFA encryption key not configured".into()).into());
        };

        let enrollment = totp::generate_enrollment(&self.config.totp_issuer, &user.email)?;
        let encrypted = totp::encrypt_secret(key, &enrollment.secret_bytes)?;
        let backup_codes = totp::generate_backup_codes(self.config.backup_code_count);
        let hashes = backup_codes
            .iter()
            .map(|c| totp::hash_backup_code(c))
            .collect();

        self.users
            .update(
                user.id,
                UpdateUser {
                    totp_secret: Some(Some(encrypted)),
                    backup_codes: Some(hashes),
                    mfa_enabled: Some(false),
                    mfa_method: Some(Some(MfaMethod::Totp)),
                    otp: Some(None),
                    ..Default::default()
                },
            )
            .await?;

        Ok(TotpEnrollmentOutput {
            secret_base32: enrollment.secret_base32,
            otpauth_uri: enrollment.otpauth_uri,
            qr_png_base64: enrollment.qr_png_base64,
            backup_codes,
        })
    }

    /// Verify the first authenticator code and switch TOTP on.
    pub async fn mfa_verify_totp(&self, user_id: Uuid, code: &str) -> CoreResult<()> {
        let user = self.users.get_by_id(user_id).await?;
        if user.totp_secret.is_none() {
            return Err(AuthError::NotEnrolled.into());
        }
        if !self.check_totp_code(&user, code.trim())? {
            return Err(AuthError::InvalidCode.into());
        }
        self.users
            .update(
                user.id,
                UpdateUser {
                    mfa_enabled: Some(true),
                    mfa_method: Some(Some(MfaMethod::Totp)),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    /// Select email/SMS as the pending MFA method; completed by OTP
    /// verification.
    pub async fn mfa_enroll_otp(&self, user_id: Uuid, method: MfaMethod) -> CoreResult<()> {
        if method == MfaMethod::Totp {
            return Err(CoreError::Validation {
                message: "use TOTP enrollment for the totp method".into(),
            });
        }
        self.users
            .update(
                user_id,
                UpdateUser {
                    mfa_method: Some(Some(method)),
                    mfa_enabled: Some(false),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    /// Issue and dispatch a one-time PIN for enrollment or login.
    pub async fn mfa_send_otp(&self, user_id: Uuid, method: MfaMethod) -> CoreResult<()> {
        if method == MfaMethod::Totp {
            return Err(CoreError::Validation {
                message: "one-time PINs are only sent for email and sms".into(),
            });
        }
        let user = self.users.get_by_id(user_id).await?;
        if method == MfaMethod::Sms && user.phone.is_none() {
            return Err(CoreError::Validation {
                message: "phone number not set".into(),
            });
        }
        self.create_and_send_otp(&user, method).await
    }

    /// Verify a one-time PIN and complete email/SMS enrollment.
    pub async fn mfa_verify_otp(&self, user_id: Uuid, code: &str) -> CoreResult<()> {
        let user = self.users.get_by_id(user_id).await?;
        let method = self.consume_otp(&user, code).await?;
        self.users
            .update(
                user.id,
                UpdateUser {
                    mfa_enabled: Some(true),
                    mfa_method: Some(Some(method)),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    /// Full MFA reset in one update. Idempotent.
    pub async fn mfa_disable(&self, user_id: Uuid) -> CoreResult<()> {
        self.users
            .update(
                user_id,
                UpdateUser {
                    mfa_enabled: Some(false),
                    mfa_method: Some(None),
                    totp_secret: Some(None),
                    backup_codes: Some(Vec::new()),
                    otp: Some(None),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    async fn resolve_principal(&self, username_or_email: &str) -> CoreResult<User> {
        match self.users.get_by_username(username_or_email).await {
            Ok(u) => Ok(u),
            Err(CoreError::NotFound { .. }) => self
                .users
                .get_by_email(&username_or_email.trim().to_lowercase())
                .await
                .map_err(|_| AuthError::InvalidCredentials.into()),
            Err(e) => Err(e),
        }
    }

    /// Credential check with lockout bookkeeping. Counter and lock
    /// state are persisted on every outcome so lockout survives
    /// process restarts.
    async fn verify_password_or_lock(&self, user: &User, password: &str) -> CoreResult<()> {
        let now = Utc::now();
        if user.is_locked(now) {
            // A locked account does not consume attempts.
            return Err(AuthError::AccountLocked.into());
        }

        let ok = password::verify_optional_password(
            password,
            user.password_hash.as_deref(),
            self.config.pepper.as_deref(),
        )?;

        if !ok {
            let attempts = user.failed_login_attempts + 1;
            let update = if attempts >= self.config.max_failed_login_attempts {
                UpdateUser {
                    failed_login_attempts: Some(0),
                    locked_until: Some(Some(
                        now + Duration::seconds(self.config.lockout_duration_secs as i64),
                    )),
                    ..Default::default()
                }
            } else {
                UpdateUser {
                    failed_login_attempts: Some(attempts),
                    ..Default::default()
                }
            };
            self.users.update(user.id, update).await?;
            return Err(AuthError::InvalidCredentials.into());
        }

        self.users
            .update(
                user.id,
                UpdateUser {
                    failed_login_attempts: Some(0),
                    locked_until: Some(None),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    async fn establish_session(&self, user: &User, meta: &ConnectionMeta) -> CoreResult<LoginOutput> {
        let family = Uuid::new_v4();
        let jti = Uuid::new_v4();

        let access_token = token::issue_access_token(
            user.id,
            user.role.as_str(),
            user.mfa_enabled,
            family,
            &self.config,
        )?;
        let refresh_token = token::issue_refresh_token(user.id, family, jti, &self.config)?;

        self.sessions
            .create(CreateSession {
                user_id: user.id,
                family,
                current_jti: jti,
                ip_address: meta.ip_address.clone(),
                user_agent: meta.user_agent.clone(),
            })
            .await?;

        Ok(LoginOutput {
            access_token,
            refresh_token,
            family,
            expires_in: self.config.access_token_lifetime_secs,
            user: UserSummary::from(user),
        })
    }

    fn check_totp_code(&self, user: &User, code: &str) -> CoreResult<bool> {
        let Some(key) = self.config.mfa_encryption_key.as_ref() else {
            return Err(AuthError::Crypto("MFA encryption key not configured".into()).into());
        };
        let Some(encrypted) = user.totp_secret.as_deref() else {
            return Err(AuthError::NotEnrolled.into());
        };
        let secret = totp::decrypt_secret(key, encrypted)?;
        Ok(totp::verify_code(
            &secret,
            code,
            &self.config.totp_issuer,
            &user.email,
        )?)
    }

    /// Login-time TOTP verification: authenticator code first, then
    /// the backup-code set.
    async fn verify_totp_or_backup(&self, user: &User, code: &str) -> CoreResult<()> {
        let trimmed = code.trim();
        if trimmed.len() == 6
            && trimmed.chars().all(|c| c.is_ascii_digit())
            && self.check_totp_code(user, trimmed)?
        {
            return Ok(());
        }
        self.consume_backup_code(user, trimmed).await
    }

    async fn consume_backup_code(&self, user: &User, code: &str) -> CoreResult<()> {
        let hash = totp::hash_backup_code(code);
        if !user.backup_codes.contains(&hash) {
            return Err(AuthError::InvalidCode.into());
        }
        // Strictly single-use: the matched hash is removed.
        let remaining: Vec<String> = user
            .backup_codes
            .iter()
            .filter(|h| **h != hash)
            .cloned()
            .collect();
        self.users
            .update(
                user.id,
                UpdateUser {
                    backup_codes: Some(remaining),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    async fn create_and_send_otp(&self, user: &User, method: MfaMethod) -> CoreResult<()> {
        let code = otp::generate_code();
        let challenge = otp::new_challenge(&code, method, self.config.otp_ttl_secs);
        // Overwrites any prior pending challenge.
        self.users
            .update(
                user.id,
                UpdateUser {
                    otp: Some(Some(challenge)),
                    ..Default::default()
                },
            )
            .await?;

        let minutes = self.config.otp_ttl_secs / 60;
        let body = format!("Your code is {code} (valid for {minutes} minutes).");
        let destination = match method {
            MfaMethod::Sms => user.phone.clone(),
            _ => Some(user.email.clone()),
        };
        match destination {
            Some(to) => self.dispatch_fire_and_forget(to, "Your login code".into(), body),
            None => warn!(user_id = %user.id, "no SMS destination on file; code not dispatched"),
        }
        Ok(())
    }

    /// Verify against the pending challenge; returns the challenge's
    /// method on success. All rejection reasons look identical to the
    /// caller.
    async fn consume_otp(&self, user: &User, code: &str) -> CoreResult<MfaMethod> {
        match otp::check(
            user.otp.as_ref(),
            code,
            self.config.otp_max_attempts,
            Utc::now(),
        ) {
            OtpCheck::Match => {
                let method = user.otp.as_ref().map(|c| c.method);
                self.users
                    .update(
                        user.id,
                        UpdateUser {
                            otp: Some(None),
                            ..Default::default()
                        },
                    )
                    .await?;
                method.ok_or_else(|| AuthError::InvalidOrExpiredToken.into())
            }
            OtpCheck::Mismatch(counted) => {
                self.users
                    .update(
                        user.id,
                        UpdateUser {
                            otp: Some(Some(counted)),
                            ..Default::default()
                        },
                    )
                    .await?;
                Err(AuthError::InvalidOrExpiredToken.into())
            }
            OtpCheck::Rejected => Err(AuthError::InvalidOrExpiredToken.into()),
        }
    }

    async fn audit_best_effort(
        &self,
        actor_id: Option<Uuid>,
        tenant_id: Option<Uuid>,
        action: &str,
        meta: &ConnectionMeta,
    ) {
        let entry = CreateAuditLogEntry {
            actor_id,
            tenant_id,
            action: action.to_string(),
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
        };
        if let Err(e) = self.audit.append(entry).await {
            warn!(action = %action, error = %e, "audit append failed");
        }
    }

    fn dispatch_fire_and_forget(&self, to: String, subject: String, body: String) {
        let sender = Arc::clone(&self.sender);
        tokio::spawn(async move {
            if let Err(e) = sender.send(&to, &subject, &body) {
                error!(to = %to, error = %e, "message dispatch failed");
            }
        });
    }
}

fn assert_account_usable(user: &User) -> CoreResult<()> {
    if !user.is_active {
        return Err(AuthError::AccountDisabled.into());
    }
    Ok(())
}
