//! SurrealDB implementation of [`UserRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use sentra_core::error::CoreResult;
use sentra_core::models::user::{CreateUser, MfaMethod, OtpChallenge, Role, UpdateUser, User};
use sentra_core::repository::UserRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    tenant_id: Option<String>,
    username: String,
    email: String,
    password_hash: Option<String>,
    role: String,
    is_active: bool,
    failed_login_attempts: u32,
    locked_until: Option<DateTime<Utc>>,
    phone: Option<String>,
    mfa_enabled: bool,
    mfa_method: Option<String>,
    totp_secret: Option<String>,
    backup_codes: Vec<String>,
    otp_hash: Option<String>,
    otp_method: Option<String>,
    otp_expires_at: Option<DateTime<Utc>>,
    otp_attempts: Option<u32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    tenant_id: Option<String>,
    username: String,
    email: String,
    password_hash: Option<String>,
    role: String,
    is_active: bool,
    failed_login_attempts: u32,
    locked_until: Option<DateTime<Utc>>,
    phone: Option<String>,
    mfa_enabled: bool,
    mfa_method: Option<String>,
    totp_secret: Option<String>,
    backup_codes: Vec<String>,
    otp_hash: Option<String>,
    otp_method: Option<String>,
    otp_expires_at: Option<DateTime<Utc>>,
    otp_attempts: Option<u32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    Role::parse(s).ok_or_else(|| DbError::Conversion(format!("unknown role: {s}")))
}

fn parse_mfa_method(s: &str) -> Result<MfaMethod, DbError> {
    MfaMethod::parse(s).ok_or_else(|| DbError::Conversion(format!("unknown MFA method: {s}")))
}

fn parse_optional_uuid(s: Option<String>, what: &str) -> Result<Option<Uuid>, DbError> {
    s.map(|v| {
        Uuid::parse_str(&v).map_err(|e| DbError::Conversion(format!("invalid {what} UUID: {e}")))
    })
    .transpose()
}

fn row_otp(
    otp_hash: Option<String>,
    otp_method: Option<String>,
    otp_expires_at: Option<DateTime<Utc>>,
    otp_attempts: Option<u32>,
) -> Result<Option<OtpChallenge>, DbError> {
    match (otp_hash, otp_method, otp_expires_at) {
        (Some(hash), Some(method), Some(expires_at)) => Ok(Some(OtpChallenge {
            hash,
            method: parse_mfa_method(&method)?,
            expires_at,
            attempts: otp_attempts.unwrap_or(0),
        })),
        _ => Ok(None),
    }
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        let otp = row_otp(
            self.otp_hash,
            self.otp_method,
            self.otp_expires_at,
            self.otp_attempts,
        )?;
        Ok(User {
            id,
            tenant_id: parse_optional_uuid(self.tenant_id, "tenant")?,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            is_active: self.is_active,
            failed_login_attempts: self.failed_login_attempts,
            locked_until: self.locked_until,
            phone: self.phone,
            mfa_enabled: self.mfa_enabled,
            mfa_method: self.mfa_method.as_deref().map(parse_mfa_method).transpose()?,
            totp_secret: self.totp_secret,
            backup_codes: self.backup_codes,
            otp,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Conversion(format!("invalid UUID: {e}")))?;
        let row = UserRow {
            tenant_id: self.tenant_id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            is_active: self.is_active,
            failed_login_attempts: self.failed_login_attempts,
            locked_until: self.locked_until,
            phone: self.phone,
            mfa_enabled: self.mfa_enabled,
            mfa_method: self.mfa_method,
            totp_secret: self.totp_secret,
            backup_codes: self.backup_codes,
            otp_hash: self.otp_hash,
            otp_method: self.otp_method,
            otp_expires_at: self.otp_expires_at,
            otp_attempts: self.otp_attempts,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        row.into_user(id)
    }
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Conversion(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Conversion(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }

    async fn get_by_unique_field(&self, field: &str, value: &str) -> CoreResult<User> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM user WHERE {field} = $value"
        );
        let mut result = self
            .db
            .query(&query)
            .bind(("value", value.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("{field}={value}"),
        })?;

        Ok(row.try_into_user()?)
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> CoreResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let password_hash = input
            .password
            .as_deref()
            .map(|p| hash_password(p, self.pepper.as_deref()))
            .transpose()?;

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 tenant_id = $tenant_id, \
                 username = $username, email = $email, \
                 password_hash = $password_hash, \
                 role = $role, \
                 is_active = true, \
                 failed_login_attempts = 0, \
                 locked_until = NONE, \
                 phone = $phone, \
                 mfa_enabled = false, \
                 mfa_method = NONE, \
                 totp_secret = NONE, \
                 backup_codes = [], \
                 otp_hash = NONE, \
                 otp_method = NONE, \
                 otp_expires_at = NONE, \
                 otp_attempts = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.map(|t| t.to_string())))
            .bind(("username", input.username))
            .bind(("email", input.email))
            .bind(("password_hash", password_hash))
            .bind(("role", input.role.as_str().to_string()))
            .bind(("phone", input.phone))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CoreResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_username(&self, username: &str) -> CoreResult<User> {
        self.get_by_unique_field("username", username).await
    }

    async fn get_by_email(&self, email: &str) -> CoreResult<User> {
        self.get_by_unique_field("email", email).await
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> CoreResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        if input.failed_login_attempts.is_some() {
            sets.push("failed_login_attempts = $failed_login_attempts");
        }
        if input.locked_until.is_some() {
            sets.push("locked_until = $locked_until");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.mfa_enabled.is_some() {
            sets.push("mfa_enabled = $mfa_enabled");
        }
        if input.mfa_method.is_some() {
            sets.push("mfa_method = $mfa_method");
        }
        if input.totp_secret.is_some() {
            sets.push("totp_secret = $totp_secret");
        }
        if input.backup_codes.is_some() {
            sets.push("backup_codes = $backup_codes");
        }
        if input.otp.is_some() {
            sets.push("otp_hash = $otp_hash");
            sets.push("otp_method = $otp_method");
            sets.push("otp_expires_at = $otp_expires_at");
            sets.push("otp_attempts = $otp_attempts");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }
        if let Some(failed_login_attempts) = input.failed_login_attempts {
            builder = builder.bind(("failed_login_attempts", failed_login_attempts));
        }
        if let Some(locked_until) = input.locked_until {
            // Option<Option<_>>: Some(Some(v)) = set, Some(None) = clear.
            builder = builder.bind(("locked_until", locked_until));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(mfa_enabled) = input.mfa_enabled {
            builder = builder.bind(("mfa_enabled", mfa_enabled));
        }
        if let Some(mfa_method) = input.mfa_method {
            builder = builder.bind((
                "mfa_method",
                mfa_method.map(|m| m.as_str().to_string()),
            ));
        }
        if let Some(totp_secret) = input.totp_secret {
            builder = builder.bind(("totp_secret", totp_secret));
        }
        if let Some(backup_codes) = input.backup_codes {
            builder = builder.bind(("backup_codes", backup_codes));
        }
        if let Some(otp) = input.otp {
            let (hash, method, expires_at, attempts) = match otp {
                Some(challenge) => (
                    Some(challenge.hash),
                    Some(challenge.method.as_str().to_string()),
                    Some(challenge.expires_at),
                    Some(challenge.attempts),
                ),
                None => (None, None, None, None),
            };
            builder = builder
                .bind(("otp_hash", hash))
                .bind(("otp_method", method))
                .bind(("otp_expires_at", expires_at))
                .bind(("otp_attempts", attempts));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn set_password(&self, id: Uuid, password: &str) -> CoreResult<()> {
        let id_str = id.to_string();
        let password_hash = hash_password(password, self.pepper.as_deref())?;

        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 password_hash = $password_hash, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }
        Ok(())
    }
}
