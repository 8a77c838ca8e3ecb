//! Authentication configuration.

/// Configuration for the authentication service.
///
/// Policy durations and counters are deliberately configurable; the
/// defaults match the production deployment.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded Ed25519 private key for access-token signing.
    pub access_private_key_pem: String,
    /// PEM-encoded Ed25519 public key for access-token verification.
    pub access_public_key_pem: String,
    /// PEM-encoded Ed25519 private key for refresh-token signing.
    /// Independent of the access keypair so leaking one token class
    /// does not expose the other's signing material.
    pub refresh_private_key_pem: String,
    /// PEM-encoded Ed25519 public key for refresh-token verification.
    pub refresh_public_key_pem: String,
    /// Access token lifetime in seconds (default: 900 = 15 minutes).
    pub access_token_lifetime_secs: u64,
    /// Refresh token lifetime in seconds (default: 1_209_600 = 14 days).
    pub refresh_token_lifetime_secs: u64,
    /// JWT issuer (`iss` claim), validated on every decode.
    pub jwt_issuer: String,
    /// JWT audience (`aud` claim), validated on every decode.
    pub jwt_audience: String,
    /// Optional pepper prepended to passwords before Argon2id
    /// verification. Must match the pepper used by the user store.
    pub pepper: Option<String>,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
    /// 256-bit AES-GCM key for encrypting TOTP secrets at rest.
    /// `None` disables TOTP enrollment.
    pub mfa_encryption_key: Option<[u8; 32]>,
    /// MFA bridge-token lifetime in seconds (default: 300 = 5 minutes).
    pub mfa_challenge_lifetime_secs: u64,
    /// Issuer name shown in authenticator apps.
    pub totp_issuer: String,
    /// Max consecutive failed login attempts before lockout (default: 5).
    pub max_failed_login_attempts: u32,
    /// Lockout duration in seconds (default: 900 = 15 minutes).
    pub lockout_duration_secs: u64,
    /// One-time-PIN lifetime in seconds (default: 300 = 5 minutes).
    pub otp_ttl_secs: u64,
    /// Max verification attempts per one-time-PIN (default: 5).
    pub otp_max_attempts: u32,
    /// Backup codes generated per TOTP enrollment (default: 8).
    pub backup_code_count: usize,
    /// Password-reset token lifetime in seconds (default: 3600 = 1 hour).
    pub reset_token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_private_key_pem: String::new(),
            access_public_key_pem: String::new(),
            refresh_private_key_pem: String::new(),
            refresh_public_key_pem: String::new(),
            access_token_lifetime_secs: 900,
            refresh_token_lifetime_secs: 1_209_600,
            jwt_issuer: "sentra".into(),
            jwt_audience: "sentra-api".into(),
            pepper: None,
            min_password_length: 8,
            mfa_encryption_key: None,
            mfa_challenge_lifetime_secs: 300,
            totp_issuer: "Sentra".into(),
            max_failed_login_attempts: 5,
            lockout_duration_secs: 900,
            otp_ttl_secs: 300,
            otp_max_attempts: 5,
            backup_code_count: 8,
            reset_token_ttl_secs: 3600,
        }
    }
}
