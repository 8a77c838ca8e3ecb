//! Authentication error types.

use sentra_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown principal and wrong password collapse into the same
    /// error so callers cannot enumerate accounts.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is locked")]
    AccountLocked,

    #[error("account is disabled")]
    AccountDisabled,

    #[error("invalid refresh token")]
    InvalidRefresh,

    /// A stale refresh token was presented; the session family has
    /// been revoked as a side effect.
    #[error("refresh reuse detected")]
    ReuseDetected,

    #[error("invalid MFA code")]
    InvalidCode,

    #[error("invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("MFA already enrolled")]
    AlreadyEnrolled,

    #[error("MFA is not enrolled for this user")]
    NotEnrolled,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("forbidden")]
    Forbidden,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl AuthError {
    /// HTTP status the boundary layer maps this failure to.
    pub fn http_status(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials
            | AuthError::InvalidRefresh
            | AuthError::ReuseDetected
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => 401,
            AuthError::AccountLocked => 423,
            AuthError::AccountDisabled | AuthError::Forbidden => 403,
            AuthError::InvalidCode
            | AuthError::InvalidOrExpiredToken
            | AuthError::AlreadyEnrolled
            | AuthError::NotEnrolled => 400,
            AuthError::Crypto(_) => 500,
        }
    }
}

impl From<AuthError> for CoreError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Crypto(msg) => CoreError::Crypto(msg),
            AuthError::Forbidden => CoreError::AuthorizationDenied {
                reason: err.to_string(),
            },
            other => CoreError::AuthenticationFailed {
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_the_contract() {
        assert_eq!(AuthError::InvalidCredentials.http_status(), 401);
        assert_eq!(AuthError::AccountLocked.http_status(), 423);
        assert_eq!(AuthError::AccountDisabled.http_status(), 403);
        assert_eq!(AuthError::ReuseDetected.http_status(), 401);
        assert_eq!(AuthError::InvalidOrExpiredToken.http_status(), 400);
        assert_eq!(AuthError::AlreadyEnrolled.http_status(), 400);
    }
}
