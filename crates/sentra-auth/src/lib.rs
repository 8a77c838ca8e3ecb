//! Sentra Auth — password authentication with lockout, EdDSA token
//! issuance/validation, refresh rotation with reuse detection, and MFA
//! (TOTP, backup codes, email/SMS one-time codes).

pub mod config;
pub mod error;
pub mod mailer;
pub mod otp;
pub mod password;
pub mod service;
pub mod token;
pub mod totp;

pub use config::AuthConfig;
pub use error::AuthError;
pub use mailer::{LogMessageSender, MessageSender};
pub use service::{AuthService, LoginInput, LoginOutcome, LoginOutput, RefreshOutput};
pub use token::AccessTokenClaims;
