//! TOTP enrollment/verification, backup codes, and AES-256-GCM secret
//! encryption.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use sha2::{Digest, Sha256};
use totp_rs::{Algorithm, Secret, TOTP};

use crate::error::AuthError;

/// Everything returned to the user exactly once at enrollment time.
#[derive(Debug)]
pub struct TotpEnrollment {
    /// Base32 secret for manual entry.
    pub secret_base32: String,
    /// otpauth:// provisioning URI.
    pub otpauth_uri: String,
    /// Base64-encoded PNG of the provisioning QR code.
    pub qr_png_base64: String,
    /// Raw secret bytes, to be encrypted before storage.
    pub secret_bytes: Vec<u8>,
}

/// Encrypt a TOTP secret with AES-256-GCM.
///
/// Returns `base64(nonce || ciphertext || tag)`.
pub fn encrypt_secret(key: &[u8; 32], plaintext: &[u8]) -> Result<String, AuthError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let mut nonce_bytes = [0u8; 12];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| AuthError::Crypto(format!("AES-GCM encrypt: {e}")))?;

    let mut combined = nonce_bytes.to_vec();
    combined.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(combined))
}

/// Decrypt an AES-256-GCM encrypted TOTP secret.
pub fn decrypt_secret(key: &[u8; 32], encoded: &str) -> Result<Vec<u8>, AuthError> {
    let combined = STANDARD
        .decode(encoded)
        .map_err(|e| AuthError::Crypto(format!("base64 decode: {e}")))?;

    if combined.len() < 13 {
        return Err(AuthError::Crypto("ciphertext too short".into()));
    }

    let (nonce_bytes, ciphertext) = combined.split_at(12);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|e| AuthError::Crypto(format!("AES-GCM decrypt: {e}")))
}

fn build_totp(secret_bytes: Vec<u8>, issuer: &str, account: &str) -> Result<TOTP, AuthError> {
    TOTP::new(
        Algorithm::SHA1, // RFC 6238 default
        6,               // digits
        1,               // skew (±1 step)
        30,              // step seconds
        secret_bytes,
        Some(issuer.to_string()),
        account.to_string(),
    )
    .map_err(|e| AuthError::Crypto(format!("TOTP init: {e}")))
}

/// Generate a TOTP enrollment: fresh 160-bit secret, provisioning URI,
/// and QR payload.
pub fn generate_enrollment(issuer: &str, account: &str) -> Result<TotpEnrollment, AuthError> {
    let secret = Secret::generate_secret();
    let secret_bytes = secret
        .to_bytes()
        .map_err(|e| AuthError::Crypto(format!("secret bytes: {e}")))?;

    let totp = build_totp(secret_bytes.clone(), issuer, account)?;
    let qr_png_base64 = totp
        .get_qr_base64()
        .map_err(|e| AuthError::Crypto(format!("QR render: {e}")))?;

    Ok(TotpEnrollment {
        secret_base32: secret.to_encoded().to_string(),
        otpauth_uri: totp.get_url(),
        qr_png_base64,
        secret_bytes,
    })
}

/// Verify a 6-digit time-step code against a raw secret
/// (30 s step, ±1 step window).
pub fn verify_code(
    secret_bytes: &[u8],
    code: &str,
    issuer: &str,
    account: &str,
) -> Result<bool, AuthError> {
    let totp = build_totp(secret_bytes.to_vec(), issuer, account)?;
    totp.check_current(code)
        .map_err(|e| AuthError::Crypto(format!("TOTP check: {e}")))
}

// ---------------------------------------------------------------------
// Backup codes
// ---------------------------------------------------------------------

const BACKUP_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate `count` backup codes in `XXXX-XXXX` form.
///
/// The plaintext is returned to the user once; only hashes of the
/// normalized form are ever stored.
pub fn generate_backup_codes(count: usize) -> Vec<String> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let chars: String = (0..8)
                .map(|_| {
                    let idx = rng.random_range(0..BACKUP_CODE_CHARSET.len());
                    BACKUP_CODE_CHARSET[idx] as char
                })
                .collect();
            format!("{}-{}", &chars[..4], &chars[4..])
        })
        .collect()
}

/// Normalization applied before hashing or matching a backup code:
/// strip whitespace and hyphens, uppercase.
pub fn normalize_backup_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

/// SHA-256 hex of a normalized backup code — the stored form.
pub fn hash_backup_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_backup_code(code).as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = [42u8; 32];
        let plaintext = b"totp-secret-bytes";
        let encrypted = encrypt_secret(&key, plaintext).unwrap();
        let decrypted = decrypt_secret(&key, &encrypted).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn wrong_key_fails_decrypt() {
        let key1 = [42u8; 32];
        let key2 = [99u8; 32];
        let encrypted = encrypt_secret(&key1, b"secret").unwrap();
        assert!(decrypt_secret(&key2, &encrypted).is_err());
    }

    #[test]
    fn enrollment_produces_valid_uri() {
        let enrollment = generate_enrollment("Sentra", "alice@example.com").unwrap();
        assert!(!enrollment.secret_base32.is_empty());
        assert!(enrollment.otpauth_uri.starts_with("otpauth://totp/"));
        assert!(enrollment.otpauth_uri.contains("Sentra"));
        assert!(enrollment.otpauth_uri.contains("alice"));
        assert!(!enrollment.qr_png_base64.is_empty());
    }

    #[test]
    fn verify_code_with_valid_totp() {
        let enrollment = generate_enrollment("Sentra", "test@test.com").unwrap();
        let totp = build_totp(
            enrollment.secret_bytes.clone(),
            "Sentra",
            "test@test.com",
        )
        .unwrap();

        let code = totp.generate_current().unwrap();
        assert!(verify_code(&enrollment.secret_bytes, &code, "Sentra", "test@test.com").unwrap());
    }

    #[test]
    fn verify_code_wrong_code() {
        let enrollment = generate_enrollment("Sentra", "test@test.com").unwrap();
        assert!(!verify_code(&enrollment.secret_bytes, "000000", "Sentra", "test@test.com").unwrap());
    }

    #[test]
    fn backup_codes_have_transcribable_form() {
        let codes = generate_backup_codes(8);
        assert_eq!(codes.len(), 8);
        for code in &codes {
            assert_eq!(code.len(), 9);
            assert_eq!(&code[4..5], "-");
            assert!(
                code.chars()
                    .filter(|c| *c != '-')
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
        }
    }

    #[test]
    fn normalization_is_forgiving() {
        assert_eq!(normalize_backup_code(" ab12-cd34 "), "AB12CD34");
        assert_eq!(
            hash_backup_code("ab12-cd34"),
            hash_backup_code("AB12CD34")
        );
    }
}
