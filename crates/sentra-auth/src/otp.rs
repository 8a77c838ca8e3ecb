//! One-time-PIN (email/SMS) challenge generation and verification.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sentra_core::models::user::{MfaMethod, OtpChallenge};
use sha2::{Digest, Sha256};

/// Outcome of checking a code against a pending challenge.
#[derive(Debug, PartialEq, Eq)]
pub enum OtpCheck {
    /// Code matched; the challenge must be cleared (single use).
    Match,
    /// Code did not match; the incremented challenge must be persisted.
    Mismatch(OtpChallenge),
    /// No pending challenge, attempts exhausted, or expired.
    Rejected,
}

/// Generate a uniformly random 6-digit code, zero-padded.
pub fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:06}")
}

/// Normalize user input: digits only, zero-pad, keep the last six.
/// Preserves leading zeros however the client mangled them.
pub fn normalize_code(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    let padded = format!("{digits:0>6}");
    padded[padded.len() - 6..].to_string()
}

fn sha256_hex(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

/// Build a fresh challenge for `code`; overwrites any prior pending
/// challenge when stored.
pub fn new_challenge(code: &str, method: MfaMethod, ttl_secs: u64) -> OtpChallenge {
    OtpChallenge {
        hash: sha256_hex(code),
        method,
        expires_at: Utc::now() + Duration::seconds(ttl_secs as i64),
        attempts: 0,
    }
}

/// Check `input` against a pending challenge.
///
/// The caller does not learn *why* a code was rejected — missing
/// challenge, attempt cap, expiry, and mismatch are indistinguishable
/// at the API boundary.
pub fn check(
    challenge: Option<&OtpChallenge>,
    input: &str,
    max_attempts: u32,
    now: DateTime<Utc>,
) -> OtpCheck {
    let Some(challenge) = challenge else {
        return OtpCheck::Rejected;
    };
    if challenge.attempts >= max_attempts {
        return OtpCheck::Rejected;
    }
    if challenge.expires_at < now {
        return OtpCheck::Rejected;
    }

    if sha256_hex(&normalize_code(input)) == challenge.hash {
        OtpCheck::Match
    } else {
        let mut counted = challenge.clone();
        counted.attempts += 1;
        OtpCheck::Mismatch(counted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn normalization_preserves_leading_zeros() {
        assert_eq!(normalize_code("001234"), "001234");
        assert_eq!(normalize_code("1234"), "001234");
        assert_eq!(normalize_code(" 12-34-56 "), "123456");
        assert_eq!(normalize_code("9876543"), "876543");
    }

    #[test]
    fn matching_code_is_accepted() {
        let challenge = new_challenge("042042", MfaMethod::Email, 300);
        assert_eq!(
            check(Some(&challenge), "042042", 5, Utc::now()),
            OtpCheck::Match
        );
        // Mangled but equivalent input.
        assert_eq!(
            check(Some(&challenge), " 042 042 ", 5, Utc::now()),
            OtpCheck::Match
        );
    }

    #[test]
    fn mismatch_increments_attempts() {
        let challenge = new_challenge("042042", MfaMethod::Email, 300);
        match check(Some(&challenge), "999999", 5, Utc::now()) {
            OtpCheck::Mismatch(counted) => assert_eq!(counted.attempts, 1),
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn missing_challenge_is_rejected() {
        assert_eq!(check(None, "042042", 5, Utc::now()), OtpCheck::Rejected);
    }

    #[test]
    fn expired_challenge_is_rejected_even_with_correct_code() {
        let challenge = new_challenge("042042", MfaMethod::Sms, 0);
        let later = Utc::now() + Duration::seconds(1);
        assert_eq!(check(Some(&challenge), "042042", 5, later), OtpCheck::Rejected);
    }

    #[test]
    fn attempt_cap_is_enforced() {
        let mut challenge = new_challenge("042042", MfaMethod::Email, 300);
        challenge.attempts = 5;
        assert_eq!(
            check(Some(&challenge), "042042", 5, Utc::now()),
            OtpCheck::Rejected
        );
    }
}
