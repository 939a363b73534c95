use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use sha2::{Digest, Sha256};

pub const PASSWORD_MIN_LEN: usize = 10;

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\",.<>/?\\|`~";

/// One failed requirement of the password policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum PolicyViolation {
    #[error("password must have at least {PASSWORD_MIN_LEN} characters")]
    TooShort,
    #[error("password must contain at least 1 uppercase letter")]
    MissingUppercase,
    #[error("password must contain at least 1 lowercase letter")]
    MissingLowercase,
    #[error("password must contain at least 1 digit")]
    MissingDigit,
    #[error("password must contain at least 1 special character")]
    MissingSpecial,
    #[error("password must not contain the username")]
    ContainsUsername,
    #[error("password must not contain the local part of the e-mail")]
    ContainsEmailLocalPart,
}

/// Checks the full policy and reports every violation at once, so the form
/// can show the complete list.
pub fn validate_policy(
    password: &str,
    username: &str,
    email: &str,
) -> Result<(), Vec<PolicyViolation>> {
    let mut violations = Vec::new();

    if password.chars().count() < PASSWORD_MIN_LEN {
        violations.push(PolicyViolation::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push(PolicyViolation::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push(PolicyViolation::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PolicyViolation::MissingDigit);
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        violations.push(PolicyViolation::MissingSpecial);
    }

    let lowered = password.to_lowercase();
    let username = username.trim().to_lowercase();
    if !username.is_empty() && lowered.contains(&username) {
        violations.push(PolicyViolation::ContainsUsername);
    }
    let email_local = email.split('@').next().unwrap_or_default().trim().to_lowercase();
    if !email_local.is_empty() && lowered.contains(&email_local) {
        violations.push(PolicyViolation::ContainsEmailLocalPart);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// A password with no recorded change date counts as expired.
pub fn is_password_expired(
    last_change: Option<NaiveDateTime>,
    expiry_days: i64,
    now: NaiveDateTime,
) -> bool {
    match last_change {
        Some(changed) => now > changed + Duration::days(expiry_days),
        None => true,
    }
}

/// Verification result; `needs_rehash` signals the caller to upgrade the
/// stored hash on successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCheck {
    pub valid: bool,
    pub needs_rehash: bool,
}

/// Hashing seam. The production implementation wraps the external bcrypt
/// library; the built-in SHA-256 scheme covers the legacy hashes it
/// replaced.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> String;
    fn verify(&self, stored_hash: &str, password: &str) -> PasswordCheck;
}

/// Legacy SHA-256 hex scheme. Successful verifications always request a
/// rehash so accounts migrate to the stronger scheme on next login.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256PasswordHasher;

impl Sha256PasswordHasher {
    fn digest(password: &str) -> String {
        let digest = Sha256::digest(password.as_bytes());
        digest.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> String {
        Self::digest(password)
    }

    fn verify(&self, stored_hash: &str, password: &str) -> PasswordCheck {
        let valid = !stored_hash.is_empty() && stored_hash == Self::digest(password);
        PasswordCheck {
            valid,
            needs_rehash: valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .expect("valid date")
            .and_hms_opt(12, 0, 0)
            .expect("valid time")
    }

    #[test]
    fn strong_password_passes() {
        assert!(validate_policy("Tr0carSenha!", "maria.souza", "maria@frota.example").is_ok());
    }

    #[test]
    fn weak_password_reports_every_violation() {
        let violations =
            validate_policy("abc", "maria", "maria@frota.example").expect_err("weak password");
        assert!(violations.contains(&PolicyViolation::TooShort));
        assert!(violations.contains(&PolicyViolation::MissingUppercase));
        assert!(violations.contains(&PolicyViolation::MissingDigit));
        assert!(violations.contains(&PolicyViolation::MissingSpecial));
    }

    #[test]
    fn password_may_not_embed_identity() {
        let violations = validate_policy("Maria.Souza99!", "maria.souza", "other@frota.example")
            .expect_err("embeds username");
        assert!(violations.contains(&PolicyViolation::ContainsUsername));

        let violations = validate_policy("Xx9!financeiro", "someone", "financeiro@frota.example")
            .expect_err("embeds e-mail local part");
        assert!(violations.contains(&PolicyViolation::ContainsEmailLocalPart));
    }

    #[test]
    fn expiry_counts_from_last_change() {
        let changed = Some(at(2024, 1, 1));
        assert!(!is_password_expired(changed, 90, at(2024, 3, 1)));
        assert!(is_password_expired(changed, 90, at(2024, 6, 1)));
        assert!(is_password_expired(None, 90, at(2024, 1, 1)));
    }

    #[test]
    fn sha256_scheme_verifies_and_flags_rehash() {
        let hasher = Sha256PasswordHasher;
        let hash = hasher.hash("Tr0carSenha!");
        let check = hasher.verify(&hash, "Tr0carSenha!");
        assert!(check.valid);
        assert!(check.needs_rehash);

        let check = hasher.verify(&hash, "wrong");
        assert!(!check.valid);

        let check = hasher.verify("", "anything");
        assert!(!check.valid);
    }
}
