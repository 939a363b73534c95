use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Single-use password-reset token with a bounded lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetToken {
    pub token: Uuid,
    pub issued_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl ResetToken {
    pub fn issue(now: NaiveDateTime, ttl_minutes: i64) -> Self {
        Self {
            token: Uuid::new_v4(),
            issued_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        }
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now > self.expires_at
    }

    /// Constant shape: the raw value must parse as a UUID and match.
    pub fn matches(&self, raw: &str) -> bool {
        raw.parse::<Uuid>().map(|token| token == self.token).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at_minutes(minutes: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .expect("valid date")
            .and_hms_opt(9, minutes, 0)
            .expect("valid time")
    }

    #[test]
    fn token_expires_after_its_ttl() {
        let token = ResetToken::issue(at_minutes(0), 30);
        assert!(!token.is_expired(at_minutes(30)));
        assert!(token.is_expired(at_minutes(31)));
    }

    #[test]
    fn matches_only_its_own_value() {
        let token = ResetToken::issue(at_minutes(0), 30);
        assert!(token.matches(&token.token.to_string()));
        assert!(!token.matches(&Uuid::new_v4().to_string()));
        assert!(!token.matches("not-a-uuid"));
    }
}
