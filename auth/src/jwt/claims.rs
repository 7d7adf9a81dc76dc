use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Access token claims.
///
/// `sub` carries the principal identifier and `exp` bounds the token's
/// lifetime. `sub` stays optional so that a signed token lacking it still
/// decodes and can be refused explicitly instead of failing as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal identifier)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// Issued at (Unix timestamp, seconds)
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    /// Create claims for a subject, valid for `validity` starting now.
    ///
    /// # Arguments
    /// * `subject` - Principal identifier stored in `sub`
    /// * `validity` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with sub, iat and exp set
    ///
    /// # Errors
    /// * `EncodingFailed` - Validity is not positive or the expiry is out of range
    pub fn for_subject(subject: impl ToString, validity: Duration) -> Result<Self, JwtError> {
        Self::issued_at(subject, validity, Utc::now())
    }

    /// Create claims for a subject as if issued at `now`.
    ///
    /// The expiry is rounded up to the next whole second, so the token is
    /// never accepted for less than `validity` but may be accepted for up to
    /// one second longer. Truncating instead would cut tokens short by the
    /// same amount.
    ///
    /// # Errors
    /// * `EncodingFailed` - Validity is not positive or the expiry is out of range
    pub fn issued_at(
        subject: impl ToString,
        validity: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, JwtError> {
        if validity <= Duration::zero() {
            return Err(JwtError::EncodingFailed(format!(
                "token validity must be positive, got {}",
                validity
            )));
        }

        let expires_at = now.checked_add_signed(validity).ok_or_else(|| {
            JwtError::EncodingFailed(format!("token validity {} is out of range", validity))
        })?;

        let mut exp = expires_at.timestamp();
        if expires_at.timestamp_subsec_nanos() > 0 {
            exp += 1;
        }

        Ok(Self {
            sub: Some(subject.to_string()),
            exp,
            iat: now.timestamp(),
        })
    }

    /// Subject claim, if present and non-empty.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|sub| !sub.is_empty())
    }

    /// Expiry as a UTC instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// The expiry instant itself is already outside the validity window.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_for_subject() {
        let claims = Claims::for_subject("alice@example.com", Duration::minutes(59)).unwrap();

        assert_eq!(claims.subject(), Some("alice@example.com"));
        let lifetime = claims.exp - claims.iat;
        assert!(lifetime == 59 * 60 || lifetime == 59 * 60 + 1);
    }

    #[test]
    fn test_expiry_rounds_up_to_whole_second() {
        let now = Utc.timestamp_opt(1_000, 999_000_000).unwrap();
        let claims = Claims::issued_at("alice@example.com", Duration::seconds(1), now).unwrap();

        assert_eq!(claims.iat, 1_000);
        assert_eq!(claims.exp, 1_002);
    }

    #[test]
    fn test_expiry_on_whole_second_is_exact() {
        let now = Utc.timestamp_opt(1_000, 0).unwrap();
        let claims = Claims::issued_at("alice@example.com", Duration::seconds(1), now).unwrap();

        assert_eq!(claims.exp, 1_001);
        assert_eq!(claims.expires_at(), Utc.timestamp_opt(1_001, 0).unwrap());
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::issued_at(
            "alice@example.com",
            Duration::seconds(1000),
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap();

        assert!(!claims.is_expired(999)); // Not expired
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }

    #[test]
    fn test_out_of_range_validity_is_an_error() {
        // Valid durations whose expiry lies past the last representable date.
        for validity in [Duration::days(100_000_000), Duration::MAX] {
            let result = Claims::for_subject("alice@example.com", validity);
            assert!(matches!(result, Err(JwtError::EncodingFailed(_))));
        }
    }

    #[test]
    fn test_non_positive_validity_is_an_error() {
        let now = Utc.timestamp_opt(1_000, 0).unwrap();

        let zero = Claims::issued_at("alice@example.com", Duration::zero(), now);
        let negative = Claims::issued_at("alice@example.com", Duration::minutes(-5), now);

        assert!(matches!(zero, Err(JwtError::EncodingFailed(_))));
        assert!(matches!(negative, Err(JwtError::EncodingFailed(_))));
    }

    #[test]
    fn test_empty_subject_is_absent() {
        let claims = Claims {
            sub: Some(String::new()),
            exp: 10,
            iat: 0,
        };
        assert_eq!(claims.subject(), None);
    }

    #[test]
    fn test_missing_subject_deserializes() {
        let claims: Claims = serde_json::from_str(r#"{"exp": 10}"#).unwrap();
        assert_eq!(claims.sub, None);
        assert_eq!(claims.iat, 0);
    }
}
