use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// Semantic token payload: who the bearer is and which roles they hold.
///
/// Registered fields (issuer, issued-at, expiry) are owned by the issuer and
/// never appear here; see [`RegisteredClaims`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity of the bearer.
    pub email: String,

    /// Roles granted to the bearer. Order and duplicates carry no meaning.
    pub roles: Vec<Role>,
}

impl Claims {
    pub fn new(email: impl Into<String>, roles: impl IntoIterator<Item = impl Into<Role>>) -> Self {
        Self {
            email: email.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// Fields populated by the issuer at signing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    /// Issuer name, taken from issuer configuration.
    pub iss: String,

    /// Issued-at timestamp (seconds resolution on the wire).
    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    /// Expiration timestamp (seconds resolution on the wire).
    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

/// Wire shape of a token payload: semantic claims plus registered fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TokenClaims {
    #[serde(flatten)]
    pub claims: Claims,

    #[serde(flatten)]
    pub registered: RegisteredClaims,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the time window of registered claims.
///
/// Signature and issuer checks happen in the issuer; this only looks at
/// `iat`/`exp` against the supplied `now`.
pub fn validate_registered(
    registered: &RegisteredClaims,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if registered.exp <= registered.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < registered.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= registered.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn registered(iat: i64, exp: i64) -> RegisteredClaims {
        RegisteredClaims {
            iss: "b16".to_string(),
            iat: at(iat),
            exp: at(exp),
        }
    }

    #[test]
    fn window_accepts_now_between_iat_and_exp() {
        assert_eq!(validate_registered(&registered(100, 200), at(100)), Ok(()));
        assert_eq!(validate_registered(&registered(100, 200), at(199)), Ok(()));
    }

    #[test]
    fn window_rejects_at_and_after_expiry() {
        assert_eq!(
            validate_registered(&registered(100, 200), at(200)),
            Err(TokenValidationError::Expired)
        );
        assert_eq!(
            validate_registered(&registered(100, 200), at(200) + Duration::days(1)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn window_rejects_future_issuance() {
        assert_eq!(
            validate_registered(&registered(100, 200), at(99)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn window_rejects_inverted_window() {
        assert_eq!(
            validate_registered(&registered(200, 200), at(200)),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn wire_shape_is_flat_with_numeric_timestamps() {
        let token = TokenClaims {
            claims: Claims::new("admin@email.com", ["ADMIN"]),
            registered: registered(100, 200),
        };

        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "email": "admin@email.com",
                "roles": ["ADMIN"],
                "iss": "b16",
                "iat": 100,
                "exp": 200,
            })
        );

        let back: TokenClaims = serde_json::from_value(json).unwrap();
        assert_eq!(back, token);
    }

    #[test]
    fn has_role_is_exact_membership() {
        use crate::{HasRoles, TokenPrincipal};

        let principal = TokenPrincipal::new(Claims::new("u@example.com", ["USER", "USER", "AUDITOR"]));
        assert!(principal.has_role("USER"));
        assert!(principal.has_role("AUDITOR"));
        assert!(!principal.has_role("user"));
        assert!(!principal.has_role("ADMIN"));
    }
}
