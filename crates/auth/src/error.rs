//! Authentication/authorization outcome model.

use thiserror::Error;

/// Failure of a credential manager or a policy check.
///
/// The display text of each variant is what a client ultimately sees, so it
/// never carries the underlying reason (bad signature, unknown user, ...).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Credential missing, malformed or not verified.
    #[error("unauthorized")]
    Unauthorized,

    /// Credential header present but without any token material.
    #[error("token missing")]
    TokenMissing,

    /// Principal verified but denied by a policy.
    #[error("forbidden")]
    Forbidden,
}

impl AuthError {
    /// Stable machine-readable name, suitable as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::TokenMissing => "token_missing",
            Self::Forbidden => "forbidden",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_wire_text() {
        assert_eq!(AuthError::Unauthorized.to_string(), "unauthorized");
        assert_eq!(AuthError::TokenMissing.to_string(), "token missing");
        assert_eq!(AuthError::Forbidden.to_string(), "forbidden");
    }

    #[test]
    fn token_missing_is_distinct_only_internally() {
        assert_ne!(AuthError::TokenMissing.kind(), AuthError::Unauthorized.kind());
    }
}
