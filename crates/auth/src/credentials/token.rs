use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::HeaderMap;

use crate::credentials::CredentialManager;
use crate::token::TokenIssuer;
use crate::{AuthError, TokenPrincipal};

/// Authorization scheme expected in front of the token.
pub const BEARER_SCHEME: &str = "Bearer";

/// Bearer-token authentication backed by a [`TokenIssuer`].
///
/// - no (or empty) `Authorization` header → [`AuthError::Unauthorized`]
/// - scheme present but no token after it → [`AuthError::TokenMissing`]
/// - token rejected by the issuer, for any reason → [`AuthError::Unauthorized`]
#[derive(Clone)]
pub struct TokenCredentialManager {
    issuer: Arc<dyn TokenIssuer>,
}

impl TokenCredentialManager {
    pub fn new(issuer: Arc<dyn TokenIssuer>) -> Self {
        Self { issuer }
    }
}

impl CredentialManager for TokenCredentialManager {
    type Principal = TokenPrincipal;

    fn authenticate(&self, headers: &HeaderMap) -> Result<TokenPrincipal, AuthError> {
        let value = headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::Unauthorized)?
            .to_str()
            .map_err(|_| AuthError::Unauthorized)?;
        if value.is_empty() {
            return Err(AuthError::Unauthorized);
        }

        let token = strip_bearer(value);
        if token.is_empty() {
            return Err(AuthError::TokenMissing);
        }

        let claims = self
            .issuer
            .decode(token)
            .map_err(|_| AuthError::Unauthorized)?;

        Ok(TokenPrincipal::new(claims))
    }
}

impl core::fmt::Debug for TokenCredentialManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCredentialManager").finish_non_exhaustive()
    }
}

/// Remove a leading `Bearer` scheme (case-insensitive) and surrounding
/// whitespace. A value without the scheme is returned as-is and left for the
/// issuer to reject.
fn strip_bearer(value: &str) -> &str {
    let scheme_len = BEARER_SCHEME.len();
    match value.get(..scheme_len) {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => {
            let rest = &value[scheme_len..];
            if rest.is_empty() || rest.starts_with(' ') {
                rest.trim()
            } else {
                value.trim()
            }
        }
        _ => value.trim(),
    }
}
