use crate::{Claims, Role};

/// A verified identity produced by a credential manager.
///
/// Each scheme has its own concrete principal type; downstream code (policy
/// checks, handlers) reaches the scheme-specific payload through
/// [`Principal::as_principal`] without knowing which scheme produced it.
///
/// A principal is created once per request, only after successful
/// verification, and is never mutated afterwards.
pub trait Principal: Clone + Send + Sync + 'static {
    /// Scheme-specific identity payload.
    type Identity: ?Sized;

    fn as_principal(&self) -> &Self::Identity;
}

/// Principals that carry a role set.
pub trait HasRoles {
    fn roles(&self) -> &[Role];

    fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r.as_str() == role)
    }
}

/// Principal produced by HTTP basic authentication.
///
/// Only the username is retained; the supplied secret is dropped as soon as
/// it has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicPrincipal {
    username: String,
}

impl BasicPrincipal {
    pub(crate) fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Principal for BasicPrincipal {
    type Identity = str;

    fn as_principal(&self) -> &str {
        &self.username
    }
}

/// Principal produced by signed-token authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPrincipal {
    claims: Claims,
}

impl TokenPrincipal {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn email(&self) -> &str {
        &self.claims.email
    }

    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

impl Principal for TokenPrincipal {
    type Identity = Claims;

    fn as_principal(&self) -> &Claims {
        &self.claims
    }
}

impl HasRoles for TokenPrincipal {
    fn roles(&self) -> &[Role] {
        &self.claims.roles
    }
}
