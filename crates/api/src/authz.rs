//! Route policies.
//!
//! Trees are assembled once at startup; an invalid tree (for example an empty
//! role set) fails `build_app` instead of surfacing per request.

use std::sync::Arc;

use b16_auth::{AnyPolicy, CompositePolicy, PolicyError, RequireRolePolicy, SharedPolicy, TokenPrincipal};

pub const ADMIN: &str = "ADMIN";
pub const USER: &str = "USER";

fn require_roles<const N: usize>(roles: [&'static str; N]) -> Result<SharedPolicy<TokenPrincipal>, PolicyError> {
    Ok(Arc::new(RequireRolePolicy::new(roles)?))
}

/// Policy guarding `/token-auth`: a principal holding both `ADMIN` and `USER`,
/// checked directly or through a single-child composite.
pub fn token_route_policy() -> Result<SharedPolicy<TokenPrincipal>, PolicyError> {
    let composite: SharedPolicy<TokenPrincipal> =
        Arc::new(CompositePolicy::new(vec![require_roles([ADMIN, USER])?])?);

    Ok(Arc::new(AnyPolicy::new(vec![require_roles([ADMIN, USER])?, composite])))
}
