//! Composable authorization policies.
//!
//! A policy is a stateless predicate over a principal. Leaf policies
//! ([`RequireRolePolicy`]) are combined with [`AnyPolicy`] (OR) and
//! [`CompositePolicy`] (AND), which nest arbitrarily:
//!
//! ```
//! use std::sync::Arc;
//! use b16_auth::policy::{AnyPolicy, CompositePolicy, Policy, RequireRolePolicy};
//! use b16_auth::{Claims, TokenPrincipal};
//!
//! // (ADMIN and AUDITOR) or SUPPORT
//! let admin_and_auditor = CompositePolicy::<TokenPrincipal>::new(vec![
//!     Arc::new(RequireRolePolicy::new(["ADMIN"]).unwrap()),
//!     Arc::new(RequireRolePolicy::new(["AUDITOR"]).unwrap()),
//! ])
//! .unwrap();
//! let policy = AnyPolicy::<TokenPrincipal>::new(vec![
//!     Arc::new(admin_and_auditor),
//!     Arc::new(RequireRolePolicy::new(["SUPPORT"]).unwrap()),
//! ]);
//!
//! let support = TokenPrincipal::new(Claims::new("s@example.com", ["SUPPORT"]));
//! assert!(policy.check(&support).is_ok());
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::AuthError;

pub mod any;
pub mod composite;
pub mod role;

pub use any::AnyPolicy;
pub use composite::CompositePolicy;
pub use role::RequireRolePolicy;

/// Authorization predicate over a principal of type `P`.
///
/// Implementations must be pure: checking the same principal twice yields
/// the same result. Denial is always reported as [`AuthError::Forbidden`].
pub trait Policy<P: ?Sized>: Send + Sync {
    fn check(&self, principal: &P) -> Result<(), AuthError>;
}

/// Type-erased, shareable policy node.
pub type SharedPolicy<P> = Arc<dyn Policy<P>>;

impl<P: ?Sized, T: Policy<P> + ?Sized> Policy<P> for Arc<T> {
    fn check(&self, principal: &P) -> Result<(), AuthError> {
        (**self).check(principal)
    }
}

impl<P: ?Sized, T: Policy<P> + ?Sized> Policy<P> for Box<T> {
    fn check(&self, principal: &P) -> Result<(), AuthError> {
        (**self).check(principal)
    }
}

/// Policy construction errors. These are programmer errors, reported when the
/// policy tree is built rather than when a request is checked.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    #[error("role policy requires at least one role")]
    EmptyRoleSet,

    #[error("composite policy requires at least one policy")]
    EmptyComposite,
}
