use crate::policy::{Policy, SharedPolicy};
use crate::AuthError;

/// Disjunction: passes as soon as one child passes.
///
/// Children are evaluated in order. With no children nothing can satisfy
/// the policy, so every check is [`AuthError::Forbidden`].
pub struct AnyPolicy<P: ?Sized> {
    policies: Vec<SharedPolicy<P>>,
}

impl<P: ?Sized> AnyPolicy<P> {
    pub fn new(policies: Vec<SharedPolicy<P>>) -> Self {
        Self { policies }
    }
}

impl<P: ?Sized> Policy<P> for AnyPolicy<P> {
    fn check(&self, principal: &P) -> Result<(), AuthError> {
        if self.policies.iter().any(|p| p.check(principal).is_ok()) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

impl<P: ?Sized> core::fmt::Debug for AnyPolicy<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnyPolicy")
            .field("policies", &self.policies.len())
            .finish()
    }
}
