use crate::policy::{Policy, PolicyError, SharedPolicy};
use crate::AuthError;

/// Conjunction: passes only if every child passes.
///
/// Children are evaluated in order and evaluation stops at the first
/// failure. Any child failure is reported as [`AuthError::Forbidden`].
pub struct CompositePolicy<P: ?Sized> {
    policies: Vec<SharedPolicy<P>>,
}

impl<P: ?Sized> CompositePolicy<P> {
    /// Fails with [`PolicyError::EmptyComposite`] when `policies` is empty.
    pub fn new(policies: Vec<SharedPolicy<P>>) -> Result<Self, PolicyError> {
        if policies.is_empty() {
            return Err(PolicyError::EmptyComposite);
        }
        Ok(Self { policies })
    }
}

impl<P: ?Sized> Policy<P> for CompositePolicy<P> {
    fn check(&self, principal: &P) -> Result<(), AuthError> {
        for policy in &self.policies {
            policy.check(principal).map_err(|_| AuthError::Forbidden)?;
        }
        Ok(())
    }
}

impl<P: ?Sized> core::fmt::Debug for CompositePolicy<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompositePolicy")
            .field("policies", &self.policies.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::policy::test_support::{verdicts, DummyPrincipal, FakePolicy};

    struct Unauthenticating;

    impl Policy<DummyPrincipal> for Unauthenticating {
        fn check(&self, _principal: &DummyPrincipal) -> Result<(), AuthError> {
            Err(AuthError::Unauthorized)
        }
    }

    #[test]
    fn composite_policy_table_cases() {
        let cases: [(&str, &[bool], Result<(), AuthError>); 3] = [
            ("all policy succeeds", &[true], Ok(())),
            ("one policy fails", &[true, false], Err(AuthError::Forbidden)),
            ("every policy succeeds", &[true, true, true], Ok(())),
        ];

        for (name, flags, expected) in cases {
            let policy = CompositePolicy::new(verdicts(flags)).unwrap();
            assert_eq!(policy.check(&DummyPrincipal), expected, "case: {name}");
        }
    }

    #[test]
    fn zero_children_is_a_construction_error() {
        assert!(matches!(
            CompositePolicy::<DummyPrincipal>::new(Vec::new()),
            Err(PolicyError::EmptyComposite)
        ));
    }

    #[test]
    fn stops_at_first_failure() {
        let allow = FakePolicy::allow();
        let deny = FakePolicy::deny();
        let never = FakePolicy::allow();
        let policy = CompositePolicy::<DummyPrincipal>::new(vec![allow.clone(), deny.clone(), never.clone()]).unwrap();

        assert_eq!(policy.check(&DummyPrincipal), Err(AuthError::Forbidden));
        assert_eq!((allow.calls(), deny.calls(), never.calls()), (1, 1, 0));
    }

    #[test]
    fn child_errors_are_normalized_to_forbidden() {
        let policy = CompositePolicy::<DummyPrincipal>::new(vec![Arc::new(Unauthenticating)]).unwrap();
        assert_eq!(policy.check(&DummyPrincipal), Err(AuthError::Forbidden));
    }
}
