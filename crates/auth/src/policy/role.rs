use crate::policy::{Policy, PolicyError};
use crate::{AuthError, HasRoles, Role};

/// Requires the principal to hold every configured role.
///
/// Membership uses exact string equality. At least one role must be
/// configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireRolePolicy {
    roles: Vec<Role>,
}

impl RequireRolePolicy {
    pub fn new(roles: impl IntoIterator<Item = impl Into<Role>>) -> Result<Self, PolicyError> {
        let roles: Vec<Role> = roles.into_iter().map(Into::into).collect();
        if roles.is_empty() {
            return Err(PolicyError::EmptyRoleSet);
        }
        Ok(Self { roles })
    }
}

impl<P: HasRoles + ?Sized> Policy<P> for RequireRolePolicy {
    fn check(&self, principal: &P) -> Result<(), AuthError> {
        if self.roles.iter().all(|required| principal.has_role(required.as_str())) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}
