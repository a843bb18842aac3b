//! `b16-auth`: pluggable authentication/authorization core.
//!
//! This crate is independent of any web framework and of storage: credential
//! managers read plain [`http::HeaderMap`]s, the token issuer works on
//! strings, and policies are pure predicates over principals.

pub mod claims;
pub mod credentials;
pub mod error;
pub mod password;
pub mod policy;
pub mod principal;
pub mod roles;
pub mod token;

pub use claims::{validate_registered, Claims, RegisteredClaims, TokenValidationError};
pub use credentials::{BasicCredentialManager, CredentialManager, CredentialTable, TokenCredentialManager};
pub use error::AuthError;
pub use password::{BcryptHasher, PasswordError, PasswordHasher};
pub use policy::{AnyPolicy, CompositePolicy, Policy, PolicyError, RequireRolePolicy, SharedPolicy};
pub use principal::{BasicPrincipal, HasRoles, Principal, TokenPrincipal};
pub use roles::Role;
pub use token::{JwtIssuer, JwtIssuerConfig, TokenError, TokenIssuer};
