//! Credential managers: one per authentication scheme.
//!
//! A manager inspects the request headers and either produces a verified
//! [`Principal`] or an [`AuthError`]. Managers have no side effects; turning
//! a failure into a response is the caller's job.

use http::HeaderMap;

use crate::{AuthError, Principal};

pub mod basic;
pub mod token;

pub use basic::{BasicCredentialManager, CredentialTable};
pub use token::TokenCredentialManager;

/// Authenticates a request under one specific scheme.
pub trait CredentialManager: Send + Sync + 'static {
    type Principal: Principal;

    fn authenticate(&self, headers: &HeaderMap) -> Result<Self::Principal, AuthError>;
}
