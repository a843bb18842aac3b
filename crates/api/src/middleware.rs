//! Request pipeline stages.
//!
//! `authenticate` resolves a principal through a [`CredentialManager`] and
//! stores it in the request extensions. `authorize` reads that principal back
//! and checks it against a [`Policy`]. Each stage is an ordinary
//! `from_fn_with_state` middleware, so routes can attach either one alone or
//! both in order (authenticate outermost).

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use b16_auth::{AuthError, CredentialManager, Principal, SharedPolicy};

use crate::app::errors::{rejection, Stage};

pub async fn authenticate<M>(
    State(manager): State<Arc<M>>,
    mut req: Request,
    next: Next,
) -> Response
where
    M: CredentialManager,
{
    let outcome = manager.authenticate(req.headers());
    match outcome {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(
                stage = Stage::Authentication.as_str(),
                kind = err.kind(),
                path = %req.uri().path(),
                "request rejected"
            );
            rejection(Stage::Authentication, err)
        }
    }
}

pub async fn authorize<P>(
    State(policy): State<SharedPolicy<P>>,
    req: Request,
    next: Next,
) -> Response
where
    P: Principal,
{
    let verdict = match req.extensions().get::<P>() {
        Some(principal) => policy
            .check(principal)
            .map_err(|err| (Stage::Authorization, err)),
        // Route wired without an authentication stage in front.
        None => {
            tracing::warn!(path = %req.uri().path(), "authorization reached without a principal");
            Err((Stage::Authentication, AuthError::Unauthorized))
        }
    };

    match verdict {
        Ok(()) => next.run(req).await,
        Err((stage, err)) => {
            tracing::debug!(
                stage = stage.as_str(),
                kind = err.kind(),
                path = %req.uri().path(),
                "request rejected"
            );
            rejection(stage, err)
        }
    }
}
