//! HTTP application wiring (axum router + credential/policy wiring).
//!
//! - `routes/`: handlers, one file per area
//! - `errors.rs`: rejection responses for the auth pipeline

use std::sync::Arc;

use anyhow::Context;
use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower::ServiceBuilder;

use b16_auth::{
    BasicCredentialManager, BcryptHasher, CredentialTable, JwtIssuer, SharedPolicy,
    TokenCredentialManager, TokenIssuer, TokenPrincipal,
};

use crate::config::{AppConfig, BasicAuthSettings};
use crate::{authz, middleware};

pub mod errors;
pub mod routes;

/// Credential managers and policies the routes are guarded by.
#[derive(Clone)]
pub struct AuthComponents {
    pub basic: Arc<BasicCredentialManager>,
    pub token: Arc<TokenCredentialManager>,
    pub token_route_policy: SharedPolicy<TokenPrincipal>,
}

impl AuthComponents {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let issuer = JwtIssuer::new(config.issuer_config()).context("invalid token issuer configuration")?;
        let issuer: Arc<dyn TokenIssuer> = Arc::new(issuer);

        Ok(Self {
            basic: Arc::new(basic_manager(&config.basic_auth)?),
            token: Arc::new(TokenCredentialManager::new(issuer)),
            token_route_policy: authz::token_route_policy().context("invalid route policy")?,
        })
    }
}

fn basic_manager(settings: &BasicAuthSettings) -> anyhow::Result<BasicCredentialManager> {
    let table = CredentialTable::new(settings.users.clone());
    if settings.hashed {
        BasicCredentialManager::hashed(table, Arc::new(BcryptHasher::default()))
            .context("failed to prepare hashed basic auth")
    } else {
        Ok(BasicCredentialManager::new(table))
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let auth = AuthComponents::from_config(config)?;
    tracing::info!(
        basic_users = config.basic_auth.users.len(),
        hashed = config.basic_auth.hashed,
        issuer = %config.token.issuer,
        "auth pipeline configured"
    );
    Ok(router(auth))
}

pub fn router(auth: AuthComponents) -> Router {
    let basic = Router::new()
        .route("/basic-auth", get(routes::hello::basic))
        .route_layer(from_fn_with_state(
            auth.basic,
            middleware::authenticate::<BasicCredentialManager>,
        ));

    // Authentication runs first, then the policy check.
    let token = Router::new()
        .route("/token-auth", get(routes::hello::token))
        .route_layer(
            ServiceBuilder::new()
                .layer(from_fn_with_state(
                    auth.token.clone(),
                    middleware::authenticate::<TokenCredentialManager>,
                ))
                .layer(from_fn_with_state(
                    auth.token_route_policy,
                    middleware::authorize::<TokenPrincipal>,
                )),
        );

    let identity = Router::new()
        .route("/whoami", get(routes::system::whoami))
        .route_layer(from_fn_with_state(
            auth.token,
            middleware::authenticate::<TokenCredentialManager>,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(basic)
        .merge(token)
        .merge(identity)
}
