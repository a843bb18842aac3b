//! Greeting handlers behind the basic and token pipelines.

use axum::extract::Extension;

use b16_auth::{BasicPrincipal, TokenPrincipal};

pub async fn basic(Extension(principal): Extension<BasicPrincipal>) -> String {
    format!("Hello {}\n", principal.username())
}

pub async fn token(Extension(principal): Extension<TokenPrincipal>) -> String {
    format!("Hello {}\n", principal.email())
}
