use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use b16_auth::{Role, TokenPrincipal};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub email: String,
    pub roles: Vec<Role>,
}

/// Echo the authenticated token principal.
pub async fn whoami(Extension(principal): Extension<TokenPrincipal>) -> Json<WhoAmI> {
    let claims = principal.into_claims();
    Json(WhoAmI {
        email: claims.email,
        roles: claims.roles,
    })
}
