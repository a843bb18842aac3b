use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use b16_auth::AuthError;

/// Pipeline stage that rejected a request. The stage, not the error kind,
/// decides the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authentication,
    Authorization,
}

impl Stage {
    pub fn status(self) -> StatusCode {
        match self {
            Stage::Authentication => StatusCode::UNAUTHORIZED,
            Stage::Authorization => StatusCode::FORBIDDEN,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Authentication => "authentication",
            Stage::Authorization => "authorization",
        }
    }
}

/// Plain-text rejection whose body is the error message.
pub fn rejection(stage: Stage, err: AuthError) -> Response {
    (stage.status(), err.to_string()).into_response()
}
