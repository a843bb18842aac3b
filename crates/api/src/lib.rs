//! HTTP API: server wiring, the authentication/authorization pipeline, and
//! the demo routes it guards.

pub mod app;
pub mod authz;
pub mod config;
pub mod middleware;
