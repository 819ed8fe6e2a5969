//! HTTP API: server wiring, bearer middleware, and user administration routes.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
