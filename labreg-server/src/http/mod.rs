//! HTTP layer: server setup, error mapping, and route handlers.

pub mod error;
pub mod routes;
pub mod server;

pub use server::{build_router, run_server, AppState, ServerConfig};
