//! labreg-server: HTTP front end over the researcher/publication schema.
//!
//! All real rule enforcement (the business-hours write window, audit
//! history, the top-researchers aggregation) lives in PostgreSQL. This crate
//! contributes the gateway that issues parameterized SQL, the classifier
//! that tells a trigger rejection apart from any other write failure, and
//! thin handlers composing the two.

pub mod db;
pub mod http;
pub mod models;

pub use db::pool::{create_pool, create_pool_with_options};
pub use db::schema::run_migrations;
pub use db::store::{PgStore, Store};
pub use http::{run_server, ServerConfig};
