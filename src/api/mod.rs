//! HTTP API for the dashboard front-end.
//!
//! Routes are nested under `/api/` and return JSON views built from
//! `CoreState`. Backend calls run on the blocking pool; handlers never hold a
//! session lock across them.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ApiSession};
pub use types::ApiContext;
