//! Vendhub HTTP API Service.
//!
//! This crate provides the HTTP API for the vendhub service:
//!
//! - Machine creation, listing, detail reads, and deletion
//! - Inventory restocking (full reconciliation against a desired set)
//!
//! All storage semantics live in `vendhub-store`; this layer only parses
//! requests, maps store errors to status codes, and shapes responses.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers without awaits stay async for consistency

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
