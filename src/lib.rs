//! Canvas LMS client.
//!
//! [`CanvasClient`] wraps the REST API under `<host>/api/v1/` and the GraphQL
//! endpoint with typed resource facades. [`mcp::CanvasMcpServer`] exposes
//! course and assignment lookups as Model Context Protocol tools.

pub mod client;
pub mod config;
pub mod id;
pub mod logging;
pub mod mcp;
pub mod planner;
pub mod resources;

pub use client::{CanvasClient, CanvasError, ClientConfig, ErrorKind, Result};
pub use id::ItemId;
