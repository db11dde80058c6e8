//! Canvas client modules
//!
//! Transport, pagination and the GraphQL gateway live here; the resource
//! facades built on top of them are in [`crate::resources`].

pub mod api;
pub mod canvas;
pub mod config;
pub mod error;
pub mod graphql;
pub mod pagination;

// Re-export main types for convenience
pub use api::{ApiResponse, Body, CanvasApi, Params};
pub use canvas::CanvasClient;
pub use config::{ClientConfig, DebugConfig, RequestConfig};
pub use error::{CanvasError, ErrorKind, Result};
pub use graphql::GraphqlClient;
pub use pagination::{ItemStream, Page};
