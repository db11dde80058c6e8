//! Composition root tying transport, GraphQL and resource facades together

use std::sync::Arc;

use tracing::info;

use super::{
    api::CanvasApi,
    config::ClientConfig,
    error::Result,
    graphql::GraphqlClient,
};
use crate::resources::{Assignments, Courses, Files, Modules, Users};

/// Canvas LMS client.
///
/// Holds the credentials for one Canvas instance. Nothing is mutated after
/// construction, so the client can be shared freely behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CanvasClient {
    api: Arc<CanvasApi>,
    pub graphql: GraphqlClient,
    pub courses: Courses,
    pub users: Users,
    pub assignments: Assignments,
    pub modules: Modules,
    pub files: Files,
}

impl CanvasClient {
    /// Build a client from explicit credentials, falling back to
    /// `CANVAS_TOKEN` / `CANVAS_HOST` for whichever is `None`.
    pub fn new(token: Option<String>, host: Option<String>) -> Result<Self> {
        Self::from_config(ClientConfig::resolve(token, host)?)
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let api = Arc::new(CanvasApi::new(config)?);
        info!(host = %api.config().base_url, "Canvas client ready");

        Ok(Self {
            graphql: GraphqlClient::new(api.clone())?,
            courses: Courses::new(api.clone()),
            users: Users::new(api.clone()),
            assignments: Assignments::new(api.clone()),
            modules: Modules::new(api.clone()),
            files: Files::new(api.clone()),
            api,
        })
    }

    /// The underlying transport, for endpoints without a facade
    pub fn api(&self) -> &CanvasApi {
        &self.api
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }
}
