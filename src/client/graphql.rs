//! Canvas GraphQL gateway

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::{debug, instrument, warn};
use url::Url;

use super::{
    api::{CanvasApi, render_errors},
    error::{CanvasError, Result},
};

/// Executes operations against `<host>/api/graphql`.
///
/// GraphQL reports failures inside a 200 response, so every body is checked
/// for an `errors` array independently of the HTTP status.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    api: Arc<CanvasApi>,
    endpoint: Url,
}

impl GraphqlClient {
    pub fn new(api: Arc<CanvasApi>) -> Result<Self> {
        let endpoint = api.config().graphql_url()?;
        Ok(Self { api, endpoint })
    }

    /// Run a query and return its `data` field
    #[instrument(skip(self, query, variables))]
    pub async fn query(&self, query: &str, variables: Option<Map<String, Value>>) -> Result<Value> {
        let payload = json!({
            "query": query,
            "variables": variables.unwrap_or_default(),
        });

        let response = self
            .api
            .authenticated_request(Method::POST, self.endpoint.clone())
            .json(&payload)
            .send()
            .await?;
        let response = self.api.handle_response(response).await?;

        let mut body = match response.body {
            Some(Value::Object(body)) => body,
            Some(other) => {
                return Err(CanvasError::api(
                    response.status,
                    "GraphQL response was not a JSON object",
                    other.to_string(),
                ));
            },
            None => Map::new(),
        };

        if let Some(errors) = body.get("errors")
            && has_errors(errors)
        {
            warn!(status = response.status, "GraphQL query returned errors");
            return Err(CanvasError::api(
                response.status,
                render_errors(errors),
                Value::Object(body.clone()).to_string(),
            ));
        }

        let data = body.remove("data").unwrap_or_else(|| Value::Object(Map::new()));
        debug!("GraphQL query succeeded");
        Ok(data)
    }

    /// Run a query and deserialize its `data` field
    pub async fn query_as<T>(&self, query: &str, variables: Option<Map<String, Value>>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let data = self.query(query, variables).await?;
        serde_json::from_value(data)
            .map_err(|e| CanvasError::json_parse("api/graphql", "Unexpected GraphQL data shape", e))
    }
}

fn has_errors(errors: &Value) -> bool {
    match errors {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}
