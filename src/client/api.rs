//! Core HTTP transport for the Canvas REST API

use std::collections::HashMap;

use chrono::Local;
use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, LINK},
    multipart,
};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{
    config::ClientConfig,
    error::{CanvasError, Result},
    pagination::parse_link_header,
};

/// Query parameters, in wire order. Repeated keys are allowed (`include[]`).
pub type Params = Vec<(String, String)>;

/// Request body variants accepted by the API host
#[derive(Debug)]
pub enum Body {
    Json(Value),
    Form(Vec<(String, String)>),
    /// File payloads; the boundary header is set by reqwest
    Multipart(multipart::Form),
}

/// A decoded response plus the metadata the paginator needs
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` when the server sent an empty body
    pub body: Option<Value>,
    /// `rel` -> absolute URL, from the `Link` header
    pub links: HashMap<String, String>,
}

/// Authenticated HTTP transport bound to one Canvas instance
#[derive(Debug)]
pub struct CanvasApi {
    client: Client,
    config: ClientConfig,
    api_root: Url,
}

impl CanvasApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(config.request.user_agent.as_str())
            .build()
            .map_err(CanvasError::Http)?;
        let api_root = config.api_root()?;

        Ok(Self { client, config, api_root })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for an endpoint relative to `api/v1/`
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.api_root
            .join(endpoint.trim_start_matches('/'))
            .map_err(|_| CanvasError::invalid_url(endpoint))
    }

    /// Issue one request and return the decoded body (`None` for empty bodies)
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(String, String)],
        body: Option<Body>,
    ) -> Result<Option<Value>> {
        Ok(self.send(method, endpoint, params, body).await?.body)
    }

    pub async fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<Option<Value>> {
        self.request(Method::GET, endpoint, params, None).await
    }

    pub async fn post(&self, endpoint: &str, body: Option<Body>) -> Result<Option<Value>> {
        self.request(Method::POST, endpoint, &[], body).await
    }

    pub async fn put(&self, endpoint: &str, body: Option<Body>) -> Result<Option<Value>> {
        self.request(Method::PUT, endpoint, &[], body).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Option<Value>> {
        self.request(Method::DELETE, endpoint, &[], None).await
    }

    /// Like [`request`](Self::request) but keeps status and link metadata
    #[instrument(skip(self, params, body), fields(method = %method, endpoint = %endpoint))]
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(String, String)],
        body: Option<Body>,
    ) -> Result<ApiResponse> {
        let url = self.endpoint_url(endpoint)?;
        let mut builder = self.authenticated_request(method, url);

        if !params.is_empty() {
            builder = builder.query(params);
        }

        builder = match body {
            Some(Body::Json(json)) => builder.json(&json),
            Some(Body::Form(fields)) => builder.form(&fields),
            Some(Body::Multipart(form)) => builder.multipart(form),
            None => builder,
        };

        let response = builder.send().await?;
        self.handle_response(response).await
    }

    /// Create authenticated request builder for an absolute URL
    pub(crate) fn authenticated_request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.token))
            .header(ACCEPT, "application/json")
    }

    /// Request builder without credentials, for pre-signed upload URLs
    pub(crate) fn anonymous_request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let url = Url::parse(url).map_err(|_| CanvasError::invalid_url(url))?;
        Ok(self.client.request(method, url))
    }

    /// Decode a response, mapping non-2xx statuses to [`CanvasError::Api`]
    pub(crate) async fn handle_response(&self, response: Response) -> Result<ApiResponse> {
        let url = response.url().to_string();
        let url_path = response.url().path().to_string();
        let status = response.status();
        let links = response
            .headers()
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(parse_link_header)
            .collect::<HashMap<_, _>>();
        let text = response.text().await?;

        if self.config.debug.log_responses {
            self.log_response_to_file(&url_path, &text);
        }

        if !status.is_success() {
            warn!(status = status.as_u16(), url = %url, "Canvas request failed");
            return Err(CanvasError::api(
                status.as_u16(),
                error_message(status, &url, &text),
                text,
            ));
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            let value = serde_json::from_str(&text).map_err(|e| {
                CanvasError::json_parse(url_path.as_str(), "Failed to parse response", e)
            })?;
            Some(value)
        };

        debug!(
            status = status.as_u16(),
            has_body = body.is_some(),
            has_next = links.contains_key("next"),
            "Canvas response received"
        );

        Ok(ApiResponse { status: status.as_u16(), body, links })
    }

    /// Log HTTP response to file for debugging
    fn log_response_to_file(&self, path: &str, body: &str) {
        if let Some(log_dir) = &self.config.debug.log_directory {
            if !log_dir.exists()
                && let Err(e) = std::fs::create_dir_all(log_dir)
            {
                warn!("Failed to create log directory: {}", e);
                return;
            }

            let filename = format!(
                "{}_{}.json",
                Local::now().format("%Y-%m-%d_%H-%M-%S%.3f"),
                path.replace('/', "_")
            );

            let log_path = log_dir.join(filename);

            if let Err(e) = std::fs::write(&log_path, body) {
                warn!("Failed to write response log to {:?}: {}", log_path, e);
            } else {
                debug!("Response logged to {:?}", log_path);
            }
        }
    }
}

/// The server's `errors` field when the body is JSON carrying one, the raw
/// body otherwise, and a status line when there is nothing better.
pub(crate) fn error_message(status: StatusCode, url: &str, body: &str) -> String {
    let status_line = format!(
        "{} {} Error: {} for url: {}",
        status.as_u16(),
        if status.is_server_error() { "Server" } else { "Client" },
        status.canonical_reason().unwrap_or("Unknown"),
        url
    );

    if body.trim().is_empty() {
        return status_line;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("errors") {
            Some(errors) => render_errors(errors),
            None => status_line,
        },
        Ok(_) => status_line,
        Err(_) => body.to_string(),
    }
}

/// Strings pass through verbatim, anything else is rendered as compact JSON
pub(crate) fn render_errors(errors: &Value) -> String {
    match errors {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
