#![allow(dead_code)]

use std::sync::Arc;

use canvas_lms::{CanvasClient, ClientConfig};
use wiremock::{MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";

pub fn client(server: &MockServer) -> CanvasClient {
    CanvasClient::from_config(ClientConfig::new(server.uri(), TOKEN))
        .expect("mock server config is valid")
}

pub fn shared_client(server: &MockServer) -> Arc<CanvasClient> {
    Arc::new(client(server))
}

/// `Link` header pointing at the next page of `endpoint`
pub fn next_link(server: &MockServer, endpoint: &str, page: u32) -> String {
    format!(
        "<{}/api/v1/{endpoint}?page={page}&per_page=100>; rel=\"next\"",
        server.uri()
    )
}

pub fn json_page(body: serde_json::Value, next: Option<String>) -> ResponseTemplate {
    let response = ResponseTemplate::new(200).set_body_json(body);
    match next {
        Some(link) => response.insert_header("Link", link.as_str()),
        None => response,
    }
}
