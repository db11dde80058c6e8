//! Link-header pagination
//!
//! Canvas advertises further pages through `Link: <url>; rel="next"`. The
//! paginator turns that chain into one lazy stream: a page is only requested
//! once the consumer has drained the previous one.

use std::collections::HashMap;

use futures::{StreamExt, TryStreamExt, stream::{self, BoxStream}};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{
    api::{ApiResponse, CanvasApi, Params},
    error::{CanvasError, Result},
};

/// Path segment that prefixes every REST endpoint
pub const API_PREFIX: &str = "/api/v1/";

/// Lazily fetched sequence of collection items
pub type ItemStream<'a> = BoxStream<'a, Result<Value>>;

/// One page of a collection and the endpoint of the page after it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    /// Endpoint relative to `api/v1/`, already carrying its query string
    pub next: Option<String>,
}

impl Page {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn from_response(response: ApiResponse) -> Result<Self> {
        match response.body {
            Some(Value::Array(items)) => {
                let next = response
                    .links
                    .get("next")
                    .map(|url| next_endpoint(url))
                    .transpose()?;
                Ok(Self { items, next })
            },
            // Endpoints that do not paginate answer with a single object
            Some(other) => Ok(Self { items: vec![other], next: None }),
            None => Ok(Self::default()),
        }
    }
}

struct Cursor {
    endpoint: String,
    params: Params,
}

impl CanvasApi {
    /// Fetch exactly one page of a collection
    #[instrument(skip(self, params), fields(endpoint = %endpoint))]
    pub async fn get_page(&self, endpoint: &str, params: &[(String, String)]) -> Result<Page> {
        let response = self.send(Method::GET, endpoint, params, None).await?;
        let page = Page::from_response(response)?;
        debug!(items = page.items.len(), has_next = page.has_next(), "Fetched page");
        Ok(page)
    }

    /// Stream every item of a collection, following `next` links.
    ///
    /// `per_page` defaults to the configured page size. Pages after the first
    /// are requested with the server-provided URL only, since it already
    /// encodes the caller's parameters.
    pub fn paginate(&self, endpoint: impl Into<String>, params: Params) -> ItemStream<'_> {
        let params = with_default_per_page(params, self.config().request.per_page);
        let start = Cursor { endpoint: endpoint.into(), params };

        stream::try_unfold(Some(start), move |cursor| async move {
            let Some(cursor) = cursor else {
                return Ok(None);
            };
            let page = self.get_page(&cursor.endpoint, &cursor.params).await?;
            let next = page
                .next
                .map(|endpoint| Cursor { endpoint, params: Params::new() });
            Ok::<_, CanvasError>(Some((page.items, next)))
        })
        .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
        .try_flatten()
        .boxed()
    }

    /// Drain [`paginate`](Self::paginate) into a vector
    pub async fn paginate_all(
        &self,
        endpoint: impl Into<String>,
        params: Params,
    ) -> Result<Vec<Value>> {
        self.paginate(endpoint, params).try_collect().await
    }
}

fn with_default_per_page(mut params: Params, per_page: u32) -> Params {
    if !params.iter().any(|(key, _)| key == "per_page") {
        params.push(("per_page".into(), per_page.to_string()));
    }
    params
}

/// Parse an RFC 8288 `Link` header into `rel -> url`
pub fn parse_link_header(value: &str) -> HashMap<String, String> {
    value
        .split(',')
        .filter_map(|part| {
            let mut segments = part.split(';');
            let url = segments
                .next()?
                .trim()
                .strip_prefix('<')?
                .strip_suffix('>')?;
            let rel = segments.find_map(|segment| segment.trim().strip_prefix("rel="))?;
            Some((rel.trim_matches('"').to_string(), url.to_string()))
        })
        .collect()
}

/// Translate an absolute `next` URL back into an endpoint relative to `api/v1/`
pub fn next_endpoint(url: &str) -> Result<String> {
    url.split_once(API_PREFIX)
        .map(|(_, endpoint)| endpoint.to_string())
        .ok_or_else(|| CanvasError::invalid_url(url))
}
