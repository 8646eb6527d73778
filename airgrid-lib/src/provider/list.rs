//! Client for `/api/list` style endpoints

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::PageProvider;
use crate::error::ConfigError;
use crate::error::FetchError;
use crate::model::Record;
use crate::page::Page;

/// A provider backed by a JSON list endpoint.
///
/// Requests `GET {base}/api/list?limit=N&q=..&offset=..` and expects
/// `{"items": [...], "offset": "..." | null, "total": N}` where every item
/// is a flat record object carrying an `id`.
///
/// # Example
///
/// ```
/// use airgrid_lib::provider::ListClient;
///
/// let client = ListClient::new("http://localhost:3000").unwrap().with_limit(50);
/// ```
#[derive(Debug, Clone)]
pub struct ListClient {
    endpoint: Url,
    limit: usize,
    timeout: Option<Duration>,
    http_client: Client,
}

impl ListClient {
    /// Creates a client for the list endpoint under `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut endpoint =
            Url::parse(base_url).map_err(|e| ConfigError::invalid("list_url", e.to_string()))?;
        // push segments so a base path such as `/app` is kept
        endpoint
            .path_segments_mut()
            .map_err(|_| ConfigError::invalid("list_url", "not a base URL"))?
            .pop_if_empty()
            .extend(["api", "list"]);

        Ok(Self {
            endpoint,
            limit: 20,
            timeout: None,
            http_client: Client::new(),
        })
    }

    /// Sets how many items to request per page.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Builds the request URL for one page.
    pub fn page_url(&self, search: &str, token: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &self.limit.to_string());
            if !search.is_empty() {
                query.append_pair("q", search);
            }
            if let Some(token) = token {
                query.append_pair("offset", token);
            }
        }
        url
    }
}

/// Response body of the list endpoint.
#[derive(Debug, Deserialize)]
struct ListResponse {
    items: Vec<Record>,
    #[serde(default)]
    offset: Option<String>,
    #[serde(default)]
    total: Option<usize>,
}

#[async_trait]
impl PageProvider for ListClient {
    async fn fetch_page(&self, search: &str, token: Option<&str>) -> Result<Page, FetchError> {
        let url = self.page_url(search, token);
        log::debug!("GET {}", url);

        let mut request = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::server(status.as_u16(), body));
        }

        let list: ListResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::decode_with_body(e.to_string(), body))?;

        let mut page = Page::new(list.items).with_continuation_opt(list.offset);
        if let Some(total) = list.total {
            page = page.with_total(total);
        }
        Ok(page)
    }
}
