//! Airtable list client

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::AirtableConfig;
use super::search_formula;
use crate::error::ConfigError;
use crate::error::Error;
use crate::error::FetchError;
use crate::model::Record;
use crate::model::Value;
use crate::page::Page;
use crate::provider::PageProvider;

/// Client that lists rows of one Airtable table as table pages.
///
/// This client is cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use airgrid_lib::provider::airtable::{AirtableClient, AirtableConfig};
///
/// let config = AirtableConfig::from_env()?;
/// let client = AirtableClient::builder()
///     .config(config)
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let page = client.fetch_page("gpt", None).await?;
/// ```
#[derive(Clone)]
pub struct AirtableClient {
    inner: Arc<AirtableClientInner>,
}

struct AirtableClientInner {
    config: AirtableConfig,
    table_url: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

impl AirtableClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> AirtableClientBuilder<Missing> {
        AirtableClientBuilder::new()
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &AirtableConfig {
        &self.inner.config
    }

    /// Builds the list URL for one page.
    pub fn page_url(&self, search: &str, token: Option<&str>) -> Url {
        let config = &self.inner.config;
        let mut url = self.inner.table_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &config.page_size().to_string());
            if let Some(view) = config.view() {
                query.append_pair("view", view);
            }
            if let Some(formula) = search_formula(search, config.search_fields()) {
                query.append_pair("filterByFormula", &formula);
            }
            if let Some(token) = token {
                query.append_pair("offset", token);
            }
        }
        url
    }
}

/// `{api_url}/{base_id}/{table}` with each segment percent-encoded.
fn table_url(config: &AirtableConfig) -> Result<Url, ConfigError> {
    let mut url = config.api_url().clone();
    url.path_segments_mut()
        .map_err(|_| ConfigError::invalid("api_url", "not a base URL"))?
        .pop_if_empty()
        .push(config.base_id())
        .push(config.table());
    Ok(url)
}

/// Response body of `GET /v0/{base}/{table}`.
#[derive(Debug, Deserialize)]
struct ListRecordsResponse {
    #[serde(default)]
    records: Vec<AirtableRecord>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirtableRecord {
    id: String,
    #[serde(rename = "createdTime", default)]
    created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    fields: HashMap<String, Value>,
}

impl From<AirtableRecord> for Record {
    fn from(rec: AirtableRecord) -> Self {
        Record::from_parts(rec.id, rec.created_time, rec.fields)
    }
}

impl ListRecordsResponse {
    fn into_page(self) -> Page {
        let records = self.records.into_iter().map(Record::from).collect();
        Page::new(records).with_continuation_opt(self.offset)
    }
}

#[async_trait]
impl PageProvider for AirtableClient {
    async fn fetch_page(&self, search: &str, token: Option<&str>) -> Result<Page, FetchError> {
        let url = self.page_url(search, token);
        log::debug!(
            "listing {}/{} search={:?} offset={:?}",
            self.inner.config.base_id(),
            self.inner.config.table(),
            search,
            token
        );

        let mut request = self
            .inner
            .http_client
            .get(url)
            .bearer_auth(self.inner.config.api_key());
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::warn!("Airtable returned HTTP {}", status.as_u16());
            return Err(FetchError::server(status.as_u16(), body));
        }

        let list: ListRecordsResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::decode_with_body(e.to_string(), body))?;
        Ok(list.into_page())
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`AirtableClient`].
///
/// Uses the typestate pattern so `build` is only available once a
/// configuration has been supplied.
pub struct AirtableClientBuilder<C> {
    config: C,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl AirtableClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the table configuration.
    pub fn config(self, config: AirtableConfig) -> AirtableClientBuilder<Set<AirtableConfig>> {
        AirtableClientBuilder {
            config: Set(config),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for AirtableClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> AirtableClientBuilder<C> {
    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// Ignored when a custom HTTP client is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl AirtableClientBuilder<Set<AirtableConfig>> {
    /// Builds the [`AirtableClient`].
    pub fn build(self) -> Result<AirtableClient, Error> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        let config = self.config.0;
        let table_url = table_url(&config)?;

        Ok(AirtableClient {
            inner: Arc::new(AirtableClientInner {
                config,
                table_url,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
