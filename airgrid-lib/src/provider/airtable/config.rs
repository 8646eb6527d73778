//! Airtable connection configuration

use std::fmt;

use url::Url;

use crate::error::ConfigError;

/// Default Airtable REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// Largest `pageSize` Airtable accepts.
pub const AIRTABLE_MAX_PAGE_SIZE: usize = 100;

/// Fields searched when none are configured.
pub const DEFAULT_SEARCH_FIELDS: [&str; 3] = ["Name", "Category", "Description"];

/// Environment variables read by [`AirtableConfig::from_env`].
pub mod env {
    pub const API_KEY: &str = "AIRTABLE_API_KEY";
    pub const BASE_ID: &str = "AIRTABLE_BASE_ID";
    pub const TABLE: &str = "AIRTABLE_TABLE_NAME";
    pub const VIEW: &str = "AIRTABLE_VIEW";
}

/// Everything needed to list rows from one Airtable table.
///
/// Built explicitly through [`AirtableConfig::builder`]; building fails with
/// [`ConfigError::Missing`] naming every required option that was not set.
/// The API key is never printed by `Debug`.
///
/// # Example
///
/// ```
/// use airgrid_lib::provider::airtable::AirtableConfig;
///
/// let config = AirtableConfig::builder()
///     .api_key("pat123")
///     .base_id("appXYZ")
///     .table("APIs")
///     .view("Grid view")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.page_size(), 20);
///
/// let err = AirtableConfig::builder().table("APIs").build().unwrap_err();
/// assert_eq!(err.missing_options(), ["api_key", "base_id"]);
/// ```
#[derive(Clone)]
pub struct AirtableConfig {
    api_key: String,
    base_id: String,
    table: String,
    view: Option<String>,
    page_size: usize,
    search_fields: Vec<String>,
    api_url: Url,
}

impl AirtableConfig {
    /// Creates a new builder with default optional settings.
    pub fn builder() -> AirtableConfigBuilder {
        AirtableConfigBuilder::default()
    }

    /// Loads the configuration from `AIRTABLE_*` environment variables.
    ///
    /// Only reads the process environment; call `dotenvy::dotenv()` first
    /// if values live in a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        AirtableConfigBuilder::from_lookup(lookup).build()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// Table name or table id (`tbl...`).
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn view(&self) -> Option<&str> {
        self.view.as_deref()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }
}

impl fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("api_key", &"<redacted>")
            .field("base_id", &self.base_id)
            .field("table", &self.table)
            .field("view", &self.view)
            .field("page_size", &self.page_size)
            .field("search_fields", &self.search_fields)
            .field("api_url", &self.api_url.as_str())
            .finish()
    }
}

/// Builder for [`AirtableConfig`].
#[derive(Default)]
pub struct AirtableConfigBuilder {
    api_key: Option<String>,
    base_id: Option<String>,
    table: Option<String>,
    view: Option<String>,
    page_size: Option<usize>,
    search_fields: Option<Vec<String>>,
    api_url: Option<String>,
}

impl AirtableConfigBuilder {
    /// Starts a builder pre-filled from `AIRTABLE_*` environment variables.
    ///
    /// Unlike [`AirtableConfig::from_env`], more options can be set before
    /// building.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Starts a builder pre-filled through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup(env::API_KEY),
            base_id: lookup(env::BASE_ID),
            table: lookup(env::TABLE),
            view: lookup(env::VIEW),
            ..Self::default()
        }
    }

    /// Sets the personal access token sent as a bearer token.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base id (`app...`).
    pub fn base_id(mut self, base_id: impl Into<String>) -> Self {
        self.base_id = Some(base_id.into());
        self
    }

    /// Sets the table name or id.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Restricts listing to a named view.
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Sets the requested page size, clamped to `1..=100`.
    ///
    /// Defaults to 20.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets the fields searched by `filterByFormula`.
    ///
    /// Defaults to `Name`, `Category` and `Description`.
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Overrides the API endpoint (for proxies and tests).
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Validates the options and builds the configuration.
    pub fn build(self) -> Result<AirtableConfig, ConfigError> {
        let api_key = non_blank(self.api_key);
        let base_id = non_blank(self.base_id);
        let table = non_blank(self.table);

        let mut missing = Vec::new();
        if api_key.is_none() {
            missing.push("api_key");
        }
        if base_id.is_none() {
            missing.push("base_id");
        }
        if table.is_none() {
            missing.push("table");
        }

        let (Some(api_key), Some(base_id), Some(table)) = (api_key, base_id, table) else {
            return Err(ConfigError::Missing { options: missing });
        };

        let api_url = self.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        let api_url = Url::parse(api_url).map_err(|e| ConfigError::invalid("api_url", e.to_string()))?;
        if api_url.cannot_be_a_base() {
            return Err(ConfigError::invalid("api_url", "not a base URL"));
        }

        let search_fields = self
            .search_fields
            .unwrap_or_else(|| DEFAULT_SEARCH_FIELDS.iter().map(|f| f.to_string()).collect());

        Ok(AirtableConfig {
            api_key,
            base_id,
            table,
            view: non_blank(self.view),
            page_size: self.page_size.unwrap_or(20).clamp(1, AIRTABLE_MAX_PAGE_SIZE),
            search_fields,
            api_url,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
