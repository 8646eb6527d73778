//! In-memory page provider

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::PageProvider;
use crate::error::FetchError;
use crate::model::Record;
use crate::page::Page;
use crate::table::natural_cmp;

/// Largest page the memory provider hands out.
pub const MEMORY_MAX_PAGE_SIZE: usize = 50;

/// A provider serving a fixed set of records.
///
/// Records whose `match_field` contains the search text (case-insensitive)
/// are returned sorted naturally by that field. The continuation token is
/// the base64 encoding of the next start index, so it is opaque to callers
/// but stable across calls.
///
/// # Example
///
/// ```
/// use airgrid_lib::model::Record;
/// use airgrid_lib::provider::MemoryProvider;
///
/// let provider = MemoryProvider::new(
///     vec![Record::new("a").set("name", "Alpha")],
///     "name",
/// )
/// .with_page_size(10);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    records: Vec<Record>,
    match_field: String,
    page_size: usize,
}

impl MemoryProvider {
    /// Creates a provider over `records`, searching and ordering by `match_field`.
    pub fn new(records: Vec<Record>, match_field: impl Into<String>) -> Self {
        Self {
            records,
            match_field: match_field.into(),
            page_size: 20,
        }
    }

    /// Sets the page size, clamped to `1..=50`.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MEMORY_MAX_PAGE_SIZE);
        self
    }

    /// Returns the configured page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn matching(&self, search: &str) -> Vec<&Record> {
        let needle = search.trim().to_lowercase();
        let mut rows: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| needle.is_empty() || r.text(&self.match_field).to_lowercase().contains(&needle))
            .collect();
        rows.sort_by(|a, b| natural_cmp(&a.text(&self.match_field), &b.text(&self.match_field)));
        rows
    }
}

/// Encodes a start index as an opaque continuation token.
pub fn encode_cursor(start: usize) -> String {
    STANDARD.encode(start.to_string())
}

/// Decodes a continuation token produced by [`encode_cursor`].
pub fn decode_cursor(token: &str) -> Option<usize> {
    let bytes = STANDARD.decode(token).ok()?;
    std::str::from_utf8(&bytes).ok()?.parse().ok()
}

#[async_trait]
impl PageProvider for MemoryProvider {
    async fn fetch_page(&self, search: &str, token: Option<&str>) -> Result<Page, FetchError> {
        let start = match token {
            None => 0,
            Some(token) => decode_cursor(token)
                .ok_or_else(|| FetchError::server(400, format!("invalid offset: {token}")))?,
        };

        let rows = self.matching(search);
        let total = rows.len();
        let slice: Vec<Record> = rows
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        let next = start + slice.len();

        log::debug!(
            "memory provider served {} of {} rows for {:?} from {}",
            slice.len(),
            total,
            search,
            start
        );

        let page = Page::new(slice).with_total(total);
        if next < total {
            Ok(page.with_continuation(encode_cursor(next)))
        } else {
            Ok(page)
        }
    }
}
