//! Page type for paginated provider results.

use crate::model::Record;

/// One batch of records returned by a single fetch.
///
/// Records keep the order the provider delivered them in. The continuation
/// token is opaque; `None` means there are no further pages. The total is
/// advisory and may be stale.
///
/// # Example
///
/// ```
/// use airgrid_lib::model::Record;
/// use airgrid_lib::page::Page;
///
/// let page = Page::new(vec![Record::new("a"), Record::new("b")])
///     .with_continuation("b2Zmc2V0")
///     .with_total(40);
///
/// assert_eq!(page.len(), 2);
/// assert!(page.has_more());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    records: Vec<Record>,
    continuation: Option<String>,
    total: Option<usize>,
}

impl Page {
    /// Creates a final page (no continuation) with the given records.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            continuation: None,
            total: None,
        }
    }

    /// Sets the continuation token for fetching the next page.
    pub fn with_continuation(mut self, token: impl Into<String>) -> Self {
        self.continuation = Some(token.into());
        self
    }

    /// Sets the continuation token from an optional value.
    pub fn with_continuation_opt(mut self, token: Option<String>) -> Self {
        self.continuation = token;
        self
    }

    /// Sets the advisory total record count.
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    /// Returns a reference to the records in this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the continuation token, if more pages are available.
    pub fn continuation(&self) -> Option<&str> {
        self.continuation.as_deref()
    }

    /// Returns the advisory total, if the provider reported one.
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are more pages available.
    pub fn has_more(&self) -> bool {
        self.continuation.is_some()
    }

    /// Consumes the page into `(records, continuation, total)`.
    pub fn into_parts(self) -> (Vec<Record>, Option<String>, Option<usize>) {
        (self.records, self.continuation, self.total)
    }
}
