//! Page providers
//!
//! The table only knows the [`PageProvider`] contract. Implementations here
//! translate it to concrete sources:
//!
//! - [`airtable`] - the Airtable REST API, searched with `filterByFormula`
//! - [`ListClient`] - a `/api/list` style JSON endpoint
//! - [`MemoryProvider`] - a fixed in-memory record set

pub mod airtable;
mod list;
mod memory;

pub use list::*;
pub use memory::*;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::page::Page;

/// Source of record pages for a table.
///
/// `fetch_page(search, None)` returns the first page for a search;
/// passing the continuation token of a previous page returns the page after
/// it. The table never calls this more than once concurrently for the same
/// instance but makes no assumption that calls are idempotent.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use airgrid_lib::error::FetchError;
/// use airgrid_lib::model::Record;
/// use airgrid_lib::page::Page;
/// use airgrid_lib::provider::PageProvider;
///
/// struct Single;
///
/// #[async_trait]
/// impl PageProvider for Single {
///     async fn fetch_page(&self, _search: &str, _token: Option<&str>) -> Result<Page, FetchError> {
///         Ok(Page::new(vec![Record::new("only")]))
///     }
/// }
/// ```
#[async_trait]
pub trait PageProvider: Send + Sync {
    /// Fetches one page of records matching `search`.
    async fn fetch_page(&self, search: &str, token: Option<&str>) -> Result<Page, FetchError>;
}

#[async_trait]
impl<P: PageProvider + ?Sized> PageProvider for Arc<P> {
    async fn fetch_page(&self, search: &str, token: Option<&str>) -> Result<Page, FetchError> {
        (**self).fetch_page(search, token).await
    }
}
