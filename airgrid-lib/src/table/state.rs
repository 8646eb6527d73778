//! Synchronous table state machine.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::Column;
use super::FacetFilter;
use super::Sort;
use super::compare_values;
use super::facet_values;
use super::facets_match;
use super::filter_indices;
use crate::error::FetchError;
use crate::model::Record;
use crate::page::Page;

/// Which kind of fetch is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First page of a (new) search; replaces accumulated records.
    FirstPage,
    /// Next page of the current search; appends.
    More,
}

/// Lifecycle phase of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not activated yet; nothing fetched.
    Idle,
    /// A fetch is outstanding.
    Loading(FetchKind),
    /// The last fetch succeeded.
    Ready,
    /// The last fetch failed.
    Errored,
}

/// A fetch issued by the state machine, tagged with the generation it
/// belongs to.
///
/// Pass it back to [`TableState::apply`] together with the provider's
/// result; results for an outdated generation are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub kind: FetchKind,
    pub search: String,
    pub token: Option<String>,
}

/// Memoized output of [`TableState::view`].
#[derive(Debug)]
struct ViewCache {
    revision: u64,
    search: String,
    facets: BTreeMap<String, FacetFilter>,
    sort: Option<Sort>,
    indices: Vec<usize>,
}

/// View state of one searchable, paginated table.
///
/// All transitions are synchronous; the async driver
/// ([`SearchTable`](super::SearchTable)) only decides *when* they happen.
///
/// Every first-page fetch bumps the generation. [`TableState::apply`]
/// ignores results whose request carries another generation, so a
/// superseded search, or a load-more issued before it, can never overwrite
/// newer state. Detaching bumps the generation too, which turns every
/// outstanding response into a no-op.
///
/// # Example
///
/// ```
/// use airgrid_lib::model::Record;
/// use airgrid_lib::page::Page;
/// use airgrid_lib::table::{Column, TableState};
///
/// let mut state = TableState::new(vec![Column::new("name", "Name").sortable()]);
///
/// let request = state.begin_search().unwrap();
/// let page = Page::new(vec![Record::new("a").set("name", "Zeta")]);
/// assert!(state.apply(&request, Ok(page)));
///
/// assert_eq!(state.view().len(), 1);
/// assert!(state.begin_more().is_none());
/// ```
#[derive(Debug)]
pub struct TableState {
    columns: Vec<Column>,
    records: Vec<Record>,
    search_text: String,
    settled_search: String,
    facets: BTreeMap<String, FacetFilter>,
    sort: Option<Sort>,
    continuation: Option<String>,
    total: Option<usize>,
    loading: bool,
    last_error: Option<FetchError>,
    generation: u64,
    phase: Phase,
    detached: bool,
    /// Bumped whenever `records` changes; keys the view cache.
    revision: u64,
    view_cache: RefCell<Option<ViewCache>>,
}

impl TableState {
    /// Creates an idle table with a fixed column set.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            records: Vec::new(),
            search_text: String::new(),
            settled_search: String::new(),
            facets: BTreeMap::new(),
            sort: None,
            continuation: None,
            total: None,
            loading: false,
            last_error: None,
            generation: 0,
            phase: Phase::Idle,
            detached: false,
            revision: 0,
            view_cache: RefCell::new(None),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by key.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key() == key)
    }

    /// All accumulated records, in arrival order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The search text as typed.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// The search text the current result set was fetched for.
    pub fn settled_search(&self) -> &str {
        &self.settled_search
    }

    /// Active facet filters by field key.
    pub fn facets(&self) -> &BTreeMap<String, FacetFilter> {
        &self.facets
    }

    /// Distinct values of `key` among the loaded records, for offering
    /// [`FacetFilter::Equals`] choices.
    pub fn facet_values(&self, key: &str) -> Vec<String> {
        facet_values(&self.records, key)
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn continuation(&self) -> Option<&str> {
        self.continuation.as_deref()
    }

    /// Advisory total reported by the provider for the current search.
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Returns `true` if the provider reported another page.
    pub fn has_more(&self) -> bool {
        self.continuation.is_some()
    }

    /// Returns `true` when a successful fetch produced nothing to show.
    pub fn is_empty_result(&self) -> bool {
        !self.loading && self.last_error.is_none() && self.phase != Phase::Idle && self.view_len() == 0
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Updates the search text. Does not fetch.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Starts a first-page fetch for the current search text.
    ///
    /// Discards accumulated records, clears the continuation token and the
    /// last error, and bumps the generation. Returns `None` once detached.
    pub fn begin_search(&mut self) -> Option<FetchRequest> {
        if self.detached {
            return None;
        }

        self.generation += 1;
        self.settled_search = self.search_text.clone();
        self.replace_records(Vec::new());
        self.continuation = None;
        self.total = None;
        self.loading = true;
        self.last_error = None;
        self.phase = Phase::Loading(FetchKind::FirstPage);

        Some(FetchRequest {
            generation: self.generation,
            kind: FetchKind::FirstPage,
            search: self.settled_search.clone(),
            token: None,
        })
    }

    /// Starts a load-more fetch.
    ///
    /// Returns `None` without changing anything when there is no
    /// continuation token, a fetch is already in flight, or the table is
    /// detached.
    pub fn begin_more(&mut self) -> Option<FetchRequest> {
        if self.detached || self.loading {
            return None;
        }
        let token = self.continuation.clone()?;

        self.loading = true;
        self.last_error = None;
        self.phase = Phase::Loading(FetchKind::More);

        Some(FetchRequest {
            generation: self.generation,
            kind: FetchKind::More,
            search: self.settled_search.clone(),
            token: Some(token),
        })
    }

    /// Applies the outcome of `request`.
    ///
    /// Returns `false`, leaving the state untouched, if the request is stale
    /// (another search started since it was issued) or the table is detached.
    pub fn apply(&mut self, request: &FetchRequest, result: Result<Page, FetchError>) -> bool {
        if self.detached || request.generation != self.generation {
            log::trace!(
                "discarding {:?} response for generation {} (current {})",
                request.kind,
                request.generation,
                self.generation
            );
            return false;
        }

        self.loading = false;

        match (request.kind, result) {
            (FetchKind::FirstPage, Ok(page)) => {
                let (records, continuation, total) = page.into_parts();
                log::debug!(
                    "first page for {:?}: {} records, more={}",
                    request.search,
                    records.len(),
                    continuation.is_some()
                );
                self.replace_records(records);
                self.continuation = continuation;
                self.total = total;
                self.phase = Phase::Ready;
            }
            (FetchKind::More, Ok(page)) => {
                let (records, continuation, total) = page.into_parts();
                log::debug!(
                    "next page for {:?}: {} records, more={}",
                    request.search,
                    records.len(),
                    continuation.is_some()
                );
                let mut all = std::mem::take(&mut self.records);
                all.extend(records);
                self.replace_records(all);
                self.continuation = continuation;
                if total.is_some() {
                    self.total = total;
                }
                self.phase = Phase::Ready;
            }
            (FetchKind::FirstPage, Err(err)) => {
                log::warn!("search {:?} failed: {}", request.search, err);
                self.replace_records(Vec::new());
                self.continuation = None;
                self.total = None;
                self.last_error = Some(err);
                self.phase = Phase::Errored;
            }
            (FetchKind::More, Err(err)) => {
                log::warn!("loading more for {:?} failed: {}", request.search, err);
                self.last_error = Some(err);
                self.phase = Phase::Errored;
            }
        }
        true
    }

    /// Sets (`Some`) or clears (`None`) the facet filter on field `key`.
    /// Returns `true` if the filters changed. Never fetches; facets narrow
    /// the loaded records and survive new searches.
    pub fn set_facet(&mut self, key: impl Into<String>, filter: Option<FacetFilter>) -> bool {
        let key = key.into();
        match filter {
            Some(filter) => self.facets.insert(key, filter.clone()) != Some(filter),
            None => self.facets.remove(&key).is_some(),
        }
    }

    /// Removes every facet filter.
    pub fn clear_facets(&mut self) -> bool {
        let changed = !self.facets.is_empty();
        self.facets.clear();
        changed
    }

    /// Cycles the sort on `key`. Returns `false` for unknown or
    /// non-sortable columns.
    pub fn toggle_sort(&mut self, key: &str) -> bool {
        match self.column(key) {
            Some(column) if column.is_sortable() => {
                self.sort = Sort::cycle(self.sort.as_ref(), key);
                true
            }
            _ => false,
        }
    }

    /// Sets the sort directly, e.g. from an initial configuration.
    ///
    /// Ignored for unknown or non-sortable columns.
    pub fn set_sort(&mut self, sort: Option<Sort>) -> bool {
        let allowed = sort
            .as_ref()
            .is_none_or(|s| self.column(&s.key).is_some_and(Column::is_sortable));
        if allowed {
            self.sort = sort;
        }
        allowed
    }

    /// Detaches the table: every outstanding and future response is ignored
    /// and no new fetch can start.
    pub fn detach(&mut self) {
        self.detached = true;
        self.generation += 1;
        self.loading = false;
    }

    fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.revision += 1;
    }

    // =========================================================================
    // Derived view
    // =========================================================================

    /// Returns the records to display: filtered by the search text and every
    /// facet, then stably sorted by the active sort.
    pub fn view(&self) -> Vec<&Record> {
        self.view_indices()
            .into_iter()
            .map(|i| &self.records[i])
            .collect()
    }

    /// Number of records in the view.
    pub fn view_len(&self) -> usize {
        self.with_view(|indices| indices.len())
    }

    /// Returns indices into [`TableState::records`] in view order.
    pub fn view_indices(&self) -> Vec<usize> {
        self.with_view(<[usize]>::to_vec)
    }

    fn with_view<R>(&self, f: impl FnOnce(&[usize]) -> R) -> R {
        let mut cache = self.view_cache.borrow_mut();
        let fresh = cache.as_ref().is_some_and(|c| {
            c.revision == self.revision
                && c.search == self.search_text
                && c.facets == self.facets
                && c.sort == self.sort
        });
        if !fresh {
            *cache = Some(ViewCache {
                revision: self.revision,
                search: self.search_text.clone(),
                facets: self.facets.clone(),
                sort: self.sort.clone(),
                indices: self.compute_view(),
            });
        }
        match cache.as_ref() {
            Some(c) => f(&c.indices),
            None => f(&[]),
        }
    }

    fn compute_view(&self) -> Vec<usize> {
        let mut indices = filter_indices(&self.records, &self.columns, &self.search_text);
        if !self.facets.is_empty() {
            indices.retain(|&i| facets_match(&self.records[i], &self.facets));
        }
        if let Some(sort) = &self.sort {
            // sort_by is stable: ties keep arrival order
            indices.sort_by(|&a, &b| {
                let ordering = compare_values(self.records[a].get(&sort.key), self.records[b].get(&sort.key));
                sort.direction.apply(ordering)
            });
        }
        indices
    }
}
