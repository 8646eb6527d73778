//! Async driver for a [`TableState`].

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

use super::Column;
use super::FacetFilter;
use super::FetchRequest;
use super::RenderOptions;
use super::Sort;
use super::TableState;
use super::render_text;
use super::WakeupReceiver;
use super::wakeup::Notifier;
use crate::provider::PageProvider;

/// Default quiet period before a search is fetched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Tuning for a [`SearchTable`].
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Quiet period after the last keystroke before a search is fetched.
    ///
    /// Default: 300 ms
    pub debounce: Duration,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl TableOptions {
    /// Same as [`TableOptions::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// A searchable, sortable, paginated table bound to a page provider.
///
/// Owns a [`TableState`] and drives it from user actions: search text is
/// debounced before the first page is fetched, `request_more` loads the
/// next page, and sorting happens locally. Fetches run as Tokio tasks; a
/// response only lands if its generation is still current when it arrives.
///
/// Nothing happens until [`SearchTable::activate`]. Deactivation (or drop)
/// cancels the pending debounce and turns late responses into no-ops.
///
/// All methods that may start a fetch must be called from within a Tokio
/// runtime.
///
/// # Example
///
/// ```ignore
/// let table = SearchTable::new(columns, provider);
/// let mut wakeups = table.subscribe();
/// table.activate();
///
/// table.set_search_text("gpt");
/// while wakeups.recv().await.is_some() {
///     println!("{}", table.render(&RenderOptions::default()));
/// }
/// ```
pub struct SearchTable {
    shared: Arc<Shared>,
    options: TableOptions,
    pending_search: Mutex<Option<AbortHandle>>,
}

/// State reachable from spawned tasks.
struct Shared {
    state: Mutex<TableState>,
    provider: Arc<dyn PageProvider>,
    wakeup: Notifier,
    shutdown: CancellationToken,
    active: Mutex<bool>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_active(&self) -> bool {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a first-page fetch for the current search text.
    fn start_search(self: &Arc<Self>) {
        let request = self.lock().begin_search();
        if let Some(request) = request {
            self.wakeup.notify();
            self.spawn_fetch(request);
        }
    }

    fn spawn_fetch(self: &Arc<Self>, request: FetchRequest) {
        log::debug!(
            "fetching {:?} search={:?} generation={}",
            request.kind,
            request.search,
            request.generation
        );

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = shared.shutdown.cancelled() => return,
                result = shared.provider.fetch_page(&request.search, request.token.as_deref()) => result,
            };

            let applied = shared.lock().apply(&request, result);
            if applied {
                shared.wakeup.notify();
            }
        });
    }
}

impl SearchTable {
    /// Creates an inactive table with default options.
    pub fn new(columns: Vec<Column>, provider: impl PageProvider + 'static) -> Self {
        Self::with_options(columns, provider, TableOptions::default())
    }

    /// Creates an inactive table.
    pub fn with_options(
        columns: Vec<Column>,
        provider: impl PageProvider + 'static,
        options: TableOptions,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(TableState::new(columns)),
                provider: Arc::new(provider),
                wakeup: Notifier::default(),
                shutdown: CancellationToken::new(),
                active: Mutex::new(false),
            }),
            options,
            pending_search: Mutex::new(None),
        }
    }

    /// Returns the options this table was created with.
    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Returns a receiver woken after every visible state change.
    ///
    /// Only the most recent subscriber is notified.
    pub fn subscribe(&self) -> WakeupReceiver {
        self.shared.wakeup.subscribe()
    }

    /// Activates the table and fetches the first page for the current
    /// search text immediately.
    ///
    /// Calling it again, or after deactivation, does nothing.
    pub fn activate(&self) {
        if self.shared.shutdown.is_cancelled() {
            return;
        }
        {
            let mut active = self.shared.active.lock().unwrap_or_else(PoisonError::into_inner);
            if *active {
                return;
            }
            *active = true;
        }
        self.cancel_pending_search();
        self.shared.start_search();
    }

    /// Returns `true` between activation and deactivation.
    pub fn is_active(&self) -> bool {
        self.shared.is_active() && !self.shared.shutdown.is_cancelled()
    }

    /// Updates the search text and (re)starts the debounce window.
    ///
    /// The text is visible immediately through [`SearchTable::with_state`];
    /// the first-page fetch for it is issued once no further call arrives
    /// for the debounce window. Before activation only the text is stored.
    pub fn set_search_text(&self, text: impl Into<String>) {
        self.shared.lock().set_search_text(text);
        self.shared.wakeup.notify();

        if !self.is_active() {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let debounce = self.options.debounce;
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = shared.shutdown.cancelled() => {}
                _ = tokio::time::sleep(debounce) => shared.start_search(),
            }
        });

        let mut pending = self.pending_search.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(handle.abort_handle()) {
            previous.abort();
        }
    }

    /// Requests the next page.
    ///
    /// Returns `false` without fetching when there is no next page, a fetch
    /// is already in flight, or the table is not active.
    pub fn request_more(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        let request = self.shared.lock().begin_more();
        match request {
            Some(request) => {
                self.shared.wakeup.notify();
                self.shared.spawn_fetch(request);
                true
            }
            None => false,
        }
    }

    /// Cycles the sort on `key`. Never fetches.
    pub fn toggle_sort(&self, key: &str) -> bool {
        let changed = self.shared.lock().toggle_sort(key);
        if changed {
            self.shared.wakeup.notify();
        }
        changed
    }

    /// Replaces the sort directly. Never fetches.
    ///
    /// Returns `false` and leaves the sort alone for unknown or
    /// non-sortable columns.
    pub fn set_sort(&self, sort: Option<Sort>) -> bool {
        let changed = self.shared.lock().set_sort(sort);
        if changed {
            self.shared.wakeup.notify();
        }
        changed
    }

    /// Sets or clears the facet filter on field `key`. Never fetches.
    pub fn set_facet(&self, key: impl Into<String>, filter: Option<FacetFilter>) -> bool {
        let changed = self.shared.lock().set_facet(key, filter);
        if changed {
            self.shared.wakeup.notify();
        }
        changed
    }

    /// Removes every facet filter.
    pub fn clear_facets(&self) -> bool {
        let changed = self.shared.lock().clear_facets();
        if changed {
            self.shared.wakeup.notify();
        }
        changed
    }

    /// Distinct values of `key` among the loaded records.
    pub fn facet_values(&self, key: &str) -> Vec<String> {
        self.with_state(|state| state.facet_values(key))
    }

    /// Deactivates the table.
    ///
    /// Cancels the pending debounce timer and in-flight fetch tasks and
    /// detaches the state so any response still arriving is ignored.
    pub fn deactivate(&self) {
        if self.shared.shutdown.is_cancelled() {
            return;
        }
        self.shared.shutdown.cancel();
        self.cancel_pending_search();
        self.shared.lock().detach();
        self.shared.wakeup.notify();
        self.shared.wakeup.close();
        log::debug!("table deactivated");
    }

    /// Runs `f` against the current state.
    ///
    /// The state is locked for the duration of `f`; do not call back into
    /// the table from it.
    pub fn with_state<R>(&self, f: impl FnOnce(&TableState) -> R) -> R {
        f(&self.shared.lock())
    }

    /// Renders the current state as text.
    pub fn render(&self, options: &RenderOptions) -> String {
        self.with_state(|state| render_text(state, options))
    }

    fn cancel_pending_search(&self) {
        let mut pending = self.pending_search.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchTable {
    fn drop(&mut self) {
        self.deactivate();
    }
}
