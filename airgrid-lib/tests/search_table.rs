//! Integration tests for the async table driver.
//!
//! The provider here never answers on its own: every call parks on a oneshot
//! channel until the test replies, so response ordering is fully scripted.
//! Tests run on a paused clock and move it with `tokio::time::advance`.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use airgrid_lib::error::FetchError;
use airgrid_lib::model::Record;
use airgrid_lib::page::Page;
use airgrid_lib::provider::PageProvider;
use airgrid_lib::table::{Column, RenderOptions, SearchTable, TableOptions};

// =============================================================================
// Scripted provider
// =============================================================================

struct Call {
    search: String,
    token: Option<String>,
    reply: oneshot::Sender<Result<Page, FetchError>>,
}

impl Call {
    fn ok(self, page: Page) {
        let _ = self.reply.send(Ok(page));
    }

    fn fail(self, err: FetchError) {
        let _ = self.reply.send(Err(err));
    }
}

#[derive(Clone, Default)]
struct GatedProvider {
    pending: Arc<Mutex<VecDeque<Call>>>,
    history: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl GatedProvider {
    fn next(&self) -> Call {
        self.pending
            .lock()
            .unwrap()
            .pop_front()
            .expect("expected a pending fetch")
    }

    fn calls(&self) -> Vec<(String, Option<String>)> {
        self.history.lock().unwrap().clone()
    }

    fn pending_len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

#[async_trait]
impl PageProvider for GatedProvider {
    async fn fetch_page(&self, search: &str, token: Option<&str>) -> Result<Page, FetchError> {
        let (tx, rx) = oneshot::channel();
        self.history
            .lock()
            .unwrap()
            .push((search.to_string(), token.map(str::to_string)));
        self.pending.lock().unwrap().push_back(Call {
            search: search.to_string(),
            token: token.map(str::to_string),
            reply: tx,
        });
        rx.await
            .unwrap_or_else(|_| Err(FetchError::network("reply dropped")))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn model(id: &str, name: &str, vendor: &str) -> Record {
    Record::new(id).set("name", name).set("vendor", vendor)
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name").sortable(),
        Column::new("vendor", "Vendor").sortable(),
    ]
}

fn table(provider: &GatedProvider) -> SearchTable {
    SearchTable::new(columns(), provider.clone())
}

/// Lets spawned tasks run until they park again.
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

async fn advance(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
    settle().await;
}

async fn type_text(table: &SearchTable, text: &str) {
    table.set_search_text(text);
    settle().await;
}

fn names(table: &SearchTable) -> Vec<String> {
    table.with_state(|state| {
        state
            .view()
            .iter()
            .map(|r| r.text("name").into_owned())
            .collect()
    })
}

/// Activates the table and answers the initial fetch with `page`.
async fn activate_with(table: &SearchTable, provider: &GatedProvider, page: Page) {
    table.activate();
    settle().await;
    provider.next().ok(page);
    settle().await;
}

// =============================================================================
// Activation and debounce
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_activation_fetches_first_page_immediately() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    settle().await;
    assert!(provider.calls().is_empty());

    table.activate();
    settle().await;
    assert_eq!(provider.calls(), vec![(String::new(), None)]);
    assert!(table.with_state(|s| s.is_loading()));

    provider.next().ok(
        Page::new(vec![
            model("1", "GPT-4o", "OpenAI"),
            model("2", "Claude 3.5", "Anthropic"),
        ])
        .with_continuation("c1"),
    );
    settle().await;

    table.with_state(|s| {
        assert!(!s.is_loading());
        assert_eq!(s.records().len(), 2);
        assert_eq!(s.continuation(), Some("c1"));
        assert!(s.has_more());
    });
}

#[tokio::test(start_paused = true)]
async fn test_second_activation_is_noop() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    activate_with(&table, &provider, Page::new(vec![])).await;

    table.activate();
    settle().await;
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_text_before_activation_is_used_by_first_fetch() {
    let provider = GatedProvider::default();
    let table = table(&provider);

    type_text(&table, "zzz").await;
    advance(1_000).await;
    assert!(provider.calls().is_empty());

    table.activate();
    settle().await;
    let call = provider.next();
    assert_eq!(call.search, "zzz");
    call.ok(Page::new(vec![]));
    settle().await;

    assert!(table.with_state(|s| s.is_empty_result()));
    let text = table.render(&RenderOptions::default());
    assert!(text.contains("No results for “zzz”."));
}

#[tokio::test(start_paused = true)]
async fn test_debounce_issues_one_fetch_for_last_text() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    activate_with(&table, &provider, Page::new(vec![])).await;

    type_text(&table, "g").await;
    advance(100).await;
    type_text(&table, "gp").await;
    advance(100).await;
    type_text(&table, "gpt").await;
    advance(299).await;
    assert_eq!(provider.calls().len(), 1);

    advance(1).await;
    assert_eq!(
        provider.calls(),
        vec![(String::new(), None), ("gpt".to_string(), None)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_custom_debounce_window() {
    let provider = GatedProvider::default();
    let table = SearchTable::with_options(
        columns(),
        provider.clone(),
        TableOptions::new().with_debounce(Duration::from_millis(50)),
    );
    activate_with(&table, &provider, Page::new(vec![])).await;

    type_text(&table, "o").await;
    advance(50).await;
    assert_eq!(provider.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_search_text_filters_loaded_rows_before_fetch() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    activate_with(
        &table,
        &provider,
        Page::new(vec![
            model("1", "GPT-4o", "OpenAI"),
            model("2", "Claude 3.5", "Anthropic"),
            model("3", "Gemini", "Google"),
        ]),
    )
    .await;

    type_text(&table, "anthro").await;
    assert_eq!(provider.calls().len(), 1);
    assert_eq!(names(&table), vec!["Claude 3.5"]);
}

// =============================================================================
// Superseded responses
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_stale_response_arriving_last_is_ignored() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    activate_with(&table, &provider, Page::new(vec![])).await;

    type_text(&table, "gpt").await;
    advance(300).await;
    let gpt = provider.next();

    type_text(&table, "claude").await;
    advance(300).await;
    let claude = provider.next();
    assert_eq!(claude.search, "claude");

    claude.ok(Page::new(vec![model("c", "Claude 3.5", "Anthropic")]));
    settle().await;
    gpt.ok(Page::new(vec![model("g", "GPT-4o", "OpenAI")]));
    settle().await;

    assert_eq!(names(&table), vec!["Claude 3.5"]);
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_arriving_first_is_ignored() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    activate_with(&table, &provider, Page::new(vec![])).await;

    type_text(&table, "gpt").await;
    advance(300).await;
    let gpt = provider.next();
    type_text(&table, "claude").await;
    advance(300).await;
    let claude = provider.next();

    gpt.ok(Page::new(vec![model("g", "GPT-4o", "OpenAI")]));
    settle().await;
    table.with_state(|s| {
        assert!(s.is_loading());
        assert!(s.records().is_empty());
    });

    claude.ok(Page::new(vec![model("c", "Claude 3.5", "Anthropic")]));
    settle().await;
    assert_eq!(names(&table), vec!["Claude 3.5"]);
    assert!(!table.with_state(|s| s.is_loading()));
}

#[tokio::test(start_paused = true)]
async fn test_new_search_discards_load_more_in_flight() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    activate_with(
        &table,
        &provider,
        Page::new(vec![model("1", "Alpha", "A")]).with_continuation("c1"),
    )
    .await;

    assert!(table.request_more());
    settle().await;
    let more = provider.next();

    type_text(&table, "beta").await;
    advance(300).await;
    let search = provider.next();

    more.ok(Page::new(vec![model("2", "Alpha 2", "A")]));
    settle().await;
    search.ok(Page::new(vec![model("3", "Beta", "B")]));
    settle().await;

    assert_eq!(names(&table), vec!["Beta"]);
}

// =============================================================================
// Load more
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_load_more_appends_next_page() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    activate_with(
        &table,
        &provider,
        Page::new(vec![model("1", "A1", "A"), model("2", "A2", "A")]).with_continuation("c1"),
    )
    .await;

    assert!(table.request_more());
    settle().await;
    assert!(!table.request_more(), "second request while loading");

    let call = provider.next();
    assert_eq!(call.token.as_deref(), Some("c1"));
    assert_eq!(call.search, "");
    call.ok(Page::new(vec![model("3", "A3", "A")]));
    settle().await;

    assert_eq!(names(&table), vec!["A1", "A2", "A3"]);
    assert!(!table.with_state(|s| s.has_more()));
    assert!(!table.request_more());
    assert_eq!(provider.pending_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_load_more_keeps_rows_and_token() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    activate_with(
        &table,
        &provider,
        Page::new(vec![model("1", "A1", "A")]).with_continuation("c1"),
    )
    .await;

    assert!(table.request_more());
    settle().await;
    provider.next().fail(FetchError::network("connection reset"));
    settle().await;

    table.with_state(|s| {
        assert_eq!(s.records().len(), 1);
        assert_eq!(s.continuation(), Some("c1"));
        assert!(s.last_error().is_some());
        assert!(!s.is_loading());
    });

    assert!(table.request_more(), "retry is allowed");
    settle().await;
    assert_eq!(provider.next().token.as_deref(), Some("c1"));
}

#[tokio::test(start_paused = true)]
async fn test_failed_search_clears_rows() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    activate_with(
        &table,
        &provider,
        Page::new(vec![model("1", "Alpha", "A")]).with_continuation("c1"),
    )
    .await;

    type_text(&table, "x").await;
    advance(300).await;
    provider
        .next()
        .fail(FetchError::server(422, "INVALID_FILTER_BY_FORMULA"));
    settle().await;

    table.with_state(|s| {
        assert!(s.records().is_empty());
        assert_eq!(s.continuation(), None);
        assert_eq!(s.last_error().and_then(FetchError::status_code), Some(422));
    });
    let text = table.render(&RenderOptions::default());
    assert!(text.contains("! HTTP 422: INVALID_FILTER_BY_FORMULA"));
    assert!(!text.contains("No results"));
}

// =============================================================================
// Sorting
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_sorting_is_local() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    activate_with(
        &table,
        &provider,
        Page::new(vec![model("1", "Zeta", "Z"), model("2", "Alpha", "A")]),
    )
    .await;

    assert!(table.toggle_sort("name"));
    assert_eq!(names(&table), vec!["Alpha", "Zeta"]);
    assert!(table.toggle_sort("name"));
    assert_eq!(names(&table), vec!["Zeta", "Alpha"]);
    assert!(table.toggle_sort("name"));
    assert_eq!(names(&table), vec!["Zeta", "Alpha"]);
    assert!(!table.toggle_sort("missing"));

    settle().await;
    assert_eq!(provider.calls().len(), 1);
}

// =============================================================================
// Deactivation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_deactivate_cancels_pending_debounce() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    activate_with(&table, &provider, Page::new(vec![])).await;

    type_text(&table, "abc").await;
    advance(100).await;
    table.deactivate();
    advance(1_000).await;

    assert_eq!(provider.calls().len(), 1);
    assert!(!table.is_active());
    assert!(!table.request_more());
}

#[tokio::test(start_paused = true)]
async fn test_response_after_deactivate_is_ignored() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    table.activate();
    settle().await;
    let call = provider.next();

    table.deactivate();
    call.ok(Page::new(vec![model("1", "Late", "L")]));
    settle().await;

    table.with_state(|s| {
        assert!(s.is_detached());
        assert!(s.records().is_empty());
        assert!(!s.is_loading());
    });
}

#[tokio::test(start_paused = true)]
async fn test_wakeups_follow_state_changes() {
    let provider = GatedProvider::default();
    let table = table(&provider);
    let mut wakeups = table.subscribe();

    table.activate();
    assert_eq!(wakeups.recv().await, Some(()));
    wakeups.drain();

    settle().await;
    provider.next().ok(Page::new(vec![model("1", "Alpha", "A")]));
    assert_eq!(wakeups.recv().await, Some(()));

    table.deactivate();
    while wakeups.recv().await.is_some() {}
}
