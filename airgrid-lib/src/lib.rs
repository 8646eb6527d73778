//! Headless searchable record table.
//!
//! Records arrive a page at a time from a [`PageProvider`]; the table
//! debounces search input, cancels superseded fetches logically, appends
//! further pages on request, and sorts the loaded rows locally.
//!
//! ```no_run
//! use airgrid_lib::provider::MemoryProvider;
//! use airgrid_lib::table::{Column, RenderOptions, SearchTable};
//!
//! # async fn demo(records: Vec<airgrid_lib::model::Record>) {
//! let provider = MemoryProvider::new(records, "name");
//! let table = SearchTable::new(
//!     vec![Column::new("name", "Name").sortable()],
//!     provider,
//! );
//! let mut wakeups = table.subscribe();
//! table.activate();
//! table.set_search_text("gpt");
//! wakeups.recv().await;
//! println!("{}", table.render(&RenderOptions::default()));
//! # }
//! ```
//!
//! [`PageProvider`]: provider::PageProvider

pub mod error;
pub mod model;
pub mod page;
pub mod provider;
pub mod table;
