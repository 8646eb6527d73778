//! Searchable, sortable, paginated table
//!
//! [`TableState`] is the synchronous state machine: search text, loaded
//! records, continuation token, sort and the derived view. [`SearchTable`]
//! drives it against a [`PageProvider`](crate::provider::PageProvider),
//! debouncing keystrokes and discarding superseded responses.

mod column;
mod controller;
mod filter;
mod render;
mod sort;
mod state;
mod wakeup;

pub use column::*;
pub use controller::*;
pub use filter::*;
pub use render::*;
pub use sort::*;
pub use state::*;
pub use wakeup::WakeupReceiver;
