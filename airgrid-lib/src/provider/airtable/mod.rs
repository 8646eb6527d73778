//! Airtable REST API provider
//!
//! Lists table rows through `GET /v0/{base}/{table}` with bearer-token auth.
//! Search text is pushed to Airtable as a `filterByFormula` expression over
//! the configured search fields; Airtable's own `offset` cursor is passed
//! through as the page continuation token.

mod client;
mod config;
mod formula;

pub use client::*;
pub use config::*;
pub use formula::*;
