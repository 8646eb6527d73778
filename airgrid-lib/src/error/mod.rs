//! Error types

mod config;
mod fetch;
mod field;

pub use config::*;
pub use fetch::*;
pub use field::*;

/// Top-level error for operations outside the table boundary.
///
/// The table itself never returns this; fetch failures are recorded in its
/// view state as a [`FetchError`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A page fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Required configuration was absent or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
