use airgrid_lib::error::ConfigError;
use airgrid_lib::error::Error;

/// Errors that end the program.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Lib(#[from] Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not start logging: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("{0}")]
    Usage(String),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Lib(err.into())
    }
}
