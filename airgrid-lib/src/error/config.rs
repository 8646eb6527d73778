//! Configuration error types

/// Errors raised while assembling explicit configuration objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// One or more required options were not provided.
    #[error("Missing required configuration: {}", options.join(", "))]
    Missing {
        /// Names of every absent option.
        options: Vec<&'static str>,
    },

    /// An option was provided but has an unusable value.
    #[error("Invalid configuration for {option}: {message}")]
    Invalid {
        /// Name of the offending option.
        option: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

impl ConfigError {
    /// Creates a new invalid-option error.
    pub fn invalid(option: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            option,
            message: message.into(),
        }
    }

    /// Returns the names of missing options, if this is a missing-options error.
    pub fn missing_options(&self) -> &[&'static str] {
        match self {
            Self::Missing { options } => options,
            Self::Invalid { .. } => &[],
        }
    }
}
