//! Page fetch error types

/// Errors a [`PageProvider`](crate::provider::PageProvider) can fail with.
///
/// Cheap to clone so the table can keep the last failure in its view state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure; no response was received.
    #[error("Network error: {message}")]
    Network {
        /// Description of the transport failure.
        message: String,
    },

    /// A response was received but indicated failure.
    #[error("HTTP {status}: {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A success response whose body could not be decoded into a page.
    #[error("Response decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
        /// Raw response body, if it was read.
        body: Option<String>,
    },
}

impl FetchError {
    /// Creates a new network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a new server error.
    pub fn server(status: u16, body: impl Into<String>) -> Self {
        Self::Server {
            status,
            body: body.into(),
        }
    }

    /// Creates a new decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new decode error with the raw response body.
    pub fn decode_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is a server error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if re-issuing the same request may succeed.
    ///
    /// Nothing retries automatically; this only tells a caller whether
    /// offering a manual retry makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Server { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::decode(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::server(status.as_u16(), err.to_string());
        }
        Self::network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            FetchError::server(503, "unavailable").to_string(),
            "HTTP 503: unavailable"
        );
        assert_eq!(
            FetchError::network("connection refused").to_string(),
            "Network error: connection refused"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(FetchError::network("reset").is_retryable());
        assert!(FetchError::server(422, "bad formula").is_retryable());
        assert!(!FetchError::decode("expected value").is_retryable());
    }

    #[test]
    fn test_status_code() {
        assert_eq!(FetchError::server(404, "").status_code(), Some(404));
        assert_eq!(FetchError::network("x").status_code(), None);
    }
}
