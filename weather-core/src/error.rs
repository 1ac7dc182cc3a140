use thiserror::Error;

/// Failure modes of a current-conditions lookup.
///
/// None of these are fatal; callers decide how to present them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    /// Rejected locally, the network was never touched.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// No response was received (connect error, timeout, truncated body).
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// Upstream answered with a non-2xx status.
    #[error("Upstream returned status {status}: {message}")]
    UpstreamError { status: u16, message: String },

    /// 2xx, but the body did not match the expected schema.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    /// Short stable label, handy for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::InvalidQuery(_) => "invalid_query",
            WeatherError::NetworkFailure(_) => "network_failure",
            WeatherError::UpstreamError { .. } => "upstream_error",
            WeatherError::MalformedResponse(_) => "malformed_response",
        }
    }

    /// Whether asking again unchanged has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            WeatherError::NetworkFailure(_) => true,
            WeatherError::UpstreamError { status, .. } => *status == 429 || *status >= 500,
            WeatherError::InvalidQuery(_) | WeatherError::MalformedResponse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_only_for_transient_failures() {
        assert!(WeatherError::NetworkFailure("timeout".into()).is_retryable());
        assert!(WeatherError::UpstreamError { status: 503, message: String::new() }.is_retryable());
        assert!(WeatherError::UpstreamError { status: 429, message: String::new() }.is_retryable());

        assert!(!WeatherError::UpstreamError { status: 404, message: String::new() }.is_retryable());
        assert!(!WeatherError::InvalidQuery("empty".into()).is_retryable());
        assert!(!WeatherError::MalformedResponse("missing".into()).is_retryable());
    }

    #[test]
    fn upstream_error_message_carries_status() {
        let err = WeatherError::UpstreamError { status: 404, message: "city not found".into() };
        assert_eq!(err.to_string(), "Upstream returned status 404: city not found");
        assert_eq!(err.kind(), "upstream_error");
    }
}
