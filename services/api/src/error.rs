//! services/api/src/error.rs
//!
//! Startup failures of the API binary. Request-level failures never reach this
//! type: handlers map `PortError` straight onto HTTP statuses.

use crate::config::ConfigError;
use axum::http::header::InvalidHeaderValue;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// `CORS_ORIGIN` parsed as a string but is not a valid header value.
    #[error("Invalid CORS origin '{origin}': {source}")]
    CorsOrigin {
        origin: String,
        #[source]
        source: InvalidHeaderValue,
    },

    /// Binding the listener or serving connections failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cors_origin_error_names_the_offending_value() {
        let source = "bad\norigin".parse::<HeaderValue>().unwrap_err();
        let err = ApiError::CorsOrigin {
            origin: "bad\norigin".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid CORS origin 'bad\norigin'"));
    }
}
