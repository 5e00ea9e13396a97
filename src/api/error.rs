use thiserror::Error;

/// Failures crossing the HTTP boundary. Single-request flows abort on any
/// variant; the documents upload loop records them per file and keeps going.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout,
    /// malformed body).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status. The body is whatever
    /// diagnostic text came with it, possibly empty.
    #[error("Server error: {status} - {body}")]
    Server { status: u16, body: String },

    /// A 2xx response whose `success` flag was false. The message is the
    /// server-supplied one when present, otherwise a caller-chosen fallback.
    #[error("{0}")]
    Application(String),
}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn server_error_carries_the_diagnostic_body() {
        let err = ApiError::Server {
            status: 503,
            body: "maintenance window".to_string(),
        };
        assert_eq!(err.to_string(), "Server error: 503 - maintenance window");
    }
}
