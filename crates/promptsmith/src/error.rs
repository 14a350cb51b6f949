use std::path::PathBuf;
use std::time::Duration;

/// Failure of a full enhancement request.
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("platform must not be empty")]
    MissingPlatform,

    #[error("prompt must not be empty")]
    MissingRequest,

    #[error("no guide found for platform: {0}")]
    GuideNotFound(String),

    #[error("guide store error: {0}")]
    Guide(#[from] GuideError),

    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),
}

impl EnhanceError {
    /// Whether the caller supplied bad input (as opposed to a lookup or
    /// upstream failure).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingPlatform | Self::MissingRequest)
    }
}

/// Guide store failure. A document with missing lists is not an error.
#[derive(Debug, thiserror::Error)]
pub enum GuideError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reported by a completion backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// HTTP 429. `retry_after` is the server's `Retry-After`, when given in
    /// seconds.
    #[error("rate limited: {body}")]
    RateLimited {
        retry_after: Option<Duration>,
        body: String,
    },

    #[error("request failed: {0}")]
    Request(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("empty completion")]
    EmptyResponse,
}

impl CompletionError {
    /// Rate limits, server errors, and network failures are worth retrying.
    /// Bad requests and auth failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 429 || (500..=504).contains(status),
            Self::RateLimited { .. } | Self::Request(_) => true,
            Self::Api(_) | Self::Parse(_) | Self::EmptyResponse => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_statuses() {
        for status in [429, 500, 502, 503, 504] {
            let err = CompletionError::Http {
                status,
                body: String::new(),
            };
            assert!(err.is_transient(), "{status} should be transient");
        }
    }

    #[test]
    fn permanent_statuses() {
        for status in [400, 401, 403, 404, 422] {
            let err = CompletionError::Http {
                status,
                body: String::new(),
            };
            assert!(!err.is_transient(), "{status} should be permanent");
        }
    }

    #[test]
    fn network_failures_are_transient() {
        assert!(CompletionError::Request("connection reset".into()).is_transient());
        assert!(
            CompletionError::RateLimited {
                retry_after: None,
                body: String::new()
            }
            .is_transient()
        );
        assert!(!CompletionError::EmptyResponse.is_transient());
    }

    #[test]
    fn validation_errors() {
        assert!(EnhanceError::MissingPlatform.is_validation());
        assert!(EnhanceError::MissingRequest.is_validation());
        assert!(!EnhanceError::GuideNotFound("x".into()).is_validation());
    }

    #[test]
    fn messages_name_the_platform() {
        let err = EnhanceError::GuideNotFound("midjourney".into());
        assert_eq!(err.to_string(), "no guide found for platform: midjourney");
    }

    #[test]
    fn completion_error_wraps() {
        let err: EnhanceError = CompletionError::Http {
            status: 401,
            body: "unauthorized".into(),
        }
        .into();
        assert_eq!(err.to_string(), "completion failed: HTTP 401: unauthorized");
    }
}
