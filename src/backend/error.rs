use thiserror::Error;

/// Failure of a single remote call.
///
/// Callers in the UI never show these details; they collapse every variant
/// into the fixed message of the action that failed and log the variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed: {message}")]
    Request { message: String },
    #[error("failed to read response body: {message}")]
    Read { message: String },
    #[error("backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("failed to decode response: {message}")]
    Decode { message: String },
    #[error("no async runtime available to run the request")]
    NoRuntime,
}

impl ApiError {
    /// Short stable identifier, used for CLI error codes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Request { .. } => "BACKEND_UNREACHABLE",
            Self::Read { .. } => "BACKEND_READ_FAILED",
            Self::Http { .. } => "BACKEND_HTTP_ERROR",
            Self::Decode { .. } => "BACKEND_DECODE_FAILED",
            Self::NoRuntime => "RUNTIME_UNAVAILABLE",
        }
    }
}
