use hyper::StatusCode;
use thiserror::Error;

/// Type alias for Result with GmailError
pub type Result<T> = std::result::Result<T, GmailError>;

/// Error types for the recruiter labeling run
///
/// Nothing is retried: every variant ends the run when it reaches `main`.
#[derive(Error, Debug)]
pub enum GmailError {
    /// Gmail API returned an error
    #[error("Gmail API error: {0}")]
    ApiError(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Gmail answered 429
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Network-related error (connection issues, timeouts, etc.)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server returned 5xx error
    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    /// Resource not found (404)
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden (403)
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// Raw message missing or not parseable as MIME
    #[error("Invalid message format: {0}")]
    InvalidMessageFormat(String),

    /// Label-related errors
    #[error("Label error: {0}")]
    LabelError(String),

    /// Classification errors
    #[error("Classification error: {0}")]
    ClassificationError(String),

    /// Word-vector model or network file could not be loaded
    #[error("Model error: {0}")]
    ModelError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Map a non-success HTTP status from Gmail to an error variant
pub fn error_for_status(status: StatusCode) -> GmailError {
    let status_code = status.as_u16();
    let message = format!(
        "HTTP {}: {}",
        status_code,
        status.canonical_reason().unwrap_or("Unknown")
    );

    match status_code {
        429 => GmailError::RateLimitExceeded(message),
        404 => GmailError::MessageNotFound("Resource not found".to_string()),
        400 => GmailError::BadRequest(message),
        403 => GmailError::Forbidden(message),
        500..=599 => GmailError::ServerError {
            status: status_code,
            message,
        },
        _ => GmailError::ApiError(message),
    }
}

impl From<google_gmail1::Error> for GmailError {
    fn from(error: google_gmail1::Error) -> Self {
        match error {
            // HTTP response with status code (non-success responses)
            google_gmail1::Error::Failure(ref response) => error_for_status(response.status()),
            // Request not understood by server
            google_gmail1::Error::BadRequest(ref err) => GmailError::BadRequest(format!("{}", err)),
            google_gmail1::Error::HttpError(ref err) => {
                GmailError::NetworkError(format!("Connection error: {}", err))
            }
            google_gmail1::Error::Io(err) => GmailError::NetworkError(err.to_string()),
            google_gmail1::Error::MissingToken(ref err) => {
                GmailError::AuthError(format!("No token available: {}", err))
            }
            _ => GmailError::ApiError(error.to_string()),
        }
    }
}
