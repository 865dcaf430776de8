use thiserror::Error;

/// All errors that can occur when using the Picovico SDK.
#[derive(Error, Debug)]
pub enum PicovicoError {
    /// A required argument or extra field was not provided.
    #[error("required field not set: {field}")]
    MissingField { field: String },

    /// The requested style is not part of the service's catalog.
    #[error("unknown style: {0}")]
    UnknownStyle(String),

    /// A value is longer than the limit allowed for its field.
    #[error("{field} should not exceed {limit} chars (got {length})")]
    LengthOutOfRange {
        field: String,
        limit: usize,
        length: usize,
    },

    /// The service answered with a non-success HTTP status.
    #[error("request failed with status {status_code}: {body}")]
    Request { status_code: u16, body: String },

    /// The create response did not carry a job token.
    #[error("response has no token: {body}")]
    MissingToken { body: String },

    /// No access token was configured.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// A transport-level HTTP error from reqwest.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body was not valid JSON of the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl PicovicoError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        PicovicoError::MissingField {
            field: field.into(),
        }
    }
}

/// A convenience alias for `Result<T, PicovicoError>`.
pub type Result<T> = std::result::Result<T, PicovicoError>;
