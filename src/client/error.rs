use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("language model is not available on the server")]
    ModelUnavailable,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unexpected HTTP status: {0} - body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("malformed response ({reason}): {body}")]
    MalformedResponse { reason: String, body: String },
}
