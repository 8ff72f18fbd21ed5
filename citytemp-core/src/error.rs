/// Failure while fetching or interpreting provider data.
///
/// These never reach callers of the aggregator; they are logged and turned
/// into missing values there.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed payload: {0}")]
    Payload(String),
}

impl SourceError {
    pub fn payload(msg: impl Into<String>) -> Self {
        SourceError::Payload(msg.into())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Payload(err.to_string())
    }
}
