use thiserror::Error;

/// Failures raised by one stage of the digest pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Article could not be downloaded (network error, timeout, HTTP status).
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Article body could not be turned into text.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Feed could not be fetched or parsed.
    #[error("feed error: {0}")]
    FeedParse(String),

    /// Summarization model invocation failed.
    #[error("summarization error: {0}")]
    Summarization(String),

    /// Messaging credentials missing or rejected.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Messaging provider refused or failed to deliver the message.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Seen-set file could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
