use thiserror::Error;

/// Rejected user input. Nothing is changed when a date is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidDate {
    #[error("Please select a date and time.")]
    Empty,

    #[error("Invalid date: {0}")]
    Unparseable(String),
}

#[derive(Debug, Error)]
pub enum CountdownError {
    #[error(transparent)]
    InvalidDate(#[from] InvalidDate),

    /// The new target is shown but could not be saved.
    #[error("Could not save the target date: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing would push the store past its byte quota. Nothing was written.
    #[error("storage quota exceeded ({needed} of {quota} bytes)")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("failed to write store: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A persisted image collection that could not be read back.
#[derive(Debug, Error)]
#[error("persisted image collection is unreadable: {0}")]
pub struct DecodeFailure(#[from] pub serde_json::Error);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("not a data URL")]
    NotDataUrl,

    #[error("data URL is not base64-encoded")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    Payload(String),
}
