//! Conversion error type.

use crate::error::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
    /// Request could not be sent, or the body stream broke mid-transfer.
    #[error("TTS request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status.
    #[error("TTS endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Local disk write failed.
    #[error("failed to write audio file: {0}")]
    StreamWrite(#[source] std::io::Error),
}

impl ConversionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network(_) | Self::Status { .. } => ErrorCode::Network,
            Self::StreamWrite(_) => ErrorCode::StreamWrite,
        }
    }
}
