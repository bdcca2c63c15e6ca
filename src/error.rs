//! Error Types
//!
//! Library-level errors for the relay. The binary and CLI wrap these in
//! `anyhow` at the outer boundary.

use crate::tts::ConversionError;
use thiserror::Error;

/// Broad error category, used for logging and exit diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A required setting is missing or malformed. Fatal at startup.
    Configuration,
    /// The TTS endpoint is unreachable or answered with an error status.
    Network,
    /// Writing the audio stream to local disk failed.
    StreamWrite,
    /// A Telegram Bot API call (reply, upload, delete) failed.
    PlatformApi,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Network => "network",
            Self::StreamWrite => "stream_write",
            Self::PlatformApi => "platform_api",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Telegram API request failed: {0}")]
    Platform(#[from] teloxide::RequestError),

    #[error("scratch directory error: {0}")]
    Scratch(#[source] std::io::Error),
}

impl RelayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Config(_) | Self::Scratch(_) => ErrorCode::Configuration,
            Self::Conversion(e) => e.code(),
            Self::Platform(_) => ErrorCode::PlatformApi,
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_code() {
        let err = RelayError::Config("TTS_API_URL is not set".to_string());
        assert_eq!(err.code(), ErrorCode::Configuration);
        assert!(err.to_string().contains("TTS_API_URL"));
    }

    #[test]
    fn test_conversion_error_code_passthrough() {
        let io = std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full");
        let err = RelayError::from(ConversionError::StreamWrite(io));
        assert_eq!(err.code(), ErrorCode::StreamWrite);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::PlatformApi.to_string(), "platform_api");
        assert_eq!(ErrorCode::Network.to_string(), "network");
    }
}
