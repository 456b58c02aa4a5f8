/*!
 * Error types for the srt-relay application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Structural reasons a subtitle stream is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    /// The first non-blank line carries no digits
    #[error("missing numeric index line at line {line}")]
    MissingIndexLine { line: usize },

    /// The line after the index is not `HH:MM:SS,mmm --> HH:MM:SS,mmm`
    #[error("invalid time range line at line {line}")]
    InvalidTimeRange { line: usize },

    /// The scan budget or the stream ended before a time range appeared
    #[error("incomplete header")]
    TruncatedHeader,

    /// No index line was found at all
    #[error("no subtitle entries found")]
    NoEntries,

    /// An index line inside the document could not be read as a number
    #[error("invalid index line at input line {line}: '{content}'")]
    InvalidIndexLine { line: usize, content: String },

    /// An index line is the last line of the stream
    #[error("missing time range after index at input line {line}")]
    MissingTimeRange { line: usize },
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The content is not a well-formed subtitle stream
    #[error("Not a valid .srt subtitle file ({0})")]
    MalformedInput(#[from] MalformedInput),

    /// Reading or writing the subtitle file failed
    #[error("Subtitle IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The batch deadline elapsed before the provider answered
    #[error("Provider call timed out after {0} ms")]
    Timeout(u64),

    /// The provider cannot be used with the given settings
    #[error("Provider configuration error: {0}")]
    Configuration(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// At least one batch failed; carries the first root cause
    #[error("Parallel translation failed: {0}")]
    TranslationFailed(String),

    /// The input could not be parsed
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// The request was rejected before any work started
    #[error("Invalid translation request: {0}")]
    InvalidRequest(String),
}

impl From<MalformedInput> for TranslationError {
    fn from(error: MalformedInput) -> Self {
        Self::Subtitle(SubtitleError::MalformedInput(error))
    }
}
