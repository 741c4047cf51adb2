//! Error handling

use std::path::PathBuf;

use crate::constants::RETRYABLE_STATUSES;
use crate::openai::TransportError;

/// Errors raised while generating backgrounds.
#[derive(Debug)]
pub enum GeneratorError {
    /// `OPENAI_API_KEY` was missing or blank
    MissingApiKey,
    /// The API answered with a status we don't retry
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },
    /// A successful response carried neither base64 data nor a URL
    MissingImageData(String),
    /// Following the image URL returned a non-success status
    Download {
        /// HTTP status code of the download
        status: u16,
    },
    /// A transport failure that isn't worth retrying
    Transport(TransportError),
    /// Every attempt hit a retryable failure
    RetriesExhausted {
        /// How many attempts were made
        attempts: u32,
        /// The last retryable failure seen
        last: String,
    },
    /// Response JSON didn't parse
    Parse(serde_json::Error),
    /// Inline image data wasn't valid base64
    Base64(base64::DecodeError),
    /// The returned image URL wasn't a URL
    InvalidUrl(url::ParseError),
    /// Reading or writing a file failed
    Io {
        /// The file or directory involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

impl GeneratorError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// One-line description for retry warnings. API errors only give their
    /// status, the body is kept for the final error.
    pub fn summary(&self) -> String {
        match self {
            Self::Api { status, .. } => format!("HTTP {status}"),
            other => other.to_string(),
        }
    }

    /// Rate limits, 5xx responses and network failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => RETRYABLE_STATUSES.contains(status),
            Self::Transport(err) => err.is_retryable(),
            _ => false,
        }
    }
}

impl std::fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "Missing OPENAI_API_KEY env var. Set it and rerun."),
            Self::Api { status, body } => write!(f, "HTTP {status}: {body}"),
            Self::MissingImageData(body) => write!(f, "No image data in response: {body}"),
            Self::Download { status } => write!(f, "Image download error: HTTP {status}"),
            Self::Transport(err) => write!(f, "Request failed: {err}"),
            Self::RetriesExhausted { attempts, last } => {
                write!(f, "Failed after {attempts} attempts (last error: {last})")
            }
            Self::Parse(err) => write!(f, "Failed to parse images response JSON: {err}"),
            Self::Base64(err) => write!(f, "Failed to base64-decode image: {err}"),
            Self::InvalidUrl(err) => write!(f, "Invalid image URL in response: {err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Base64(err) => Some(err),
            Self::InvalidUrl(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(err: serde_json::Error) -> Self {
        GeneratorError::Parse(err)
    }
}

impl From<base64::DecodeError> for GeneratorError {
    fn from(err: base64::DecodeError) -> Self {
        GeneratorError::Base64(err)
    }
}

impl From<url::ParseError> for GeneratorError {
    fn from(err: url::ParseError) -> Self {
        GeneratorError::InvalidUrl(err)
    }
}
