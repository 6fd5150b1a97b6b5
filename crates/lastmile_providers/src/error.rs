use serde::Serialize;
use thiserror::Error;

/// Length kept from a non-success response body.
pub const ERROR_BODY_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    Timeout,
    Connect,
    Other,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransportKind::Timeout => "Timeout",
                TransportKind::Connect => "Connect",
                TransportKind::Other => "Transport",
            }
        )
    }
}

/// Why a single provider call did not produce a result.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ProviderError {
    #[error("no token")]
    MissingCredential,

    #[error("{kind}: {message}")]
    Transport { kind: TransportKind, message: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("{message}")]
    NoRoute { message: String },

    #[error("invalid response: {message}")]
    Decode { message: String },
}

impl ProviderError {
    pub fn http(status: u16, body: &str) -> Self {
        ProviderError::Http {
            status,
            body: truncate_chars(body, ERROR_BODY_LIMIT).to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Only answers the provider actually gave are worth remembering.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, ProviderError::NoRoute { .. })
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportKind::Timeout
        } else if error.is_connect() {
            TransportKind::Connect
        } else {
            TransportKind::Other
        };

        // The URL carries the access token.
        ProviderError::Transport {
            kind,
            message: error.without_url().to_string(),
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(error: serde_json::Error) -> Self {
        ProviderError::Decode {
            message: error.to_string(),
        }
    }
}

/// Cuts `text` to at most `limit` characters without splitting one.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
