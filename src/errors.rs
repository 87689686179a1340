//! Error types shared across the console.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Request attributes failed local validation before submission.
    Validation(String),
    /// Network-level failure talking to the policy decision service.
    Transport(String),
    /// Policy decision service answered with a non-success HTTP status.
    UnexpectedStatus(u16),
    /// Response body could not be decoded into the expected shape.
    MalformedResponse(String),
    /// Policy decision service returned a decision outside the known set.
    UnrecognizedDecision(String),
    /// Terminal or file-system I/O failure.
    Io(String),
}

impl AppError {
    /// Whether this error means no usable policy answer was obtained.
    ///
    /// Every such error is folded into a fail-closed `deny` by the
    /// decision client and into the fallback entry by the audit store.
    #[must_use]
    pub fn is_communication_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::UnexpectedStatus(_)
                | Self::MalformedResponse(_)
                | Self::UnrecognizedDecision(_)
        )
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::UnexpectedStatus(code) => write!(f, "unexpected status: {code}"),
            Self::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
            Self::UnrecognizedDecision(value) => write!(f, "unrecognized decision: {value}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
