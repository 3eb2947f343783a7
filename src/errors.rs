//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Planner call failed or returned a malformed plan.
    Planner(String),
    /// Capability invocation failed (transport error, bad arguments, timeout).
    Capability(String),
    /// Capability identifier is not registered.
    UnknownCapability(String),
    /// Resume was requested but no pending choice exists for the session.
    NoPendingChoice(String),
    /// Selected choice id is absent from the persisted candidate list.
    ChoiceNotFound(String),
    /// Session store operation failure.
    Store(String),
    /// HTTP surface failure (bind, serve).
    Http(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Planner(msg) => write!(f, "planner: {msg}"),
            Self::Capability(msg) => write!(f, "capability: {msg}"),
            Self::UnknownCapability(msg) => write!(f, "unknown capability: {msg}"),
            Self::NoPendingChoice(msg) => write!(f, "no pending choice: {msg}"),
            Self::ChoiceNotFound(msg) => write!(f, "choice not found: {msg}"),
            Self::Store(msg) => write!(f, "store: {msg}"),
            Self::Http(msg) => write!(f, "http: {msg}"),
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
        Self::Capability(err.to_string())
    }
}
