//! Error types for the agenda ecosystem.

use thiserror::Error;

/// Errors that can occur in agenda operations.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Event conflicts with '{title}' ({id}). Please choose a different time.")]
    Conflict { id: String, title: String },

    #[error("Invalid event: {0}")]
    Validation(String),

    #[error("Import format error: {0}")]
    ImportFormat(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("Sync error: {0}")]
    Sync(String),

    #[error("Holiday lookup failed: {0}")]
    Holiday(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification used when rendering an error as a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The candidate overlaps an existing event; nothing was applied.
    Conflict,
    /// Bad input (recurrence parameters, import text, stale ids); nothing was applied.
    Validation,
    /// A collaborator or the environment failed.
    External,
}

impl AgendaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AgendaError::Conflict { .. } => ErrorKind::Conflict,
            AgendaError::Validation(_)
            | AgendaError::ImportFormat(_)
            | AgendaError::EventNotFound(_) => ErrorKind::Validation,
            _ => ErrorKind::External,
        }
    }
}

/// Result type alias for agenda operations.
pub type AgendaResult<T> = Result<T, AgendaError>;
