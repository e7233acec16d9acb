//! Shared error type across attrsieve crates.

use thiserror::Error;

/// Stable diagnostic codes (logged and asserted on by tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid or malformed configuration.
    ConfigInvalid,
    /// Bilateral overrides configured but no relying-party id in the request.
    MissingEntityId,
}

impl ErrorCode {
    /// String representation used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalid => "CONFIG_INVALID",
            ErrorCode::MissingEntityId => "MISSING_ENTITY_ID",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, AttrSieveError>;

/// Unified error type used by core and engine.
#[derive(Debug, Error)]
pub enum AttrSieveError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("missing relying-party entityid: {0}")]
    MissingEntityId(String),
}

impl AttrSieveError {
    /// Map internal error to a stable diagnostic code.
    pub fn code(&self) -> ErrorCode {
        match self {
            AttrSieveError::Config(_) => ErrorCode::ConfigInvalid,
            AttrSieveError::MissingEntityId(_) => ErrorCode::MissingEntityId,
        }
    }
}
