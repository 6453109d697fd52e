//! Typed domain errors (spec §7).
//!
//! Every fallible entry point in this crate returns [`ZuiError`]. Each
//! variant carries a stable `code` string so hosts can match on it without
//! depending on `Display` text.

use thiserror::Error;

use crate::instance::InstanceId;

/// The runtime's single error type. One variant per §7 error kind.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ZuiError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("allocation failed: {0}")]
    Oom(String),

    #[error("limit exceeded: {0}")]
    Limit(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("malformed data at byte offset {offset}: {reason}")]
    Format { offset: usize, reason: String },

    #[error("platform I/O failure: {0}")]
    Platform(String),

    #[error("invalid lifecycle state: {0}")]
    InvalidState(String),

    #[error("reentrant call into the runtime: {0}")]
    Reentrant(String),

    #[error("conflicting rendering modes: {0}")]
    ModeConflict(String),

    #[error("duplicate key {key:?} among siblings")]
    DuplicateKey { key: String },

    #[error("duplicate id {id:?} in committed tree")]
    DuplicateId { id: String },

    #[error("protocol violation: {0}")]
    Protocol(String),

    #[error("user code panicked in {0}")]
    UserCodeThrow(String),
}

impl ZuiError {
    /// The stable `code` string from §7, e.g. `"INVALID_ARGUMENT"`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Oom(_) => "OOM",
            Self::Limit(_) => "LIMIT",
            Self::Unsupported(_) => "UNSUPPORTED",
            Self::Format { .. } => "FORMAT",
            Self::Platform(_) => "PLATFORM",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Reentrant(_) => "REENTRANT_CALL",
            Self::ModeConflict(_) => "MODE_CONFLICT",
            Self::DuplicateKey { .. } => "DUPLICATE_KEY",
            Self::DuplicateId { .. } => "DUPLICATE_ID",
            Self::Protocol(_) => "PROTOCOL_ERROR",
            Self::UserCodeThrow(_) => "USER_CODE_THROW",
        }
    }

    pub(crate) fn format(offset: usize, reason: impl Into<String>) -> Self {
        Self::Format { offset, reason: reason.into() }
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    pub(crate) fn limit(reason: impl Into<String>) -> Self {
        Self::Limit(reason.into())
    }
}

/// A fatal runtime event (spec §4.5, §7): hook/reconciler invariants are
/// fatal rather than recoverable. The scheduler surfaces these to the host
/// instead of unwinding.
#[derive(Debug, Clone, PartialEq)]
pub struct FatalEvent {
    pub error: ZuiError,
    pub instance: Option<InstanceId>,
}

impl FatalEvent {
    #[must_use]
    pub fn new(error: ZuiError) -> Self {
        Self { error, instance: None }
    }

    #[must_use]
    pub fn on_instance(error: ZuiError, instance: InstanceId) -> Self {
        Self { error, instance: Some(instance) }
    }
}

pub type ZuiResult<T> = Result<T, ZuiError>;
