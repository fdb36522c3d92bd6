use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure classes the console reacts to differently.
///
/// - `Validation` / `Referential`: payload defect, the draft returns to editing.
/// - `Transport`: the collaborator call failed, the draft is kept and the user may retry.
/// - `NotFound`: the edit target vanished server-side, the edit session ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Referential,
    Transport,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Referential => "referential",
            ErrorKind::Transport => "transport",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal",
        }
    }

    /// Whether an edit session can continue with its draft intact after this error.
    pub fn keeps_draft(&self) -> bool {
        !matches!(self, ErrorKind::NotFound)
    }
}

/// Single structured error shape used across the core and exposed to the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    /// Form field path the error points at (`name`, `conditions[0].threshold`, ...).
    pub field: Option<String>,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            code: code.into(),
            message: message.into(),
            field: None,
            details: None,
            retryable: false,
        }
    }

    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message).with_kind(ErrorKind::Validation)
    }

    pub fn referential(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message).with_kind(ErrorKind::Referential)
    }

    pub fn transport(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message)
            .with_kind(ErrorKind::Transport)
            .with_retryable(true)
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message).with_kind(ErrorKind::NotFound)
    }

    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{}] {} ({field})", self.code, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for AppError {}
