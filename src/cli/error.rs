//! command error type

use thiserror::Error;

use super::exit_codes;
use crate::conditions::{ParseError, ParseErrorKind};

/// error returned by command execution
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CliError {
    /// process exit code (maps to JSON-RPC error code via -32000 - code)
    pub code: i32,
    pub message: String,
    /// suggested alternatives (e.g., close condition keys)
    pub suggestions: Vec<String>,
    /// location of the problem, e.g. the path of a failing spec node
    pub details: Option<String>,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            suggestions: Vec::new(),
            details: None,
        }
    }

    pub fn invalid_receipt(message: impl Into<String>) -> Self {
        Self::new(exit_codes::INVALID_RECEIPT, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(exit_codes::CONFIG_ERROR, message)
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self::new(exit_codes::ERROR, message)
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        let suggestions = match &e.kind {
            ParseErrorKind::UnknownKey {
                suggestion: Some(s),
                ..
            } => vec![s.clone()],
            _ => Vec::new(),
        };

        Self {
            code: exit_codes::INVALID_SPEC,
            message: e.to_string(),
            suggestions,
            details: (!e.path.is_empty()).then(|| e.path.clone()),
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(e: anyhow::Error) -> Self {
        CliError::general(format!("{:#}", e))
    }
}
