//! result and error rendering for rcond
//!
//! machine-readable output is a JSON-RPC 2.0 envelope with a null id:
//! `{"jsonrpc":"2.0","result":...,"id":null}` on success and
//! `{"jsonrpc":"2.0","error":{"code":N,"message":"...","data":...},"id":null}` on failure

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::io::IsTerminal;

use super::error::CliError;

const JSONRPC_VERSION: &str = "2.0";

/// application errors live below -32000, offset by the exit code
const APP_ERROR_BASE: i32 = -32000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
    /// nothing on success, errors still reported
    Quiet,
}

impl OutputMode {
    /// quiet wins over --json, which wins over --no-json; otherwise JSON when piped
    pub fn from_flags(json: bool, no_json: bool, quiet: bool) -> Self {
        match (quiet, json, no_json) {
            (true, _, _) => Self::Quiet,
            (false, true, _) => Self::Json,
            (false, false, true) => Self::Text,
            (false, false, false) if std::io::stdout().is_terminal() => Self::Text,
            (false, false, false) => Self::Json,
        }
    }

    pub fn is_json(&self) -> bool {
        *self == Self::Json
    }

    pub fn is_quiet(&self) -> bool {
        *self == Self::Quiet
    }
}

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorObject>,
    id: Option<u64>,
}

impl<T: Serialize> Envelope<T> {
    fn success(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result: Some(result),
            error: None,
            id: None,
        }
    }
}

impl Envelope<()> {
    fn failure(err: &CliError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result: None,
            error: Some(ErrorObject::from(err)),
            id: None,
        }
    }
}

#[derive(Serialize)]
struct ErrorObject {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ErrorData>,
}

#[derive(Serialize)]
struct ErrorData {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    suggestions: Vec<String>,
    /// path of the failing spec node
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl From<&CliError> for ErrorObject {
    fn from(err: &CliError) -> Self {
        let data = (!err.suggestions.is_empty() || err.details.is_some()).then(|| ErrorData {
            suggestions: err.suggestions.clone(),
            details: err.details.clone(),
        });

        Self {
            code: jsonrpc_code(err.code),
            message: err.message.clone(),
            data,
        }
    }
}

fn jsonrpc_code(exit_code: i32) -> i32 {
    APP_ERROR_BASE - exit_code
}

// result payloads, one per command

#[derive(Serialize)]
pub struct CheckData {
    pub valid: bool,
    /// readable form, e.g. `all(amount > 10, currency == "EUR")`
    pub condition: String,
    pub spec: JsonValue,
}

#[derive(Serialize)]
pub struct EvalData {
    pub matched: bool,
    pub condition: String,
}

#[derive(Serialize)]
pub struct ClassifyData {
    pub matched: Vec<RuleData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct RuleData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyData {
    pub path: String,
    pub valid: bool,
    pub errors: Vec<String>,
}

fn to_line<T: Serialize>(envelope: &Envelope<T>) -> Option<String> {
    match serde_json::to_string(envelope) {
        Ok(line) => Some(line),
        Err(e) => {
            log::error!("failed to encode output: {}", e);
            None
        }
    }
}

pub fn print_json<T: Serialize>(data: &T) {
    if let Some(line) = to_line(&Envelope::success(data)) {
        println!("{}", line);
    }
}

/// JSON errors go to stdout so pipelines can parse them, text errors to stderr
pub fn print_error(mode: OutputMode, err: &CliError) {
    if mode.is_json() {
        if let Some(line) = to_line(&Envelope::failure(err)) {
            println!("{}", line);
        }
        return;
    }

    eprintln!("error: {}", err.message);
    for suggestion in &err.suggestions {
        eprintln!("  did you mean: {}", suggestion);
    }
}
