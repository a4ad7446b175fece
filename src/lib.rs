// library crate for rcond
// the condition model is usable on its own; the cli module backs the binary

pub mod cli;
pub mod conditions;
pub mod config;
pub mod receipt;
pub mod rules;

pub use conditions::{parse_condition, Condition, ParseError, ParseErrorKind};
pub use receipt::Receipt;
pub use rules::{Rule, RuleSet};
