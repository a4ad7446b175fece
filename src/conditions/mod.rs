//! condition system for receipt rules
//!
//! compiles a JSON spec into a condition tree and evaluates it against receipts:
//! - logical operators: $and, $or, $not
//! - leaves: amount, currency, date, time, header, paymentMethod, placeType, placeTypeCategory
//! - comparison operators: ==, !=, >, >=, <, <= (multiple forms)
//!
//! trees are immutable once parsed and can be shared across threads

mod eval;
mod parser;
mod time;
mod types;

pub use eval::evaluate;
pub use parser::{known_keys, parse_condition, parse_optional, ParseError, ParseErrorKind};
pub use time::{parse_time, DateComponent, Relation, TimeOfDay};
pub use types::{keys, CompareOp, Condition, HeaderExpectation, HeaderPattern};
