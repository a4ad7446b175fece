//! core types for the condition system

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use super::time::{DateComponent, Relation, TimeOfDay};

/// spec keys recognized by the parser
pub mod keys {
    pub const AND: &str = "$and";
    pub const OR: &str = "$or";
    pub const NOT: &str = "$not";

    pub const AMOUNT: &str = "amount";
    pub const CURRENCY: &str = "currency";
    pub const DATE: &str = "date";
    pub const TIME: &str = "time";
    pub const HEADER: &str = "header";
    pub const PAYMENT_METHOD: &str = "paymentMethod";
    pub const PLACE_TYPE: &str = "placeType";
    pub const PLACE_TYPE_CATEGORY: &str = "placeTypeCategory";
}

/// comparison operators supported in conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// equality: ==, eq, equals
    Eq,
    /// inequality: !=, ne, not_equals
    Ne,
    /// greater than: >, gt, greater_than
    Gt,
    /// greater than or equal: >=, gte, greater_than_or_equal
    Gte,
    /// less than: <, lt, less_than
    Lt,
    /// less than or equal: <=, lte, less_than_or_equal
    Lte,
}

impl CompareOp {
    /// parse operator from string (supports all forms)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "==" | "eq" | "equals" => Some(CompareOp::Eq),
            "!=" | "ne" | "not_equals" => Some(CompareOp::Ne),
            ">" | "gt" | "greater_than" => Some(CompareOp::Gt),
            ">=" | "gte" | "greater_than_or_equal" => Some(CompareOp::Gte),
            "<" | "lt" | "less_than" => Some(CompareOp::Lt),
            "<=" | "lte" | "less_than_or_equal" => Some(CompareOp::Lte),
            _ => None,
        }
    }

    /// canonical symbol, used when rendering a condition back into a spec
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }

    /// apply the operator as `actual <op> expected`
    ///
    /// incomparable values (NaN) only satisfy `!=`
    pub fn apply<T: PartialOrd>(&self, actual: T, expected: T) -> bool {
        match self {
            CompareOp::Eq => actual == expected,
            CompareOp::Ne => actual != expected,
            CompareOp::Gt => actual > expected,
            CompareOp::Gte => actual >= expected,
            CompareOp::Lt => actual < expected,
            CompareOp::Lte => actual <= expected,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// pattern locating a header line
///
/// `/regex/flags` is used as a regular expression (flag `i` = case-insensitive),
/// anything else is a case-insensitive substring
#[derive(Debug, Clone)]
pub struct HeaderPattern {
    source: String,
    regex: Regex,
}

impl HeaderPattern {
    pub fn parse(source: &str) -> Result<Self, String> {
        if source.is_empty() {
            return Err("header key must not be empty".to_string());
        }

        let regex = match split_regex_literal(source) {
            Some((pattern, flags)) => RegexBuilder::new(pattern)
                .case_insensitive(flags.contains('i'))
                .build()
                .map_err(|e| format!("invalid header regex '{}': {}", pattern, e))?,
            None => RegexBuilder::new(&regex::escape(source))
                .case_insensitive(true)
                .build()
                .map_err(|e| e.to_string())?,
        };

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// the key exactly as written in the spec
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// text following each match in `line`, without leading separators
    pub fn values_after<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.regex.find_iter(line).map(move |m| {
            line[m.end()..]
                .trim_start_matches(|c: char| c == ':' || c == '=' || c.is_whitespace())
                .trim_end()
        })
    }
}

impl PartialEq for HeaderPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

fn split_regex_literal(s: &str) -> Option<(&str, &str)> {
    let rest = s.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    if end == 0 {
        return None;
    }
    Some((&rest[..end], &rest[end + 1..]))
}

/// what a header condition expects from the matching line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderExpectation {
    /// a matching line must (true) or must not (false) exist
    Present(bool),
    /// a matching line must carry this value after the key
    Value(String),
}

/// the condition AST - one variant per recognized spec key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JsonValue", into = "JsonValue")]
pub enum Condition {
    /// all conditions must be true (AND)
    And(Vec<Condition>),
    /// any condition must be true (OR)
    Or(Vec<Condition>),
    /// negate a condition (NOT)
    Not(Box<Condition>),
    /// receipt total compared against a threshold
    Amount { op: CompareOp, value: f64 },
    /// exact currency code
    Currency(String),
    /// calendar component of the receipt timestamp
    Date {
        component: DateComponent,
        op: CompareOp,
        value: i32,
    },
    /// time of day of the receipt timestamp
    Time { time: TimeOfDay, relation: Relation },
    /// header line presence or value
    Header {
        pattern: HeaderPattern,
        expected: HeaderExpectation,
    },
    /// exact payment method identifier
    PaymentMethod(String),
    /// exact place type
    PlaceType(String),
    /// exact place type category
    PlaceTypeCategory(String),
}

impl Condition {
    /// create an AND condition
    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition::And(conditions)
    }

    /// create an OR condition
    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition::Or(conditions)
    }

    /// create a NOT condition
    pub fn negate(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    /// the spec key this node was parsed from
    pub fn key(&self) -> &'static str {
        match self {
            Condition::And(_) => keys::AND,
            Condition::Or(_) => keys::OR,
            Condition::Not(_) => keys::NOT,
            Condition::Amount { .. } => keys::AMOUNT,
            Condition::Currency(_) => keys::CURRENCY,
            Condition::Date { .. } => keys::DATE,
            Condition::Time { .. } => keys::TIME,
            Condition::Header { .. } => keys::HEADER,
            Condition::PaymentMethod(_) => keys::PAYMENT_METHOD,
            Condition::PlaceType(_) => keys::PLACE_TYPE,
            Condition::PlaceTypeCategory(_) => keys::PLACE_TYPE_CATEGORY,
        }
    }

    /// check if this is a leaf (has no child conditions)
    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            Condition::And(_) | Condition::Or(_) | Condition::Not(_)
        )
    }

    /// render the condition back into its spec form
    pub fn to_spec(&self) -> JsonValue {
        let value = match self {
            Condition::And(conditions) | Condition::Or(conditions) => {
                JsonValue::Array(conditions.iter().map(Condition::to_spec).collect())
            }
            Condition::Not(inner) => inner.to_spec(),
            Condition::Amount { op, value } => json!([op.symbol(), value]),
            Condition::Currency(s)
            | Condition::PaymentMethod(s)
            | Condition::PlaceType(s)
            | Condition::PlaceTypeCategory(s) => json!(s),
            Condition::Date {
                component,
                op,
                value,
            } => json!([component.name(), op.symbol(), value]),
            Condition::Time { time, relation } => json!([relation.name(), time.to_string()]),
            Condition::Header { pattern, expected } => match expected {
                HeaderExpectation::Present(flag) => json!([pattern.source(), flag]),
                HeaderExpectation::Value(v) => json!([pattern.source(), v]),
            },
        };

        let mut spec = serde_json::Map::new();
        spec.insert(self.key().to_string(), value);
        JsonValue::Object(spec)
    }
}

impl From<Condition> for JsonValue {
    fn from(condition: Condition) -> Self {
        condition.to_spec()
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, conditions: &[Condition]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, c) in conditions.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::And(conditions) => write_list(f, "all", conditions),
            Condition::Or(conditions) => write_list(f, "any", conditions),
            Condition::Not(inner) => write!(f, "not({})", inner),
            Condition::Amount { op, value } => write!(f, "amount {} {}", op, value),
            Condition::Currency(s) => write!(f, "currency == \"{}\"", s),
            Condition::Date {
                component,
                op,
                value,
            } => write!(f, "date.{} {} {}", component.name(), op, value),
            Condition::Time { time, relation } => write!(f, "time {} {}", relation.name(), time),
            Condition::Header { pattern, expected } => match expected {
                HeaderExpectation::Present(true) => {
                    write!(f, "header \"{}\" present", pattern.source())
                }
                HeaderExpectation::Present(false) => {
                    write!(f, "header \"{}\" absent", pattern.source())
                }
                HeaderExpectation::Value(v) => {
                    write!(f, "header \"{}\" == \"{}\"", pattern.source(), v)
                }
            },
            Condition::PaymentMethod(s) => write!(f, "paymentMethod == \"{}\"", s),
            Condition::PlaceType(s) => write!(f, "placeType == \"{}\"", s),
            Condition::PlaceTypeCategory(s) => write!(f, "placeTypeCategory == \"{}\"", s),
        }
    }
}
