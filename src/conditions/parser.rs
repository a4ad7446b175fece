//! condition parser - converts a JSON spec into a condition tree
//!
//! every spec object has exactly one key, looked up in [`FACTORIES`]:
//! - `$and` / `$or` take an array of nested specs
//! - `$not` takes a single nested spec
//! - leaf keys take their own argument shapes, validated by their factory
//!
//! parsing either yields a complete tree or fails without producing one

use std::str::FromStr;

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::time::{parse_time, DateComponent, Relation};
use super::types::{keys, CompareOp, Condition, HeaderExpectation, HeaderPattern};

/// what went wrong while parsing a spec
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("empty condition spec")]
    EmptySpec,
    #[error("expected a condition object, got {0}")]
    ExpectedObject(&'static str),
    #[error("condition object must have exactly one key, found {}", .0.join(", "))]
    MultipleKeys(Vec<String>),
    #[error("unknown condition key '{key}'{}", did_you_mean(.suggestion))]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
    },
    #[error("'{0}' must be an array of conditions")]
    MalformedCombinator(String),
    #[error("invalid arguments for '{key}': {reason}")]
    MalformedLeafArguments { key: String, reason: String },
    #[error("invalid time '{0}': expected HH:MM or HH:MM:SS")]
    MalformedTimeString(String),
    #[error("invalid spec text: {0}")]
    Syntax(String),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

/// error type for parsing conditions, with the path of the offending node
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}{kind}", path_prefix(.path))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// e.g. `$and[1].amount`, empty for the root
    pub path: String,
}

fn path_prefix(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{}: ", path)
    }
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    fn malformed(key: &str, reason: impl Into<String>, path: &str) -> Self {
        Self::new(
            ParseErrorKind::MalformedLeafArguments {
                key: key.to_string(),
                reason: reason.into(),
            },
            path,
        )
    }
}

/// builds a condition from the value stored under its key
type Factory = fn(&JsonValue, &str) -> Result<Condition, ParseError>;

/// dispatch table of every recognized spec key
const FACTORIES: &[(&str, Factory)] = &[
    (keys::AND, parse_and),
    (keys::OR, parse_or),
    (keys::NOT, parse_not),
    (keys::AMOUNT, parse_amount),
    (keys::CURRENCY, parse_currency),
    (keys::DATE, parse_date),
    (keys::TIME, parse_time_condition),
    (keys::HEADER, parse_header),
    (keys::PAYMENT_METHOD, parse_payment_method),
    (keys::PLACE_TYPE, parse_place_type),
    (keys::PLACE_TYPE_CATEGORY, parse_place_type_category),
];

/// max edit distance for "did you mean" suggestions
const SUGGESTION_DISTANCE: usize = 3;

/// all keys the parser accepts
pub fn known_keys() -> impl Iterator<Item = &'static str> {
    FACTORIES.iter().map(|(key, _)| *key)
}

/// parse a JSON spec into a condition tree
///
/// # Returns
/// * `Ok(Condition)` - the root of the parsed tree
/// * `Err(ParseError)` - if any node of the spec is invalid
pub fn parse_condition(json: &JsonValue) -> Result<Condition, ParseError> {
    let condition = parse_node(json, "")?;
    log::debug!("compiled condition: {}", condition);
    Ok(condition)
}

/// parse a spec that may be absent entirely
pub fn parse_optional(json: Option<&JsonValue>) -> Result<Condition, ParseError> {
    match json {
        Some(json) => parse_condition(json),
        None => Err(ParseError::new(ParseErrorKind::EmptySpec, "")),
    }
}

impl TryFrom<JsonValue> for Condition {
    type Error = ParseError;

    fn try_from(json: JsonValue) -> Result<Self, Self::Error> {
        parse_condition(&json)
    }
}

impl FromStr for Condition {
    type Err = ParseError;

    /// parse spec text (JSON or JSON5)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ParseError::new(ParseErrorKind::EmptySpec, ""));
        }
        let json: JsonValue = json5::from_str(s)
            .map_err(|e| ParseError::new(ParseErrorKind::Syntax(e.to_string()), ""))?;
        parse_condition(&json)
    }
}

fn parse_node(json: &JsonValue, path: &str) -> Result<Condition, ParseError> {
    let obj = match json {
        JsonValue::Object(obj) => obj,
        JsonValue::Null => return Err(ParseError::new(ParseErrorKind::EmptySpec, path)),
        other => {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedObject(type_name(other)),
                path,
            ))
        }
    };

    let (key, value) = sole_entry(obj, path)?;

    let factory = FACTORIES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, factory)| *factory)
        .ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::UnknownKey {
                    key: key.to_string(),
                    suggestion: suggest_key(key),
                },
                path,
            )
        })?;

    factory(value, &join_path(path, key))
}

fn sole_entry<'a>(
    obj: &'a Map<String, JsonValue>,
    path: &str,
) -> Result<(&'a str, &'a JsonValue), ParseError> {
    let mut entries = obj.iter();
    match (entries.next(), entries.next()) {
        (None, _) => Err(ParseError::new(ParseErrorKind::EmptySpec, path)),
        (Some((key, value)), None) => Ok((key.as_str(), value)),
        (Some(_), Some(_)) => Err(ParseError::new(
            ParseErrorKind::MultipleKeys(obj.keys().cloned().collect()),
            path,
        )),
    }
}

fn suggest_key(key: &str) -> Option<String> {
    let key_lower = key.to_lowercase();
    known_keys()
        .map(|k| (k, strsim::levenshtein(&key_lower, &k.to_lowercase())))
        .filter(|(_, distance)| *distance <= SUGGESTION_DISTANCE)
        .min_by_key(|(_, distance)| *distance)
        .map(|(k, _)| k.to_string())
}

fn join_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}

fn type_name(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

// ============================================================================
// Combinators
// ============================================================================

fn parse_children(value: &JsonValue, key: &str, path: &str) -> Result<Vec<Condition>, ParseError> {
    let arr = value.as_array().ok_or_else(|| {
        ParseError::new(ParseErrorKind::MalformedCombinator(key.to_string()), path)
    })?;

    arr.iter()
        .enumerate()
        .map(|(i, v)| parse_node(v, &format!("{}[{}]", path, i)))
        .collect()
}

fn parse_and(value: &JsonValue, path: &str) -> Result<Condition, ParseError> {
    Ok(Condition::And(parse_children(value, keys::AND, path)?))
}

fn parse_or(value: &JsonValue, path: &str) -> Result<Condition, ParseError> {
    Ok(Condition::Or(parse_children(value, keys::OR, path)?))
}

fn parse_not(value: &JsonValue, path: &str) -> Result<Condition, ParseError> {
    let inner = parse_node(value, path)?;
    Ok(Condition::Not(Box::new(inner)))
}

// ============================================================================
// Leaf Conditions
// ============================================================================

/// destructure a fixed-size argument array
fn leaf_args<'a>(
    value: &'a JsonValue,
    key: &str,
    shape: &str,
    path: &str,
) -> Result<&'a [JsonValue], ParseError> {
    let arity = shape.split(',').count();
    match value.as_array() {
        Some(arr) if arr.len() == arity => Ok(arr),
        Some(arr) => Err(ParseError::malformed(
            key,
            format!("expected [{}], got {} element(s)", shape, arr.len()),
            path,
        )),
        None => Err(ParseError::malformed(
            key,
            format!("expected [{}], got {}", shape, type_name(value)),
            path,
        )),
    }
}

fn leaf_str<'a>(
    value: &'a JsonValue,
    key: &str,
    what: &str,
    path: &str,
) -> Result<&'a str, ParseError> {
    value.as_str().ok_or_else(|| {
        ParseError::malformed(
            key,
            format!("{} must be a string, got {}", what, type_name(value)),
            path,
        )
    })
}

fn leaf_op(value: &JsonValue, key: &str, path: &str) -> Result<CompareOp, ParseError> {
    let op = leaf_str(value, key, "operator", path)?;
    CompareOp::parse(op)
        .ok_or_else(|| ParseError::malformed(key, format!("unknown operator '{}'", op), path))
}

fn parse_amount(value: &JsonValue, path: &str) -> Result<Condition, ParseError> {
    let key = keys::AMOUNT;
    let args = leaf_args(value, key, "operator, number", path)?;

    let op = leaf_op(&args[0], key, path)?;
    let threshold = args[1].as_f64().ok_or_else(|| {
        ParseError::malformed(
            key,
            format!("threshold must be a number, got {}", type_name(&args[1])),
            path,
        )
    })?;

    Ok(Condition::Amount {
        op,
        value: threshold,
    })
}

fn parse_currency(value: &JsonValue, path: &str) -> Result<Condition, ParseError> {
    let currency = leaf_str(value, keys::CURRENCY, "currency", path)?;
    Ok(Condition::Currency(currency.to_string()))
}

fn parse_date(value: &JsonValue, path: &str) -> Result<Condition, ParseError> {
    let key = keys::DATE;
    let args = leaf_args(value, key, "component, operator, value", path)?;

    let name = leaf_str(&args[0], key, "component", path)?;
    let component = DateComponent::parse(name).ok_or_else(|| {
        ParseError::malformed(key, format!("unknown date component '{}'", name), path)
    })?;
    let op = leaf_op(&args[1], key, path)?;
    let expected = parse_date_value(component, &args[2], path)?;

    Ok(Condition::Date {
        component,
        op,
        value: expected,
    })
}

fn parse_date_value(
    component: DateComponent,
    value: &JsonValue,
    path: &str,
) -> Result<i32, ParseError> {
    let key = keys::DATE;
    let n = match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| {
                ParseError::malformed(key, format!("{} must be a whole number", n), path)
            })?,
        JsonValue::String(s) => component.parse_name(s).ok_or_else(|| {
            ParseError::malformed(
                key,
                format!("'{}' is not a valid {} value", s, component.name()),
                path,
            )
        })?,
        other => {
            return Err(ParseError::malformed(
                key,
                format!("value must be a number, got {}", type_name(other)),
                path,
            ))
        }
    };

    if let Some((min, max)) = component.range() {
        if n < min || n > max {
            return Err(ParseError::malformed(
                key,
                format!("{} must be between {} and {}", component.name(), min, max),
                path,
            ));
        }
    }

    Ok(n)
}

fn parse_time_condition(value: &JsonValue, path: &str) -> Result<Condition, ParseError> {
    let key = keys::TIME;
    let args = leaf_args(value, key, "relation, time", path)?;

    let name = leaf_str(&args[0], key, "relation", path)?;
    let relation = Relation::parse(name).ok_or_else(|| {
        ParseError::malformed(
            key,
            format!("unknown relation '{}': use before, after, or at", name),
            path,
        )
    })?;

    let text = leaf_str(&args[1], key, "time", path)?;
    let time = parse_time(text)
        .ok_or_else(|| ParseError::new(ParseErrorKind::MalformedTimeString(text.to_string()), path))?;

    Ok(Condition::Time { time, relation })
}

fn parse_header(value: &JsonValue, path: &str) -> Result<Condition, ParseError> {
    let key = keys::HEADER;
    let args = leaf_args(value, key, "key, expected", path)?;

    let source = leaf_str(&args[0], key, "header key", path)?;
    let pattern = HeaderPattern::parse(source).map_err(|e| ParseError::malformed(key, e, path))?;

    let expected = match &args[1] {
        JsonValue::Bool(b) => HeaderExpectation::Present(*b),
        JsonValue::String(s) => HeaderExpectation::Value(s.clone()),
        other => {
            return Err(ParseError::malformed(
                key,
                format!("expected value must be a boolean or string, got {}", type_name(other)),
                path,
            ))
        }
    };

    Ok(Condition::Header { pattern, expected })
}

fn parse_payment_method(value: &JsonValue, path: &str) -> Result<Condition, ParseError> {
    let method = leaf_str(value, keys::PAYMENT_METHOD, "payment method", path)?;
    Ok(Condition::PaymentMethod(method.to_string()))
}

fn parse_place_type(value: &JsonValue, path: &str) -> Result<Condition, ParseError> {
    let place_type = leaf_str(value, keys::PLACE_TYPE, "place type", path)?;
    Ok(Condition::PlaceType(place_type.to_string()))
}

fn parse_place_type_category(value: &JsonValue, path: &str) -> Result<Condition, ParseError> {
    let category = leaf_str(value, keys::PLACE_TYPE_CATEGORY, "place type category", path)?;
    Ok(Condition::PlaceTypeCategory(category.to_string()))
}
