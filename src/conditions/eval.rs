//! condition evaluator
//!
//! evaluates parsed conditions against a receipt. evaluation never fails:
//! a leaf whose receipt field is missing evaluates to false

use super::time::{DateComponent, Relation, TimeOfDay};
use super::types::{CompareOp, Condition, HeaderExpectation, HeaderPattern};
use crate::receipt::Receipt;

/// evaluate a condition against a receipt
pub fn evaluate(condition: &Condition, receipt: &Receipt) -> bool {
    let result = evaluate_node(condition, receipt);
    log::trace!("{} => {}", condition, result);
    result
}

impl Condition {
    /// evaluate this condition against a receipt
    pub fn evaluate(&self, receipt: &Receipt) -> bool {
        evaluate(self, receipt)
    }
}

fn evaluate_node(condition: &Condition, receipt: &Receipt) -> bool {
    match condition {
        // empty And = true (vacuous truth)
        Condition::And(conditions) => conditions.iter().all(|c| evaluate_node(c, receipt)),
        // empty Or = false
        Condition::Or(conditions) => conditions.iter().any(|c| evaluate_node(c, receipt)),
        Condition::Not(inner) => !evaluate_node(inner, receipt),

        Condition::Amount { op, value } => evaluate_amount(*op, *value, receipt),
        Condition::Currency(currency) => evaluate_currency(currency, receipt),
        Condition::Date {
            component,
            op,
            value,
        } => evaluate_date(*component, *op, *value, receipt),
        Condition::Time { time, relation } => evaluate_time(time, *relation, receipt),
        Condition::Header { pattern, expected } => evaluate_header(pattern, expected, receipt),
        Condition::PaymentMethod(method) => matches_exactly(receipt.payment_method.as_deref(), method),
        Condition::PlaceType(place_type) => matches_exactly(receipt.place_type(), place_type),
        Condition::PlaceTypeCategory(category) => {
            matches_exactly(receipt.place_type_category(), category)
        }
    }
}

// ============================================================================
// Amount Conditions
// ============================================================================

fn evaluate_amount(op: CompareOp, threshold: f64, receipt: &Receipt) -> bool {
    receipt
        .amount
        .as_ref()
        .and_then(|amount| amount.value)
        .is_some_and(|value| op.apply(value, threshold))
}

fn evaluate_currency(currency: &str, receipt: &Receipt) -> bool {
    receipt
        .amount
        .as_ref()
        .and_then(|amount| amount.currency.as_deref())
        .is_some_and(|code| code == currency)
}

// ============================================================================
// Date and Time Conditions
// ============================================================================

fn evaluate_date(component: DateComponent, op: CompareOp, expected: i32, receipt: &Receipt) -> bool {
    match &receipt.timestamp {
        Some(ts) => op.apply(component.extract(ts), expected),
        None => false,
    }
}

fn evaluate_time(time: &TimeOfDay, relation: Relation, receipt: &Receipt) -> bool {
    receipt
        .timestamp
        .is_some_and(|ts| time.matches(relation, ts.time()))
}

// ============================================================================
// Header Conditions
// ============================================================================

fn evaluate_header(pattern: &HeaderPattern, expected: &HeaderExpectation, receipt: &Receipt) -> bool {
    match expected {
        HeaderExpectation::Present(present) => {
            receipt.header.iter().any(|line| pattern.is_match(line)) == *present
        }
        HeaderExpectation::Value(value) => receipt
            .header
            .iter()
            .flat_map(|line| pattern.values_after(line))
            .any(|found| found == value),
    }
}

// ============================================================================
// Identifier Conditions
// ============================================================================

fn matches_exactly(actual: Option<&str>, expected: &str) -> bool {
    actual == Some(expected)
}
