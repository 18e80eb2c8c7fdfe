//! Filter constraint grammar shared by the translator and the query builder.
//!
//! Callers describe constraints as loosely-typed JSON: a bare scalar means
//! equality, an object with a single operator key selects one of the
//! comparison forms. Parsing is strict: anything outside the grammar is
//! rejected so the translator can fail the whole call atomically.

use std::cmp::Ordering;
use std::{error::Error, fmt};

use indexmap::IndexMap;
use serde_json::Value;

/// Caller-supplied mapping of filter key to raw constraint value.
pub type FilterBag = IndexMap<String, Value>;

/// A raw constraint value that does not fit the constraint grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedConstraint {
    pub reason: String,
}

impl MalformedConstraint {
    fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl fmt::Display for MalformedConstraint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.reason)
    }
}

impl Error for MalformedConstraint {}

/// A parsed field constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterConstraint {
    Equals(Value),
    NotEquals(Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Gt(Value),
    Lt(Value),
    Gteq(Value),
    Lteq(Value),
}

impl FilterConstraint {
    /// Parses a raw constraint value.
    ///
    /// A bare scalar is an equality constraint. An object must carry exactly
    /// one operator key; `in`/`nin` take an array of scalars, the comparison
    /// operators take a single scalar.
    pub fn from_value(raw: &Value) -> Result<Self, MalformedConstraint> {
        match raw {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(Self::Equals(raw.clone())),
            Value::Null => Err(MalformedConstraint::new("constraint value is null")),
            Value::Array(_) => Err(MalformedConstraint::new(
                "bare array is not a constraint; use {\"in\": [..]} for membership",
            )),
            Value::Object(operators) => {
                if operators.len() != 1 {
                    return Err(MalformedConstraint::new(format!(
                        "constraint object must hold exactly one operator, found {}",
                        operators.len()
                    )));
                }
                let (operator, operand) = operators.iter().next().expect("one operator entry");
                match operator.as_str() {
                    "in" => Ok(Self::In(membership_operand(operator, operand)?)),
                    "nin" => Ok(Self::NotIn(membership_operand(operator, operand)?)),
                    "eq" => Ok(Self::Equals(scalar_operand(operator, operand)?)),
                    "neq" => Ok(Self::NotEquals(scalar_operand(operator, operand)?)),
                    "gt" => Ok(Self::Gt(scalar_operand(operator, operand)?)),
                    "lt" => Ok(Self::Lt(scalar_operand(operator, operand)?)),
                    "gteq" => Ok(Self::Gteq(scalar_operand(operator, operand)?)),
                    "lteq" => Ok(Self::Lteq(scalar_operand(operator, operand)?)),
                    unknown => Err(MalformedConstraint::new(format!("unknown filter operator '{unknown}'"))),
                }
            }
        }
    }

    /// Tests an attribute value against this constraint.
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            Self::Equals(expected) => loose_eq(actual, expected),
            Self::NotEquals(expected) => !loose_eq(actual, expected),
            Self::In(set) => set.iter().any(|candidate| loose_eq(actual, candidate)),
            Self::NotIn(set) => !set.iter().any(|candidate| loose_eq(actual, candidate)),
            Self::Gt(bound) => matches!(compare_values(actual, bound), Some(Ordering::Greater)),
            Self::Lt(bound) => matches!(compare_values(actual, bound), Some(Ordering::Less)),
            Self::Gteq(bound) => matches!(compare_values(actual, bound), Some(Ordering::Greater | Ordering::Equal)),
            Self::Lteq(bound) => matches!(compare_values(actual, bound), Some(Ordering::Less | Ordering::Equal)),
        }
    }
}

/// A constraint bound to a canonical catalog field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub constraint: FilterConstraint,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, constraint: FilterConstraint) -> Self {
        Self {
            field: field.into(),
            constraint,
        }
    }
}

fn membership_operand(operator: &str, operand: &Value) -> Result<Vec<Value>, MalformedConstraint> {
    let Value::Array(entries) = operand else {
        return Err(MalformedConstraint::new(format!("operator '{operator}' expects an array operand")));
    };
    if entries.iter().any(|entry| entry.is_array() || entry.is_object()) {
        return Err(MalformedConstraint::new(format!(
            "operator '{operator}' expects an array of scalars"
        )));
    }
    Ok(entries.clone())
}

fn scalar_operand(operator: &str, operand: &Value) -> Result<Value, MalformedConstraint> {
    match operand {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(operand.clone()),
        _ => Err(MalformedConstraint::new(format!("operator '{operator}' expects a scalar operand"))),
    }
}

/// Numeric-tolerant equality: numbers (and numeric strings) compare by
/// value, everything else by structural equality.
fn loose_eq(left: &Value, right: &Value) -> bool {
    if let (Some(left_number), Some(right_number)) = (coerce_f64(left), coerce_f64(right)) {
        return left_number == right_number;
    }
    left == right
}

fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(left_number), Some(right_number)) = (coerce_f64(left), coerce_f64(right)) {
        return left_number.partial_cmp(&right_number);
    }
    match (left, right) {
        (Value::String(left_text), Value::String(right_text)) => Some(left_text.cmp(right_text)),
        _ => None,
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_scalar_parses_as_equality() {
        let constraint = FilterConstraint::from_value(&json!("simple")).expect("parse scalar");
        assert_eq!(constraint, FilterConstraint::Equals(json!("simple")));
    }

    #[test]
    fn tagged_in_parses_as_membership() {
        let constraint = FilterConstraint::from_value(&json!({"in": [10, 11]})).expect("parse in");
        assert_eq!(constraint, FilterConstraint::In(vec![json!(10), json!(11)]));
    }

    #[test]
    fn comparison_operators_parse() {
        let constraint = FilterConstraint::from_value(&json!({"gt": 100})).expect("parse gt");
        assert_eq!(constraint, FilterConstraint::Gt(json!(100)));
    }

    #[test]
    fn malformed_constraints_are_rejected() {
        for raw in [
            json!(null),
            json!([1, 2]),
            json!({}),
            json!({"gt": 1, "lt": 2}),
            json!({"between": [1, 2]}),
            json!({"in": 5}),
            json!({"gt": [1]}),
        ] {
            assert!(FilterConstraint::from_value(&raw).is_err(), "expected rejection of {raw}");
        }
    }

    #[test]
    fn equality_is_numeric_tolerant() {
        let constraint = FilterConstraint::Equals(json!("1"));
        assert!(constraint.matches(&json!(1)));
        assert!(constraint.matches(&json!(1.0)));
        assert!(!constraint.matches(&json!(2)));
    }

    #[test]
    fn ordering_operators_compare_numbers() {
        let constraint = FilterConstraint::Gt(json!(100));
        assert!(constraint.matches(&json!(150.0)));
        assert!(!constraint.matches(&json!(50.0)));
        assert!(!constraint.matches(&json!(100)));
    }

    #[test]
    fn ordering_on_incomparable_values_never_matches() {
        let constraint = FilterConstraint::Lt(json!("abc"));
        assert!(!constraint.matches(&json!(true)));
        assert!(!constraint.matches(&Value::Null));
    }

    #[test]
    fn membership_matches_any_entry() {
        let constraint = FilterConstraint::In(vec![json!(10), json!(11)]);
        assert!(constraint.matches(&json!(11)));
        assert!(!constraint.matches(&json!(12)));
    }
}
