//! # Raw and Validated Input
//!
//! [`RawInput`] is what a form collects: loosely typed values keyed by field
//! id, built up one field at a time. The evaluation engine turns it into a
//! [`ValidatedInput`], where every value is a [`FieldValue`] of the kind its
//! schema declares. Formulas only ever read validated values.
//!
//! ## JSON Example
//!
//! ```json
//! { "weightKg": 70, "heightCm": "175", "age": 30, "sex": "male" }
//! ```
//!
//! ```rust
//! use calc_core::input::{RawInput, RawValue};
//!
//! let input = RawInput::from_json(r#"{ "weightKg": 70, "sex": "male" }"#).unwrap();
//! assert_eq!(input.get("weightKg"), Some(&RawValue::Number(70.0)));
//! assert_eq!(input.get("sex"), Some(&RawValue::Text("male".to_string())));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Raw Input
// ============================================================================

/// A value exactly as the user supplied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        RawValue::Number(f64::from(value))
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

/// Unvalidated form state: field id -> raw value.
///
/// Keys are kept sorted so iteration and serialization are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput {
    values: BTreeMap<String, RawValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Set (or replace) a field value
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(field.into(), value.into());
    }

    /// Remove a field, returning its previous value
    pub fn remove(&mut self, field: &str) -> Option<RawValue> {
        self.values.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.values.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a JSON object of field id -> number or string.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = RawInput::new();
        for (k, v) in iter {
            input.set(k, v);
        }
        input
    }
}

// ============================================================================
// Validated Values
// ============================================================================

/// A value that passed validation, tagged with the kind of its field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Number(f64),
    Choice(String),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Choice(s) | FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Choice(s) | FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Input that passed validation against every field of a calculator.
///
/// Only the evaluation engine constructs these. Required fields are always
/// present; optional fields are present when supplied or defaulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedInput {
    values: BTreeMap<String, FieldValue>,
    defaulted: BTreeSet<String>,
}

impl ValidatedInput {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.values.insert(field.into(), value);
    }

    pub(crate) fn insert_default(&mut self, field: impl Into<String>, value: FieldValue) {
        let field = field.into();
        self.defaulted.insert(field.clone());
        self.values.insert(field, value);
    }

    /// True when the field's value was substituted from its default
    pub fn is_defaulted(&self, field: &str) -> bool {
        self.defaulted.contains(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Numeric value of a field, if present
    pub fn optional_number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    /// Choice or text value of a field, if present
    pub fn optional_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    /// Numeric value of a field the schema guarantees.
    ///
    /// A miss means the formula and its field list disagree, which is a
    /// programming error rather than bad user input.
    pub fn number(&self, field: &str) -> CalcResult<f64> {
        self.optional_number(field).ok_or_else(|| CalcError::Internal {
            message: format!("numeric field '{}' not available to formula", field),
        })
    }

    /// Choice or text value of a field the schema guarantees.
    pub fn str(&self, field: &str) -> CalcResult<&str> {
        self.optional_str(field).ok_or_else(|| CalcError::Internal {
            message: format!("text field '{}' not available to formula", field),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_and_remove_clears() {
        let mut input = RawInput::new().with("age", 30u32);
        input.set("age", "31");
        assert_eq!(input.get("age"), Some(&RawValue::Text("31".to_string())));
        assert_eq!(input.remove("age"), Some(RawValue::Text("31".to_string())));
        assert!(input.is_empty());
    }

    #[test]
    fn test_json_shape_is_plain_object() {
        let input: RawInput = [("weightKg", RawValue::from(70.5)), ("sex", RawValue::from("female"))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(json, r#"{"sex":"female","weightKg":70.5}"#);
    }

    #[test]
    fn test_from_json_rejects_nested_values() {
        let err = RawInput::from_json(r#"{ "weightKg": [70] }"#).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_validated_accessors() {
        let mut validated = ValidatedInput::new();
        validated.insert("weightKg", FieldValue::Number(70.0));
        validated.insert("sex", FieldValue::Choice("male".to_string()));

        assert_eq!(validated.number("weightKg").unwrap(), 70.0);
        assert_eq!(validated.str("sex").unwrap(), "male");
        assert_eq!(validated.optional_number("bodyFatPercent"), None);
        assert!(validated.number("sex").is_err());
        assert!(!validated.is_defaulted("weightKg"));
    }
}
