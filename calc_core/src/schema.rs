//! # Field Schema
//!
//! Declarative description of one calculator input: identifier, label, value
//! kind, unit and constraints. Schemas are authored once as static
//! configuration and only read afterwards (by the evaluation engine and by
//! whatever renders the form).
//!
//! ## Example
//!
//! ```rust
//! use calc_core::schema::{FieldKind, FieldSchema};
//! use calc_core::units::Unit;
//!
//! let weight = FieldSchema::number("weightKg", "Weight")
//!     .with_unit(Unit::Kilograms)
//!     .max(650.0);
//!
//! assert!(weight.required);
//! assert!(matches!(weight.kind, FieldKind::Number { max: Some(_), .. }));
//! ```

use serde::Serialize;

use crate::input::FieldValue;
use crate::units::Unit;

/// One selectable option of a choice field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChoiceOption {
    /// Canonical value handed to the formula (e.g., "male")
    pub value: &'static str,
    /// Display label (e.g., "Male")
    pub label: &'static str,
}

impl ChoiceOption {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Value kind of a field together with its kind-specific constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Numeric input; bounds are inclusive
    Number {
        min: Option<f64>,
        max: Option<f64>,
        integer: bool,
    },
    /// One of a fixed set of options
    Choice { options: &'static [ChoiceOption] },
    /// Free text
    Text { max_len: Option<usize> },
}

/// Value substituted when an optional field is left empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldDefault {
    Number(f64),
    Choice(&'static str),
    Text(&'static str),
}

impl FieldDefault {
    pub fn to_value(&self) -> FieldValue {
        match *self {
            FieldDefault::Number(n) => FieldValue::Number(n),
            FieldDefault::Choice(c) => FieldValue::Choice(c.to_string()),
            FieldDefault::Text(t) => FieldValue::Text(t.to_string()),
        }
    }
}

/// Description of one calculator input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    /// Identifier, unique within a calculator (e.g., "weightKg")
    pub id: &'static str,
    /// Human label (e.g., "Body weight")
    pub label: &'static str,
    /// Value kind and constraints
    pub kind: FieldKind,
    /// Unit of measure, if any
    pub unit: Option<Unit>,
    /// Whether evaluation fails when the field is absent
    pub required: bool,
    /// Substituted when an optional field is absent
    pub default: Option<FieldDefault>,
    /// Short hint shown next to the field
    pub help: Option<&'static str>,
}

impl FieldSchema {
    const fn new(id: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            label,
            kind,
            unit: None,
            required: true,
            default: None,
            help: None,
        }
    }

    /// Required numeric field without bounds
    pub const fn number(id: &'static str, label: &'static str) -> Self {
        Self::new(
            id,
            label,
            FieldKind::Number {
                min: None,
                max: None,
                integer: false,
            },
        )
    }

    /// Required choice field
    pub const fn choice(id: &'static str, label: &'static str, options: &'static [ChoiceOption]) -> Self {
        Self::new(id, label, FieldKind::Choice { options })
    }

    /// Required free-text field
    pub const fn text(id: &'static str, label: &'static str) -> Self {
        Self::new(id, label, FieldKind::Text { max_len: None })
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    /// Optional field that falls back to `default` when left empty
    pub fn with_default(mut self, default: FieldDefault) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }

    /// Inclusive lower bound (numeric fields only)
    pub fn min(mut self, value: f64) -> Self {
        if let FieldKind::Number { min, .. } = &mut self.kind {
            *min = Some(value);
        }
        self
    }

    /// Inclusive upper bound (numeric fields only)
    pub fn max(mut self, value: f64) -> Self {
        if let FieldKind::Number { max, .. } = &mut self.kind {
            *max = Some(value);
        }
        self
    }

    /// Inclusive bounds (numeric fields only)
    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    /// Reject fractional values (numeric fields only)
    pub fn integer(mut self) -> Self {
        if let FieldKind::Number { integer, .. } = &mut self.kind {
            *integer = true;
        }
        self
    }

    /// Maximum text length in characters (text fields only)
    pub fn max_len(mut self, len: usize) -> Self {
        if let FieldKind::Text { max_len } = &mut self.kind {
            *max_len = Some(len);
        }
        self
    }

    /// Short kind name ("number", "choice", "text")
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            FieldKind::Number { .. } => "number",
            FieldKind::Choice { .. } => "choice",
            FieldKind::Text { .. } => "text",
        }
    }

    /// Options of a choice field (empty for other kinds)
    pub fn options(&self) -> &'static [ChoiceOption] {
        match self.kind {
            FieldKind::Choice { options } => options,
            _ => &[],
        }
    }

    /// Label of a choice value, if this is a choice field that offers it
    pub fn option_label(&self, value: &str) -> Option<&'static str> {
        self.options()
            .iter()
            .find(|opt| opt.value == value)
            .map(|opt| opt.label)
    }

    /// One-line summary of the constraints, for form hints and CLI listings.
    pub fn constraint_summary(&self) -> String {
        match &self.kind {
            FieldKind::Number { min, max, integer } => {
                let prefix = if *integer { "whole number" } else { "number" };
                match (min, max) {
                    (Some(lo), Some(hi)) => format!("{} {}..={}", prefix, lo, hi),
                    (Some(lo), None) => format!("{} >= {}", prefix, lo),
                    (None, Some(hi)) => format!("{} <= {}", prefix, hi),
                    (None, None) => prefix.to_string(),
                }
            }
            FieldKind::Choice { options } => options
                .iter()
                .map(|opt| opt.value)
                .collect::<Vec<_>>()
                .join(" | "),
            FieldKind::Text { max_len: Some(len) } => format!("text, max {} chars", len),
            FieldKind::Text { max_len: None } => "text".to_string(),
        }
    }
}
