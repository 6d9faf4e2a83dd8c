//! # Calculator Definition
//!
//! A named bundle of [`FieldSchema`]s plus a pure formula. Definitions are
//! built once at startup (see [`registry`](crate::registry)) and shared
//! read-only afterwards; the formula holds no state, so a definition can be
//! evaluated from any number of threads at once.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::definition::CalculatorDefinition;
//! use calc_core::equations::Equation;
//! use calc_core::input::{RawInput, ValidatedInput};
//! use calc_core::result::{FormulaOutput, Output};
//! use calc_core::schema::FieldSchema;
//! use calc_core::units::Unit;
//! use calc_core::CalcResult;
//!
//! fn per_meal(input: &ValidatedInput) -> CalcResult<FormulaOutput> {
//!     let mut out = FormulaOutput::new();
//!     let kcal = input.number("dailyCalories")? / input.number("meals")?;
//!     out.push(Output::number("perMeal", "Per meal", kcal, 0, Unit::Kilocalories), Equation::EnergyPerMeal);
//!     Ok(out)
//! }
//!
//! let def = CalculatorDefinition::new("split", "Split", "Even meal split", per_meal)
//!     .field(FieldSchema::number("dailyCalories", "Daily calories").min(0.0))
//!     .field(FieldSchema::number("meals", "Meals").range(1.0, 8.0).integer());
//!
//! let result = def
//!     .calculate(&RawInput::new().with("dailyCalories", 2400.0).with("meals", "3"))
//!     .unwrap();
//! assert_eq!(result.number("perMeal"), Some(800.0));
//! ```

use std::collections::HashSet;

use serde::Serialize;

use crate::engine;
use crate::equations::Equation;
use crate::errors::{CalcError, CalcResult};
use crate::input::{RawInput, ValidatedInput};
use crate::result::{CalculatorResult, FormulaOutput};
use crate::schema::{FieldKind, FieldSchema};

/// Formula signature: validated input in, outputs (and equations used) out.
///
/// May fail with [`CalcError::Domain`] for values the equation cannot accept.
pub type Formula = fn(&ValidatedInput) -> CalcResult<FormulaOutput>;

/// Declarative description of one calculator.
#[derive(Clone, Serialize)]
pub struct CalculatorDefinition {
    /// Registry key (e.g., "bmr")
    pub id: &'static str,
    /// Display name (e.g., "BMR Calculator")
    pub name: &'static str,
    pub description: &'static str,
    fields: Vec<FieldSchema>,
    /// Equations the formula may apply
    equations: Vec<Equation>,
    #[serde(skip)]
    formula: Formula,
}

impl std::fmt::Debug for CalculatorDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculatorDefinition")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("equations", &self.equations)
            .finish_non_exhaustive()
    }
}

impl CalculatorDefinition {
    pub fn new(id: &'static str, name: &'static str, description: &'static str, formula: Formula) -> Self {
        Self {
            id,
            name,
            description,
            fields: Vec::new(),
            equations: Vec::new(),
            formula,
        }
    }

    /// Builder-style field append (order is form order)
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Builder-style declaration of an equation the formula applies
    pub fn applies(mut self, equation: Equation) -> Self {
        if !self.equations.contains(&equation) {
            self.equations.push(equation);
        }
        self
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Ordered input fields
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Look up a field by id
    pub fn field_by_id(&self, id: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Validate `input` against the fields and run the formula.
    pub fn calculate(&self, input: &RawInput) -> CalcResult<CalculatorResult> {
        engine::evaluate(self, input)
    }

    pub(crate) fn run_formula(&self, input: &ValidatedInput) -> CalcResult<FormulaOutput> {
        (self.formula)(input)
    }

    /// Structural checks: non-empty, unique field ids, sane constraints.
    pub fn check(&self) -> CalcResult<()> {
        if self.id.trim().is_empty() {
            return Err(CalcError::invalid_definition(self.id, "Calculator id is empty"));
        }
        if self.fields.is_empty() {
            return Err(CalcError::invalid_definition(self.id, "Calculator has no fields"));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.id) {
                return Err(CalcError::invalid_definition(
                    self.id,
                    format!("Duplicate field id '{}'", field.id),
                ));
            }
            match &field.kind {
                FieldKind::Number { min: Some(lo), max: Some(hi), .. } if lo > hi => {
                    return Err(CalcError::invalid_definition(
                        self.id,
                        format!("Field '{}' has min {} greater than max {}", field.id, lo, hi),
                    ));
                }
                FieldKind::Choice { options } if options.is_empty() => {
                    return Err(CalcError::invalid_definition(
                        self.id,
                        format!("Choice field '{}' has no options", field.id),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Output;
    use crate::units::Unit;

    fn echo(input: &ValidatedInput) -> CalcResult<FormulaOutput> {
        let mut out = FormulaOutput::new();
        let x = input.number("x")?;
        out.push(Output::number("x2", "Doubled", x * 2.0, 1, Unit::Grams), Equation::MacronutrientGrams);
        Ok(out)
    }

    #[test]
    fn test_fields_are_ordered_and_stable() {
        let def = CalculatorDefinition::new("t", "T", "test", echo)
            .field(FieldSchema::number("x", "X"))
            .field(FieldSchema::number("y", "Y").optional());

        let ids: Vec<_> = def.fields().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["x", "y"]);
        assert_eq!(def.fields(), def.fields());
        assert_eq!(def.field_by_id("y").map(|f| f.required), Some(false));
        assert!(def.field_by_id("z").is_none());
    }

    #[test]
    fn test_applies_deduplicates() {
        let def = CalculatorDefinition::new("t", "T", "test", echo)
            .applies(Equation::Owen)
            .applies(Equation::ActivityMultiplier)
            .applies(Equation::Owen);
        assert_eq!(def.equations(), &[Equation::Owen, Equation::ActivityMultiplier]);
    }

    #[test]
    fn test_check_rejects_duplicate_ids() {
        let def = CalculatorDefinition::new("t", "T", "test", echo)
            .field(FieldSchema::number("x", "X"))
            .field(FieldSchema::number("x", "X again"));
        let err = def.check().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DEFINITION");
    }

    #[test]
    fn test_check_rejects_empty_and_inverted_range() {
        assert!(CalculatorDefinition::new("t", "T", "test", echo).check().is_err());

        let def = CalculatorDefinition::new("t", "T", "test", echo)
            .field(FieldSchema::number("x", "X").range(10.0, 1.0));
        assert!(def.check().is_err());
    }

    #[test]
    fn test_calculate_runs_formula() {
        let def = CalculatorDefinition::new("t", "T", "test", echo).field(FieldSchema::number("x", "X"));
        let result = def.calculate(&RawInput::new().with("x", 2.5)).unwrap();
        assert_eq!(result.number("x2"), Some(5.0));
        assert_eq!(result.calculator_id, "t");
    }
}
