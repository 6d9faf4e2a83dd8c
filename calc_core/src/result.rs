//! # Calculator Result
//!
//! The immutable output of a successful evaluation: named output values,
//! the normalized inputs they were computed from, and the equations applied.
//! A result plus its [`CalculatorDefinition`](crate::definition::CalculatorDefinition)
//! is everything a results view or a report needs; neither re-runs a formula.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "calculator_id": "bmr",
//!   "outputs": [
//!     { "id": "bmr", "label": "Basal metabolic rate",
//!       "value": { "number": { "value": 1648.75, "decimals": 0 } }, "unit": "kilocalories_per_day" }
//!   ],
//!   "inputs": [ { "id": "weightKg", "value": { "kind": "number", "value": 70.0 }, "defaulted": false } ],
//!   "equations": { "usages": [ { "equation": "MifflinStJeor", "context": "Basal metabolic rate" } ] }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::registry::{Equation, EquationTracker};
use crate::input::FieldValue;
use crate::units::Unit;

/// Value of one output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputValue {
    /// Number with the precision it should be displayed at
    Number { value: f64, decimals: u8 },
    Text(String),
}

impl OutputValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            OutputValue::Number { value, .. } => Some(*value),
            OutputValue::Text(_) => None,
        }
    }

    /// Display string, rounded to the output's precision
    pub fn display(&self) -> String {
        match self {
            OutputValue::Number { value, decimals } => {
                format!("{:.*}", usize::from(*decimals), value)
            }
            OutputValue::Text(text) => text.clone(),
        }
    }
}

/// One named output of a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub id: String,
    pub label: String,
    pub value: OutputValue,
    pub unit: Option<Unit>,
}

impl Output {
    pub fn number(id: &str, label: &str, value: f64, decimals: u8, unit: Unit) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: OutputValue::Number { value, decimals },
            unit: Some(unit),
        }
    }

    pub fn text(id: &str, label: &str, text: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: OutputValue::Text(text.into()),
            unit: None,
        }
    }

    /// Value followed by the unit symbol, if any
    pub fn display(&self) -> String {
        match self.unit {
            Some(unit) => format!("{} {}", self.value.display(), unit.symbol()),
            None => self.value.display(),
        }
    }
}

/// Normalized echo of one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEcho {
    pub id: String,
    pub value: FieldValue,
    /// True when the value came from the field's default
    pub defaulted: bool,
}

/// What a formula hands back to the engine: outputs plus equation usage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulaOutput {
    pub outputs: Vec<Output>,
    pub equations: EquationTracker,
}

impl FormulaOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an output produced by `equation`
    pub fn push(&mut self, output: Output, equation: Equation) {
        self.equations.record(equation, output.label.clone());
        self.outputs.push(output);
    }

    /// Append an output with no equation of its own (e.g., an echo or a label)
    pub fn push_plain(&mut self, output: Output) {
        self.outputs.push(output);
    }

    /// Record an intermediate equation that feeds an output
    pub fn record(&mut self, equation: Equation, context: &str) {
        self.equations.record(equation, context);
    }
}

/// Output of a successful evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorResult {
    pub calculator_id: String,
    pub outputs: Vec<Output>,
    pub inputs: Vec<InputEcho>,
    pub equations: EquationTracker,
}

impl CalculatorResult {
    pub fn output(&self, id: &str) -> Option<&Output> {
        self.outputs.iter().find(|o| o.id == id)
    }

    /// Numeric value of an output, if present and numeric
    pub fn number(&self, id: &str) -> Option<f64> {
        self.output(id).and_then(|o| o.value.as_number())
    }

    pub fn input(&self, id: &str) -> Option<&InputEcho> {
        self.inputs.iter().find(|i| i.id == id)
    }

    /// Serialize for API consumers
    pub fn to_json_pretty(&self) -> crate::errors::CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_display_rounds() {
        let bmr = Output::number("bmr", "BMR", 1648.75, 0, Unit::KilocaloriesPerDay);
        assert_eq!(bmr.display(), "1649 kcal/day");

        let band = Output::text("ageBand", "Age band", "18-30 years");
        assert_eq!(band.display(), "18-30 years");
    }

    #[test]
    fn test_formula_output_records_equations() {
        let mut out = FormulaOutput::new();
        out.push(Output::number("rmr", "RMR", 1593.0, 0, Unit::KilocaloriesPerDay), Equation::Owen);
        out.push_plain(Output::text("note", "Note", "adult"));

        assert_eq!(out.outputs.len(), 2);
        assert_eq!(out.equations.unique_equations(), vec![Equation::Owen]);
    }

    #[test]
    fn test_lookup_by_id() {
        let result = CalculatorResult {
            calculator_id: "owen".to_string(),
            outputs: vec![Output::number("rmr", "RMR", 1593.0, 0, Unit::KilocaloriesPerDay)],
            inputs: vec![InputEcho {
                id: "weightKg".to_string(),
                value: FieldValue::Number(70.0),
                defaulted: false,
            }],
            equations: EquationTracker::new(),
        };
        assert_eq!(result.number("rmr"), Some(1593.0));
        assert!(result.output("tdee").is_none());
        assert_eq!(result.input("weightKg").map(|i| i.defaulted), Some(false));
    }
}
