//! # Evaluation Engine
//!
//! Turns a [`RawInput`] into a [`CalculatorResult`] for a given
//! [`CalculatorDefinition`]:
//!
//! 1. Coerce every raw value to its field's kind (trim, parse, match choices)
//! 2. Check required/range/choice/length constraints
//! 3. Run the formula only if every field passed
//! 4. Package outputs with the normalized input echo
//!
//! Validation never stops at the first problem. Every failing field gets its
//! own [`FieldIssue`] so a form can flag all of them at once.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::engine;
//! use calc_core::input::RawInput;
//! use calc_core::registry;
//!
//! let bmr = registry::global().get("bmr").unwrap();
//! let err = engine::evaluate(bmr, &RawInput::new().with("weightKg", "heavy")).unwrap_err();
//!
//! let fields: Vec<_> = err.field_issues().iter().map(|i| i.field.as_str()).collect();
//! assert_eq!(fields, vec!["weightKg", "heightCm", "age", "sex"]);
//! ```

use tracing::debug;

use crate::definition::CalculatorDefinition;
use crate::errors::{CalcError, CalcResult, FieldIssue, IssueKind};
use crate::input::{FieldValue, RawInput, RawValue, ValidatedInput};
use crate::result::{CalculatorResult, InputEcho};
use crate::schema::{FieldKind, FieldSchema};

/// Validate and evaluate `input` against `definition`.
pub fn evaluate(definition: &CalculatorDefinition, input: &RawInput) -> CalcResult<CalculatorResult> {
    debug!(calculator = definition.id, supplied = input.len(), "evaluating calculator");

    let validated = validate(definition, input).map_err(|issues| {
        debug!(calculator = definition.id, issues = issues.len(), "validation failed");
        CalcError::validation(definition.id, issues)
    })?;

    let output = definition.run_formula(&validated).inspect_err(|err| {
        debug!(calculator = definition.id, code = err.error_code(), "formula rejected input");
    })?;

    let inputs = definition
        .fields()
        .iter()
        .filter_map(|field| {
            validated.get(field.id).map(|value| InputEcho {
                id: field.id.to_string(),
                value: value.clone(),
                defaulted: validated.is_defaulted(field.id),
            })
        })
        .collect();

    debug!(calculator = definition.id, outputs = output.outputs.len(), "evaluation complete");

    Ok(CalculatorResult {
        calculator_id: definition.id.to_string(),
        outputs: output.outputs,
        inputs,
        equations: output.equations,
    })
}

/// Coerce and check every field, collecting one issue per failing field.
///
/// Optional fields left empty receive their default when they declare one
/// and are otherwise absent from the validated input.
pub fn validate(definition: &CalculatorDefinition, input: &RawInput) -> Result<ValidatedInput, Vec<FieldIssue>> {
    let mut validated = ValidatedInput::new();
    let mut issues = Vec::new();

    for field in definition.fields() {
        match coerce(field, input.get(field.id)) {
            Ok(Some(value)) => validated.insert(field.id, value),
            Ok(None) => {
                if let Some(default) = field.default {
                    validated.insert_default(field.id, default.to_value());
                } else if field.required {
                    issues.push(FieldIssue::missing(field.id));
                }
            }
            Err(issue) => issues.push(issue),
        }
    }

    for (key, _) in input.iter() {
        if definition.field_by_id(key).is_none() {
            debug!(calculator = definition.id, field = key, "ignoring unknown input field");
        }
    }

    if issues.is_empty() {
        Ok(validated)
    } else {
        Err(issues)
    }
}

/// Coerce one raw value to the field's kind.
///
/// `Ok(None)` means "not supplied": absent, or a blank string.
pub fn coerce(field: &FieldSchema, raw: Option<&RawValue>) -> Result<Option<FieldValue>, FieldIssue> {
    let raw = match raw {
        None => return Ok(None),
        Some(RawValue::Text(text)) if text.trim().is_empty() => return Ok(None),
        Some(raw) => raw,
    };

    match &field.kind {
        FieldKind::Number { min, max, integer } => {
            let number = match raw {
                RawValue::Number(n) => *n,
                RawValue::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                    FieldIssue::new(field.id, IssueKind::Malformed, format!("'{}' is not a number", text.trim()))
                })?,
            };

            if !number.is_finite() {
                return Err(FieldIssue::new(field.id, IssueKind::Malformed, "Must be a finite number"));
            }
            if *integer && number.fract() != 0.0 {
                return Err(FieldIssue::new(field.id, IssueKind::Malformed, "Must be a whole number"));
            }
            if let Some(lo) = min {
                if number < *lo {
                    return Err(FieldIssue::new(
                        field.id,
                        IssueKind::OutOfRange,
                        format!("Must be at least {}", lo),
                    ));
                }
            }
            if let Some(hi) = max {
                if number > *hi {
                    return Err(FieldIssue::new(
                        field.id,
                        IssueKind::OutOfRange,
                        format!("Must be at most {}", hi),
                    ));
                }
            }
            Ok(Some(FieldValue::Number(number)))
        }

        FieldKind::Choice { options } => {
            let allowed = || {
                format!(
                    "Must be one of: {}",
                    options.iter().map(|o| o.value).collect::<Vec<_>>().join(", ")
                )
            };
            let text = match raw {
                RawValue::Text(text) => text.trim(),
                RawValue::Number(_) => {
                    return Err(FieldIssue::new(field.id, IssueKind::Malformed, allowed()));
                }
            };
            options
                .iter()
                .find(|opt| opt.value.eq_ignore_ascii_case(text) || opt.label.eq_ignore_ascii_case(text))
                .map(|opt| Some(FieldValue::Choice(opt.value.to_string())))
                .ok_or_else(|| FieldIssue::new(field.id, IssueKind::UnknownChoice, allowed()))
        }

        FieldKind::Text { max_len } => {
            let text = match raw {
                RawValue::Text(text) => text.trim().to_string(),
                RawValue::Number(n) => n.to_string(),
            };
            if let Some(limit) = max_len {
                if text.chars().count() > *limit {
                    return Err(FieldIssue::new(
                        field.id,
                        IssueKind::TooLong,
                        format!("Must be at most {} characters", limit),
                    ));
                }
            }
            Ok(Some(FieldValue::Text(text)))
        }
    }
}

/// Collector for formula-level range checks.
///
/// Formulas run every check and then call [`DomainCheck::finish`], so a
/// domain error lists all offending fields just like a validation error.
#[derive(Debug, Default)]
pub struct DomainCheck {
    issues: Vec<FieldIssue>,
}

impl DomainCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `field` with `reason` unless `ok`
    pub fn require(&mut self, ok: bool, field: &str, reason: &str) -> &mut Self {
        if !ok {
            self.issues.push(FieldIssue::domain(field, reason));
        }
        self
    }

    /// `value > 0`
    pub fn positive(&mut self, field: &str, value: f64, label: &str) -> &mut Self {
        self.require(value > 0.0, field, &format!("{} must be greater than zero", label))
    }

    /// `value >= min`
    pub fn at_least(&mut self, field: &str, value: f64, min: f64, reason: &str) -> &mut Self {
        self.require(value >= min, field, reason)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// `Err(CalcError::Domain)` listing every failed check, if any
    pub fn finish(&mut self, calculator_id: &str) -> CalcResult<()> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(CalcError::domain(calculator_id, std::mem::take(&mut self.issues)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::Equation;
    use crate::result::{FormulaOutput, Output};
    use crate::schema::{ChoiceOption, FieldDefault};
    use crate::units::Unit;

    const SEXES: &[ChoiceOption] = &[ChoiceOption::new("male", "Male"), ChoiceOption::new("female", "Female")];

    fn weight() -> FieldSchema {
        FieldSchema::number("weightKg", "Weight").max(650.0)
    }

    fn formula(input: &ValidatedInput) -> CalcResult<FormulaOutput> {
        let w = input.number("weightKg")?;
        let mut checks = DomainCheck::new();
        checks.positive("weightKg", w, "Weight");
        checks.finish("test")?;

        let mut out = FormulaOutput::new();
        out.push(Output::number("w", "Weight", w, 1, Unit::Kilograms), Equation::LeanBodyMass);
        if let Some(bf) = input.optional_number("bodyFat") {
            out.push(Output::number("bf", "Body fat", bf, 1, Unit::Percent), Equation::LeanBodyMass);
        }
        Ok(out)
    }

    fn definition() -> CalculatorDefinition {
        CalculatorDefinition::new("test", "Test", "engine test", formula)
            .field(weight())
            .field(FieldSchema::choice("sex", "Sex", SEXES))
            .field(FieldSchema::number("bodyFat", "Body fat").range(0.0, 75.0).optional())
            .field(FieldSchema::number("meals", "Meals").range(1.0, 8.0).integer().with_default(FieldDefault::Number(3.0)))
    }

    #[test]
    fn test_numeric_strings_are_trimmed_and_parsed() {
        let value = coerce(&weight(), Some(&RawValue::from("  70.5 "))).unwrap();
        assert_eq!(value, Some(FieldValue::Number(70.5)));
    }

    #[test]
    fn test_non_numeric_and_non_finite_rejected() {
        for bad in ["70kg", "abc", "NaN", "inf"] {
            let issue = coerce(&weight(), Some(&RawValue::from(bad))).unwrap_err();
            assert_eq!(issue.kind, IssueKind::Malformed, "{} should be malformed", bad);
        }
    }

    #[test]
    fn test_blank_string_counts_as_missing() {
        assert_eq!(coerce(&weight(), Some(&RawValue::from("   "))).unwrap(), None);
    }

    #[test]
    fn test_range_and_integer_constraints() {
        let meals = FieldSchema::number("meals", "Meals").range(1.0, 8.0).integer();
        assert_eq!(coerce(&meals, Some(&RawValue::from(2.5))).unwrap_err().kind, IssueKind::Malformed);
        assert_eq!(coerce(&meals, Some(&RawValue::from(9.0))).unwrap_err().kind, IssueKind::OutOfRange);
        assert_eq!(coerce(&meals, Some(&RawValue::from(0.0))).unwrap_err().kind, IssueKind::OutOfRange);
        assert_eq!(coerce(&meals, Some(&RawValue::from("8"))).unwrap(), Some(FieldValue::Number(8.0)));
    }

    #[test]
    fn test_choice_matching_normalizes() {
        let sex = FieldSchema::choice("sex", "Sex", SEXES);
        assert_eq!(
            coerce(&sex, Some(&RawValue::from(" FEMALE "))).unwrap(),
            Some(FieldValue::Choice("female".to_string()))
        );
        assert_eq!(
            coerce(&sex, Some(&RawValue::from("Male"))).unwrap(),
            Some(FieldValue::Choice("male".to_string()))
        );
        assert_eq!(coerce(&sex, Some(&RawValue::from("other"))).unwrap_err().kind, IssueKind::UnknownChoice);
        assert_eq!(coerce(&sex, Some(&RawValue::from(1.0))).unwrap_err().kind, IssueKind::Malformed);
    }

    #[test]
    fn test_text_fields_accept_numbers_and_limit_length() {
        let note = FieldSchema::text("note", "Note").max_len(5);
        assert_eq!(coerce(&note, Some(&RawValue::from(42.0))).unwrap(), Some(FieldValue::Text("42".to_string())));
        assert_eq!(coerce(&note, Some(&RawValue::from("toolong"))).unwrap_err().kind, IssueKind::TooLong);
    }

    #[test]
    fn test_validation_is_exhaustive() {
        let input = RawInput::new().with("weightKg", "x").with("bodyFat", 90.0);
        let issues = validate(&definition(), &input).unwrap_err();

        let summary: Vec<_> = issues.iter().map(|i| (i.field.as_str(), i.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("weightKg", IssueKind::Malformed),
                ("sex", IssueKind::Missing),
                ("bodyFat", IssueKind::OutOfRange),
            ]
        );
    }

    #[test]
    fn test_defaults_and_optional_fields() {
        let input = RawInput::new().with("weightKg", 70.0).with("sex", "male").with("extra", "ignored");
        let result = evaluate(&definition(), &input).unwrap();

        assert!(result.output("bf").is_none());
        let meals = result.input("meals").unwrap();
        assert!(meals.defaulted);
        assert_eq!(meals.value, FieldValue::Number(3.0));
        assert!(result.input("bodyFat").is_none());
        assert!(result.input("extra").is_none());
    }

    #[test]
    fn test_domain_error_after_validation() {
        let input = RawInput::new().with("weightKg", 0.0).with("sex", "male");
        let err = evaluate(&definition(), &input).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert_eq!(err.field_issues()[0].field, "weightKg");
        assert_eq!(err.field_issues()[0].kind, IssueKind::Domain);
    }

    #[test]
    fn test_evaluation_does_not_mutate_input() {
        let input = RawInput::new().with("weightKg", " 70 ").with("sex", "MALE");
        let before = input.clone();
        let first = evaluate(&definition(), &input).unwrap();
        let second = evaluate(&definition(), &input).unwrap();
        assert_eq!(input, before);
        assert_eq!(first, second);
    }

    #[test]
    fn test_domain_check_collects_all() {
        let mut checks = DomainCheck::new();
        checks
            .positive("weightKg", -1.0, "Weight")
            .positive("heightCm", 0.0, "Height")
            .at_least("age", 30.0, 18.0, "Adults only");
        assert!(!checks.is_clean());
        let err = checks.finish("bmr").unwrap_err();
        assert_eq!(err.field_issues().len(), 2);
    }
}
