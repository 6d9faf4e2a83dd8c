//! # Built-in Calculators
//!
//! Each calculator module exposes an `ID` and a `definition()` that wires its
//! fields to a pure formula. Formulas follow the same pattern:
//!
//! - Read typed values from the [`ValidatedInput`]
//! - Run every domain check, then [`DomainCheck::finish`]
//! - Push outputs in display order, recording the equation behind each
//!
//! ## Available Calculators
//!
//! - [`bmr`] - Mifflin-St Jeor BMR with optional TDEE
//! - [`owen`] - Owen RMR (weight only)
//! - [`schofield`] - Schofield BMR by age band
//! - [`multi`] - Side-by-side comparison of every BMR equation
//! - [`meal`] - Per-meal energy and macronutrient split

pub mod bmr;
pub mod meal;
pub mod multi;
pub mod owen;
pub mod schofield;

use crate::definition::CalculatorDefinition;
use crate::engine::DomainCheck;
use crate::equations::{total_daily_energy, ActivityLevel, Equation, SchofieldBand, Sex};
use crate::errors::{CalcError, CalcResult};
use crate::input::ValidatedInput;
use crate::result::{FormulaOutput, Output};
use crate::schema::{ChoiceOption, FieldSchema};
use crate::units::{Kilocalories, Kilojoules, Unit};

/// Youngest age the adult-only equations are validated for
pub const ADULT_AGE_YEARS: f64 = 18.0;

pub const SEX_OPTIONS: &[ChoiceOption] = &[ChoiceOption::new("male", "Male"), ChoiceOption::new("female", "Female")];

pub const ACTIVITY_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption::new("sedentary", "Sedentary (little or no exercise)"),
    ChoiceOption::new("light", "Lightly active (1-3 days/week)"),
    ChoiceOption::new("moderate", "Moderately active (3-5 days/week)"),
    ChoiceOption::new("very_active", "Very active (6-7 days/week)"),
    ChoiceOption::new("extra_active", "Extra active (physical job or training twice a day)"),
];

/// All built-in definitions, in menu order.
pub fn builtin() -> Vec<CalculatorDefinition> {
    vec![
        bmr::definition(),
        owen::definition(),
        schofield::definition(),
        multi::definition(),
        meal::definition(),
    ]
}

// ============================================================================
// Shared Fields
// ============================================================================

// Lower bounds are domain checks, not schema constraints, so a zero or
// negative value is reported as a domain error.

pub(crate) fn weight_field() -> FieldSchema {
    FieldSchema::number("weightKg", "Body weight")
        .max(500.0)
        .with_unit(Unit::Kilograms)
}

pub(crate) fn height_field() -> FieldSchema {
    FieldSchema::number("heightCm", "Height")
        .max(300.0)
        .with_unit(Unit::Centimeters)
}

pub(crate) fn age_field() -> FieldSchema {
    FieldSchema::number("age", "Age").max(130.0).with_unit(Unit::Years)
}

pub(crate) fn sex_field() -> FieldSchema {
    FieldSchema::choice("sex", "Sex", SEX_OPTIONS)
}

pub(crate) fn activity_field() -> FieldSchema {
    FieldSchema::choice("activityLevel", "Activity level", ACTIVITY_OPTIONS)
        .optional()
        .with_help("Leave empty to skip the TDEE estimate")
}

// ============================================================================
// Shared Formula Steps
// ============================================================================

pub(crate) fn sex(input: &ValidatedInput) -> CalcResult<Sex> {
    let value = input.str("sex")?;
    Sex::from_value(value).ok_or_else(|| CalcError::Internal {
        message: format!("unrecognized sex value '{}'", value),
    })
}

pub(crate) fn activity(input: &ValidatedInput) -> CalcResult<Option<ActivityLevel>> {
    match input.optional_str("activityLevel") {
        None => Ok(None),
        Some(value) => ActivityLevel::from_value(value)
            .map(Some)
            .ok_or_else(|| CalcError::Internal {
                message: format!("unrecognized activity level '{}'", value),
            }),
    }
}

/// Weight > 0, height > 0 (when used) and age >= 0 (when supplied).
pub(crate) fn check_body(checks: &mut DomainCheck, weight: f64, height: Option<f64>, age: Option<f64>) {
    checks.positive("weightKg", weight, "Body weight");
    if let Some(height) = height {
        checks.positive("heightCm", height, "Height");
    }
    if let Some(age) = age {
        checks.at_least("age", age, 0.0, "Age cannot be negative");
    }
}

/// Age >= 18 for an adult-only equation. Skipped for negative ages, which
/// [`check_body`] already reports.
pub(crate) fn check_adult(checks: &mut DomainCheck, age: f64, equation: &str) {
    if age >= 0.0 {
        checks.at_least(
            "age",
            age,
            ADULT_AGE_YEARS,
            &format!("{} is only validated for adults (18 years or older)", equation),
        );
    }
}

/// A Schofield estimate must be positive. The 0-3 band has a negative
/// intercept, so very low weights fall below zero.
pub(crate) fn check_schofield(checks: &mut DomainCheck, kcal: f64, band: SchofieldBand) {
    checks.require(
        kcal > 0.0,
        "weightKg",
        &format!("Body weight is too low for the Schofield {} equation", band.label()),
    );
}

/// kJ/day companion of a kcal/day value
pub(crate) fn kilojoule_output(id: &str, label: &str, kcal: f64) -> Output {
    let kj = Kilojoules::from(Kilocalories(kcal));
    Output::number(id, label, kj.0, 0, Unit::KilojoulesPerDay)
}

/// Append `tdee` when an activity level was chosen
pub(crate) fn push_tdee(out: &mut FormulaOutput, bmr_kcal: f64, activity: Option<ActivityLevel>) {
    if let Some(activity) = activity {
        out.push(
            Output::number(
                "tdee",
                "Total daily energy expenditure",
                total_daily_energy(bmr_kcal, activity),
                0,
                Unit::KilocaloriesPerDay,
            ),
            Equation::ActivityMultiplier,
        );
    }
}
