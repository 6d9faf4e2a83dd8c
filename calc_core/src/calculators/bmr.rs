//! # BMR Calculator
//!
//! Basal metabolic rate from weight, height, age and sex using the
//! Mifflin-St Jeor equation, with an optional activity-adjusted TDEE.
//!
//! ## Assumptions
//!
//! - Adults only (18+ years)
//! - Weight in kg, height in cm
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculators::bmr;
//! use calc_core::input::RawInput;
//!
//! let input = RawInput::new()
//!     .with("weightKg", 70.0)
//!     .with("heightCm", 175.0)
//!     .with("age", 30.0)
//!     .with("sex", "male");
//!
//! let result = bmr::definition().calculate(&input).unwrap();
//! assert_eq!(result.number("bmr"), Some(1648.75));
//! assert!(result.output("tdee").is_none());
//! ```

use crate::definition::CalculatorDefinition;
use crate::engine::DomainCheck;
use crate::equations::{mifflin_st_jeor, Equation};
use crate::errors::CalcResult;
use crate::input::ValidatedInput;
use crate::result::{FormulaOutput, Output};
use crate::units::Unit;

use super::{
    activity, activity_field, age_field, check_adult, check_body, height_field, kilojoule_output, push_tdee, sex,
    sex_field, weight_field,
};

pub const ID: &str = "bmr";

pub fn definition() -> CalculatorDefinition {
    CalculatorDefinition::new(
        ID,
        "BMR Calculator",
        "Basal metabolic rate from weight, height, age and sex (Mifflin-St Jeor)",
        calculate,
    )
    .field(weight_field())
    .field(height_field())
    .field(age_field())
    .field(sex_field())
    .field(activity_field())
    .applies(Equation::MifflinStJeor)
    .applies(Equation::ActivityMultiplier)
}

fn calculate(input: &ValidatedInput) -> CalcResult<FormulaOutput> {
    let weight = input.number("weightKg")?;
    let height = input.number("heightCm")?;
    let age = input.number("age")?;
    let sex = sex(input)?;
    let activity = activity(input)?;

    let mut checks = DomainCheck::new();
    check_body(&mut checks, weight, Some(height), Some(age));
    check_adult(&mut checks, age, "Mifflin-St Jeor");
    checks.finish(ID)?;

    let bmr = mifflin_st_jeor(weight, height, age, sex);

    let mut out = FormulaOutput::new();
    out.push(
        Output::number("bmr", "Basal metabolic rate", bmr, 0, Unit::KilocaloriesPerDay),
        Equation::MifflinStJeor,
    );
    out.push_plain(kilojoule_output("bmrKj", "Basal metabolic rate (kJ)", bmr));
    push_tdee(&mut out, bmr, activity);
    Ok(out)
}
