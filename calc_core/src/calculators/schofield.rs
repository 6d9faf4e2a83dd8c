//! # Schofield Calculator
//!
//! Weight-based BMR from the Schofield (WHO/FAO/UNU) tables. Coefficients
//! depend on sex and age band; unlike the other equations these cover
//! children as well as adults.

use crate::definition::CalculatorDefinition;
use crate::engine::DomainCheck;
use crate::equations::{schofield, Equation};
use crate::errors::CalcResult;
use crate::input::ValidatedInput;
use crate::result::{FormulaOutput, Output};
use crate::units::{Kilocalories, Unit};

use super::{activity, activity_field, age_field, check_body, check_schofield, push_tdee, sex, sex_field, weight_field};

pub const ID: &str = "schofield";

pub fn definition() -> CalculatorDefinition {
    CalculatorDefinition::new(
        ID,
        "Schofield Calculator",
        "Basal metabolic rate from weight, age band and sex (Schofield)",
        calculate,
    )
    .field(weight_field())
    .field(age_field())
    .field(sex_field())
    .field(activity_field())
    .applies(Equation::Schofield)
    .applies(Equation::ActivityMultiplier)
}

fn calculate(input: &ValidatedInput) -> CalcResult<FormulaOutput> {
    let weight = input.number("weightKg")?;
    let age = input.number("age")?;
    let sex = sex(input)?;
    let activity = activity(input)?;

    let mut checks = DomainCheck::new();
    check_body(&mut checks, weight, None, Some(age));
    checks.finish(ID)?;

    let (band, mj) = schofield(weight, age, sex);
    let kcal = Kilocalories::from(mj).0;
    check_schofield(&mut checks, kcal, band);
    checks.finish(ID)?;

    let mut out = FormulaOutput::new();
    out.push(
        Output::number("bmr", "Basal metabolic rate", kcal, 0, Unit::KilocaloriesPerDay),
        Equation::Schofield,
    );
    out.push_plain(Output::number("bmrMj", "Basal metabolic rate (MJ)", mj.0, 2, Unit::MegajoulesPerDay));
    out.push_plain(Output::text("ageBand", "Age band", band.label()));
    push_tdee(&mut out, kcal, activity);
    Ok(out)
}
