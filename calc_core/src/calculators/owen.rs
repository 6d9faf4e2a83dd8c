//! # Owen Calculator
//!
//! Resting metabolic rate from body weight and sex (Owen et al.). Age is
//! optional and only used to confirm the equation applies.

use crate::definition::CalculatorDefinition;
use crate::engine::DomainCheck;
use crate::equations::{owen, Equation};
use crate::errors::CalcResult;
use crate::input::ValidatedInput;
use crate::result::{FormulaOutput, Output};
use crate::units::Unit;

use super::{
    activity, activity_field, age_field, check_adult, check_body, kilojoule_output, push_tdee, sex, sex_field,
    weight_field,
};

pub const ID: &str = "owen";

pub fn definition() -> CalculatorDefinition {
    CalculatorDefinition::new(ID, "Owen Calculator", "Resting metabolic rate from weight and sex (Owen)", calculate)
        .field(weight_field())
        .field(sex_field())
        .field(age_field().optional().with_help("Optional; the equation applies to adults"))
        .field(activity_field())
        .applies(Equation::Owen)
        .applies(Equation::ActivityMultiplier)
}

fn calculate(input: &ValidatedInput) -> CalcResult<FormulaOutput> {
    let weight = input.number("weightKg")?;
    let age = input.optional_number("age");
    let sex = sex(input)?;
    let activity = activity(input)?;

    let mut checks = DomainCheck::new();
    check_body(&mut checks, weight, None, age);
    if let Some(age) = age {
        check_adult(&mut checks, age, "The Owen equation");
    }
    checks.finish(ID)?;

    let rmr = owen(weight, sex);

    let mut out = FormulaOutput::new();
    out.push(
        Output::number("rmr", "Resting metabolic rate", rmr, 0, Unit::KilocaloriesPerDay),
        Equation::Owen,
    );
    out.push_plain(kilojoule_output("rmrKj", "Resting metabolic rate (kJ)", rmr));
    push_tdee(&mut out, rmr, activity);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawInput;

    #[test]
    fn test_owen_without_age() {
        let input = RawInput::new().with("weightKg", 70.0).with("sex", "male");
        let result = definition().calculate(&input).unwrap();
        // 879 + 10.2*70
        assert!((result.number("rmr").unwrap() - 1593.0).abs() < 1e-9);
        assert!(result.input("age").is_none());
    }

    #[test]
    fn test_owen_female_with_activity() {
        let input = RawInput::new()
            .with("weightKg", 60.0)
            .with("sex", "female")
            .with("activityLevel", "sedentary");
        let result = definition().calculate(&input).unwrap();
        let rmr = 795.0 + 7.18 * 60.0;
        assert!((result.number("rmr").unwrap() - rmr).abs() < 1e-9);
        assert!((result.number("tdee").unwrap() - rmr * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_owen_rejects_minor_when_age_given() {
        let input = RawInput::new().with("weightKg", 40.0).with("sex", "female").with("age", 12.0);
        let err = definition().calculate(&input).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert_eq!(err.field_issues()[0].field, "age");
    }

    #[test]
    fn test_owen_rejects_negative_weight() {
        let input = RawInput::new().with("weightKg", -70.0).with("sex", "male");
        let err = definition().calculate(&input).unwrap_err();
        assert_eq!(err.field_issues()[0].field, "weightKg");
    }
}
