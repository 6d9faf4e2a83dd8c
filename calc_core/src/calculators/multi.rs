//! # Multi-Equation Calculator
//!
//! Runs every BMR equation on the same person so the estimates can be
//! compared side by side, and reports their average.
//!
//! - Schofield is always reported
//! - Mifflin-St Jeor, Harris-Benedict and Owen need an adult (18+)
//! - Katch-McArdle additionally needs a body-fat percentage
//!
//! For minors the adult-only rows are omitted and a note says so; the
//! average then covers Schofield alone.

use crate::definition::CalculatorDefinition;
use crate::engine::DomainCheck;
use crate::equations::{
    harris_benedict_revised, katch_mcardle, lean_body_mass, mifflin_st_jeor, owen, schofield_kcal, Equation,
};
use crate::errors::CalcResult;
use crate::input::ValidatedInput;
use crate::result::{FormulaOutput, Output};
use crate::schema::FieldSchema;
use crate::units::Unit;

use super::{
    activity, activity_field, age_field, check_body, check_schofield, height_field, push_tdee, sex, sex_field, weight_field,
    ADULT_AGE_YEARS,
};

pub const ID: &str = "multi";

pub fn definition() -> CalculatorDefinition {
    CalculatorDefinition::new(
        ID,
        "Multi-Equation Calculator",
        "Compares Mifflin-St Jeor, Harris-Benedict, Owen, Schofield and Katch-McArdle",
        calculate,
    )
    .field(weight_field())
    .field(height_field())
    .field(age_field())
    .field(sex_field())
    .field(
        FieldSchema::number("bodyFatPercent", "Body fat")
            .range(0.0, 75.0)
            .with_unit(Unit::Percent)
            .optional()
            .with_help("Enables the Katch-McArdle estimate"),
    )
    .field(activity_field())
    .applies(Equation::MifflinStJeor)
    .applies(Equation::HarrisBenedictRevised)
    .applies(Equation::Owen)
    .applies(Equation::Schofield)
    .applies(Equation::LeanBodyMass)
    .applies(Equation::KatchMcArdle)
    .applies(Equation::ActivityMultiplier)
}

fn calculate(input: &ValidatedInput) -> CalcResult<FormulaOutput> {
    let weight = input.number("weightKg")?;
    let height = input.number("heightCm")?;
    let age = input.number("age")?;
    let sex = sex(input)?;
    let body_fat = input.optional_number("bodyFatPercent");
    let activity = activity(input)?;

    let mut checks = DomainCheck::new();
    check_body(&mut checks, weight, Some(height), Some(age));
    checks.finish(ID)?;

    let mut out = FormulaOutput::new();
    let mut estimates = Vec::with_capacity(5);

    if age >= ADULT_AGE_YEARS {
        let mifflin = mifflin_st_jeor(weight, height, age, sex);
        out.push(
            Output::number("mifflin", "Mifflin-St Jeor", mifflin, 0, Unit::KilocaloriesPerDay),
            Equation::MifflinStJeor,
        );
        estimates.push(mifflin);

        let hb = harris_benedict_revised(weight, height, age, sex);
        out.push(
            Output::number("harrisBenedict", "Harris-Benedict (revised)", hb, 0, Unit::KilocaloriesPerDay),
            Equation::HarrisBenedictRevised,
        );
        estimates.push(hb);

        let rmr = owen(weight, sex);
        out.push(Output::number("owen", "Owen", rmr, 0, Unit::KilocaloriesPerDay), Equation::Owen);
        estimates.push(rmr);
    }

    let (band, schofield) = schofield_kcal(weight, age, sex);
    check_schofield(&mut checks, schofield, band);
    checks.finish(ID)?;
    out.push(
        Output::number("schofield", "Schofield", schofield, 0, Unit::KilocaloriesPerDay),
        Equation::Schofield,
    );
    estimates.push(schofield);

    if let Some(body_fat) = body_fat.filter(|_| age >= ADULT_AGE_YEARS) {
        let lbm = lean_body_mass(weight, body_fat);
        out.record(Equation::LeanBodyMass, "Katch-McArdle");
        let katch = katch_mcardle(lbm);
        out.push(
            Output::number("katchMcArdle", "Katch-McArdle", katch, 0, Unit::KilocaloriesPerDay),
            Equation::KatchMcArdle,
        );
        estimates.push(katch);
    }

    let average = estimates.iter().sum::<f64>() / estimates.len() as f64;
    out.push_plain(Output::number("average", "Average", average, 0, Unit::KilocaloriesPerDay));

    if age < ADULT_AGE_YEARS {
        out.push_plain(Output::text(
            "note",
            "Note",
            format!("Adult-only equations omitted; Schofield band {}", band.label()),
        ));
    }

    push_tdee(&mut out, average, activity);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawInput;

    fn adult() -> RawInput {
        RawInput::new()
            .with("weightKg", 70.0)
            .with("heightCm", 175.0)
            .with("age", 30.0)
            .with("sex", "male")
    }

    #[test]
    fn test_adult_without_body_fat() {
        let result = definition().calculate(&adult()).unwrap();

        let ids: Vec<_> = result.outputs.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["mifflin", "harrisBenedict", "owen", "schofield", "average"]);
        assert!(result.output("katchMcArdle").is_none());

        let expected = ["mifflin", "harrisBenedict", "owen", "schofield"]
            .iter()
            .map(|id| result.number(id).unwrap())
            .sum::<f64>()
            / 4.0;
        assert!((result.number("average").unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_body_fat_adds_katch_mcardle() {
        let result = definition().calculate(&adult().with("bodyFatPercent", 20.0)).unwrap();
        // LBM = 56 kg
        assert!((result.number("katchMcArdle").unwrap() - (370.0 + 21.6 * 56.0)).abs() < 1e-9);
        assert!(result.equations.unique_equations().contains(&Equation::LeanBodyMass));
    }

    #[test]
    fn test_minor_reports_schofield_only() {
        let input = RawInput::new()
            .with("weightKg", 40.0)
            .with("heightCm", 150.0)
            .with("age", 12.0)
            .with("sex", "female")
            .with("bodyFatPercent", 22.0);
        let result = definition().calculate(&input).unwrap();

        assert!(result.output("mifflin").is_none());
        assert!(result.output("katchMcArdle").is_none());
        assert_eq!(result.number("average"), result.number("schofield"));
        assert!(result.output("note").unwrap().display().contains("10-18 years"));
    }

    #[test]
    fn test_tdee_uses_average() {
        let result = definition().calculate(&adult().with("activityLevel", "light")).unwrap();
        let average = result.number("average").unwrap();
        assert!((result.number("tdee").unwrap() - average * 1.375).abs() < 1e-9);
    }

    #[test]
    fn test_body_fat_out_of_range() {
        let err = definition().calculate(&adult().with("bodyFatPercent", 90.0)).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.field_issues()[0].field, "bodyFatPercent");
    }

    #[test]
    fn test_infant_weight_below_intercept() {
        let input = RawInput::new()
            .with("weightKg", 0.4)
            .with("heightCm", 40.0)
            .with("age", 0.0)
            .with("sex", "female");
        let err = definition().calculate(&input).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert_eq!(err.field_issues()[0].field, "weightKg");
    }
}
