//! # Meal Calculator
//!
//! Splits a daily energy target evenly across meals and converts the
//! macronutrient percentages into grams (Atwater factors 4/4/9).
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculators::meal;
//! use calc_core::input::RawInput;
//!
//! let input = RawInput::new().with("dailyCalories", 2400.0).with("mealsPerDay", 3.0);
//! let result = meal::definition().calculate(&input).unwrap();
//!
//! assert_eq!(result.number("caloriesPerMeal"), Some(800.0));
//! // 30% of 800 kcal at 4 kcal/g
//! assert_eq!(result.number("proteinPerMeal"), Some(60.0));
//! ```

use crate::definition::CalculatorDefinition;
use crate::engine::DomainCheck;
use crate::equations::{energy_per_meal, macronutrient_grams, Equation, Macronutrient};
use crate::errors::CalcResult;
use crate::input::ValidatedInput;
use crate::result::{FormulaOutput, Output};
use crate::schema::{FieldDefault, FieldSchema};
use crate::units::Unit;

pub const ID: &str = "meal";

/// Allowed deviation of the macronutrient percentage total from 100
pub const PERCENT_TOLERANCE: f64 = 0.01;

const MACROS: [(&str, &str, &str, Macronutrient); 3] = [
    ("proteinPercent", "protein", "Protein", Macronutrient::Protein),
    ("carbPercent", "carb", "Carbohydrate", Macronutrient::Carbohydrate),
    ("fatPercent", "fat", "Fat", Macronutrient::Fat),
];

fn percent_field(id: &'static str, label: &'static str, default: f64) -> FieldSchema {
    FieldSchema::number(id, label)
        .range(0.0, 100.0)
        .with_unit(Unit::Percent)
        .with_default(FieldDefault::Number(default))
}

pub fn definition() -> CalculatorDefinition {
    CalculatorDefinition::new(
        ID,
        "Meal Calculator",
        "Energy and macronutrients per meal from a daily calorie target",
        calculate,
    )
    .field(
        FieldSchema::number("dailyCalories", "Daily calories")
            .max(20_000.0)
            .with_unit(Unit::KilocaloriesPerDay),
    )
    .field(
        FieldSchema::number("mealsPerDay", "Meals per day")
            .range(1.0, 8.0)
            .integer()
            .with_unit(Unit::Meals),
    )
    .field(percent_field("proteinPercent", "Protein", 30.0))
    .field(percent_field("carbPercent", "Carbohydrate", 40.0))
    .field(percent_field("fatPercent", "Fat", 30.0))
    .applies(Equation::EnergyPerMeal)
    .applies(Equation::MacronutrientGrams)
}

fn calculate(input: &ValidatedInput) -> CalcResult<FormulaOutput> {
    let daily = input.number("dailyCalories")?;
    let meals = input.number("mealsPerDay")?;
    let mut percents = [0.0; 3];
    for (slot, (field, ..)) in percents.iter_mut().zip(MACROS.iter()) {
        *slot = input.number(field)?;
    }

    let mut checks = DomainCheck::new();
    checks.positive("dailyCalories", daily, "Daily calories");
    let total: f64 = percents.iter().sum();
    if (total - 100.0).abs() > PERCENT_TOLERANCE {
        let reason = format!("Protein, carbohydrate and fat must total 100% (currently {}%)", total);
        for (field, ..) in MACROS {
            checks.require(false, field, &reason);
        }
    }
    checks.finish(ID)?;

    let per_meal = energy_per_meal(daily, meals);

    let mut out = FormulaOutput::new();
    out.push(
        Output::number("caloriesPerMeal", "Calories per meal", per_meal, 0, Unit::Kilocalories),
        Equation::EnergyPerMeal,
    );

    for ((_, key, label, nutrient), percent) in MACROS.iter().zip(percents) {
        out.push(
            Output::number(
                &format!("{}PerMeal", key),
                &format!("{} per meal", label),
                macronutrient_grams(per_meal, percent, *nutrient),
                1,
                Unit::Grams,
            ),
            Equation::MacronutrientGrams,
        );
    }
    for ((_, key, label, nutrient), percent) in MACROS.iter().zip(percents) {
        out.push(
            Output::number(
                &format!("{}PerDay", key),
                &format!("{} per day", label),
                macronutrient_grams(daily, percent, *nutrient),
                0,
                Unit::Grams,
            ),
            Equation::MacronutrientGrams,
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawInput;

    #[test]
    fn test_defaults_split() {
        let input = RawInput::new().with("dailyCalories", 2000.0).with("mealsPerDay", 4.0);
        let result = definition().calculate(&input).unwrap();

        assert_eq!(result.number("caloriesPerMeal"), Some(500.0));
        // 500 * 0.30 / 4, 500 * 0.40 / 4, 500 * 0.30 / 9
        assert!((result.number("proteinPerMeal").unwrap() - 37.5).abs() < 1e-9);
        assert!((result.number("carbPerMeal").unwrap() - 50.0).abs() < 1e-9);
        assert!((result.number("fatPerMeal").unwrap() - 500.0 * 0.3 / 9.0).abs() < 1e-9);
        assert!((result.number("proteinPerDay").unwrap() - 150.0).abs() < 1e-9);

        assert!(result.input("proteinPercent").unwrap().defaulted);
        assert!(!result.input("mealsPerDay").unwrap().defaulted);
    }

    #[test]
    fn test_percent_total_must_be_100() {
        let input = RawInput::new()
            .with("dailyCalories", 2000.0)
            .with("mealsPerDay", 3.0)
            .with("proteinPercent", 50.0);
        let err = definition().calculate(&input).unwrap_err();

        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        let fields: Vec<_> = err.field_issues().iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["proteinPercent", "carbPercent", "fatPercent"]);
    }

    #[test]
    fn test_percent_total_tolerance() {
        let input = RawInput::new()
            .with("dailyCalories", 1800.0)
            .with("mealsPerDay", 3.0)
            .with("proteinPercent", 33.333)
            .with("carbPercent", 33.333)
            .with("fatPercent", 33.333);
        assert!(definition().calculate(&input).is_ok());
    }

    #[test]
    fn test_meals_must_be_whole_and_in_range() {
        let def = definition();
        let fractional = RawInput::new().with("dailyCalories", 2000.0).with("mealsPerDay", 2.5);
        assert_eq!(def.calculate(&fractional).unwrap_err().error_code(), "VALIDATION_ERROR");

        let too_many = RawInput::new().with("dailyCalories", 2000.0).with("mealsPerDay", 9.0);
        assert_eq!(def.calculate(&too_many).unwrap_err().field_issues()[0].field, "mealsPerDay");
    }

    #[test]
    fn test_zero_calories_is_domain_error() {
        let input = RawInput::new().with("dailyCalories", 0.0).with("mealsPerDay", 3.0);
        let err = definition().calculate(&input).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert_eq!(err.field_issues()[0].field, "dailyCalories");
    }
}
