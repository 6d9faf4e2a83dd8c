//! # Meal Planning Equations
//!
//! Splits a daily energy target into meals and converts macronutrient
//! percentages into grams using the Atwater general factors.

use crate::units::{KCAL_PER_GRAM_CARBOHYDRATE, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN};

/// Macronutrient, with its energy density.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Macronutrient {
    Protein,
    Carbohydrate,
    Fat,
}

impl Macronutrient {
    /// kcal per gram
    pub fn energy_density(&self) -> f64 {
        match self {
            Macronutrient::Protein => KCAL_PER_GRAM_PROTEIN,
            Macronutrient::Carbohydrate => KCAL_PER_GRAM_CARBOHYDRATE,
            Macronutrient::Fat => KCAL_PER_GRAM_FAT,
        }
    }
}

/// Energy per meal: `E_meal = E_day / n`
pub fn energy_per_meal(daily_kcal: f64, meals_per_day: f64) -> f64 {
    daily_kcal / meals_per_day
}

/// Grams supplying `percent` of `kcal`: `g = E * p / 100 / density`
pub fn macronutrient_grams(kcal: f64, percent: f64, nutrient: Macronutrient) -> f64 {
    kcal * percent / 100.0 / nutrient.energy_density()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_per_meal() {
        assert_eq!(energy_per_meal(2400.0, 3.0), 800.0);
    }

    #[test]
    fn test_macronutrient_grams() {
        // 30% of 2000 kcal = 600 kcal protein = 150 g
        assert_eq!(macronutrient_grams(2000.0, 30.0, Macronutrient::Protein), 150.0);
        // 30% of 2000 kcal = 600 kcal fat = 66.67 g
        let fat = macronutrient_grams(2000.0, 30.0, Macronutrient::Fat);
        assert!((fat - 66.666_666).abs() < 1e-3);
    }
}
