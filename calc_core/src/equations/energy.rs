//! # Energy Expenditure Equations
//!
//! Published predictive equations for basal/resting metabolic rate and total
//! daily energy expenditure. These are plain formulas: range checks belong to
//! the calculators that call them.
//!
//! ## Units
//!
//! - Weight: kilograms
//! - Height: centimeters
//! - Age: years
//! - Results: kcal/day unless the function name says otherwise

use serde::{Deserialize, Serialize};

use crate::units::{Kilocalories, Megajoules};

/// Biological sex, as used by the predictive equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Parse a canonical choice value ("male" / "female")
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Physical activity level for the TDEE multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise or physical job
    ExtraActive,
}

impl ActivityLevel {
    /// Parse a canonical choice value
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "very_active" => Some(ActivityLevel::VeryActive),
            "extra_active" => Some(ActivityLevel::ExtraActive),
            _ => None,
        }
    }

    /// Multiplier applied to BMR
    pub fn factor(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

/// Mifflin-St Jeor BMR.
///
/// `BMR = 10W + 6.25H - 5A + 5` (male), `- 161` (female)
pub fn mifflin_st_jeor(weight_kg: f64, height_cm: f64, age_years: f64, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years;
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Harris-Benedict BMR, revised coefficients (Roza & Shizgal).
pub fn harris_benedict_revised(weight_kg: f64, height_cm: f64, age_years: f64, sex: Sex) -> f64 {
    match sex {
        Sex::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age_years,
        Sex::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age_years,
    }
}

/// Owen RMR (weight only).
///
/// `RMR = 879 + 10.2W` (male), `795 + 7.18W` (female)
pub fn owen(weight_kg: f64, sex: Sex) -> f64 {
    match sex {
        Sex::Male => 879.0 + 10.2 * weight_kg,
        Sex::Female => 795.0 + 7.18 * weight_kg,
    }
}

/// Age bands of the Schofield equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchofieldBand {
    Under3,
    From3To10,
    From10To18,
    From18To30,
    From30To60,
    From60,
}

impl SchofieldBand {
    /// Band containing `age_years` (lower bound inclusive)
    pub fn for_age(age_years: f64) -> Self {
        if age_years < 3.0 {
            SchofieldBand::Under3
        } else if age_years < 10.0 {
            SchofieldBand::From3To10
        } else if age_years < 18.0 {
            SchofieldBand::From10To18
        } else if age_years < 30.0 {
            SchofieldBand::From18To30
        } else if age_years < 60.0 {
            SchofieldBand::From30To60
        } else {
            SchofieldBand::From60
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SchofieldBand::Under3 => "0-3 years",
            SchofieldBand::From3To10 => "3-10 years",
            SchofieldBand::From10To18 => "10-18 years",
            SchofieldBand::From18To30 => "18-30 years",
            SchofieldBand::From30To60 => "30-60 years",
            SchofieldBand::From60 => "60+ years",
        }
    }

    /// `(slope, intercept)` of `BMR [MJ/day] = slope * W + intercept`
    pub fn coefficients(&self, sex: Sex) -> (f64, f64) {
        match (sex, self) {
            (Sex::Male, SchofieldBand::Under3) => (0.249, -0.127),
            (Sex::Male, SchofieldBand::From3To10) => (0.095, 2.110),
            (Sex::Male, SchofieldBand::From10To18) => (0.074, 2.754),
            (Sex::Male, SchofieldBand::From18To30) => (0.063, 2.896),
            (Sex::Male, SchofieldBand::From30To60) => (0.048, 3.653),
            (Sex::Male, SchofieldBand::From60) => (0.049, 2.459),
            (Sex::Female, SchofieldBand::Under3) => (0.244, -0.130),
            (Sex::Female, SchofieldBand::From3To10) => (0.085, 2.033),
            (Sex::Female, SchofieldBand::From10To18) => (0.056, 2.898),
            (Sex::Female, SchofieldBand::From18To30) => (0.062, 2.036),
            (Sex::Female, SchofieldBand::From30To60) => (0.034, 3.538),
            (Sex::Female, SchofieldBand::From60) => (0.038, 2.755),
        }
    }
}

/// Schofield BMR in MJ/day, with the age band that was applied.
pub fn schofield(weight_kg: f64, age_years: f64, sex: Sex) -> (SchofieldBand, Megajoules) {
    let band = SchofieldBand::for_age(age_years);
    let (slope, intercept) = band.coefficients(sex);
    (band, Megajoules(slope * weight_kg + intercept))
}

/// Schofield BMR converted to kcal/day.
pub fn schofield_kcal(weight_kg: f64, age_years: f64, sex: Sex) -> (SchofieldBand, f64) {
    let (band, mj) = schofield(weight_kg, age_years, sex);
    (band, Kilocalories::from(mj).0)
}

/// Lean body mass from total weight and body-fat percentage.
pub fn lean_body_mass(weight_kg: f64, body_fat_percent: f64) -> f64 {
    weight_kg * (1.0 - body_fat_percent / 100.0)
}

/// Katch-McArdle BMR: `370 + 21.6 * LBM`
pub fn katch_mcardle(lean_body_mass_kg: f64) -> f64 {
    370.0 + 21.6 * lean_body_mass_kg
}

/// Total daily energy expenditure: `BMR * activity factor`
pub fn total_daily_energy(bmr_kcal: f64, activity: ActivityLevel) -> f64 {
    bmr_kcal * activity.factor()
}
