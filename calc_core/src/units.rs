//! # Unit Types
//!
//! Units of measure attached to fields and outputs, plus lightweight newtype
//! wrappers for the energy conversions the formulas need.
//!
//! ## Design Philosophy
//!
//! Simple newtype wrappers rather than a full units library:
//! - Calculators use a small, fixed set of metric units
//! - JSON serialization stays clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{Kilocalories, Kilojoules, Megajoules};
//!
//! let bmr = Megajoules(7.0);
//! let kcal: Kilocalories = bmr.into();
//! assert!((kcal.0 - 1673.042).abs() < 1e-6);
//!
//! let kj: Kilojoules = Kilocalories(1000.0).into();
//! assert!((kj.0 - 4184.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

/// Kilocalories per megajoule (thermochemical calorie)
pub const KCAL_PER_MJ: f64 = 239.006;

/// Kilojoules per kilocalorie (thermochemical calorie)
pub const KJ_PER_KCAL: f64 = 4.184;

/// Energy yield of protein and carbohydrate (kcal per gram)
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBOHYDRATE: f64 = 4.0;

/// Energy yield of fat (kcal per gram)
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

// ============================================================================
// Unit of Measure
// ============================================================================

/// Unit of measure shown next to a field or an output value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Kilograms,
    Centimeters,
    Years,
    Percent,
    Kilocalories,
    KilocaloriesPerDay,
    KilojoulesPerDay,
    MegajoulesPerDay,
    Grams,
    Meals,
}

impl Unit {
    /// Short symbol for tables and reports
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Kilograms => "kg",
            Unit::Centimeters => "cm",
            Unit::Years => "years",
            Unit::Percent => "%",
            Unit::Kilocalories => "kcal",
            Unit::KilocaloriesPerDay => "kcal/day",
            Unit::KilojoulesPerDay => "kJ/day",
            Unit::MegajoulesPerDay => "MJ/day",
            Unit::Grams => "g",
            Unit::Meals => "meals",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Energy Units
// ============================================================================

/// Energy in kilocalories
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilocalories(pub f64);

/// Energy in kilojoules
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilojoules(pub f64);

/// Energy in megajoules
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Megajoules(pub f64);

impl From<Megajoules> for Kilocalories {
    fn from(mj: Megajoules) -> Self {
        Kilocalories(mj.0 * KCAL_PER_MJ)
    }
}

impl From<Kilocalories> for Megajoules {
    fn from(kcal: Kilocalories) -> Self {
        Megajoules(kcal.0 / KCAL_PER_MJ)
    }
}

impl From<Kilocalories> for Kilojoules {
    fn from(kcal: Kilocalories) -> Self {
        Kilojoules(kcal.0 * KJ_PER_KCAL)
    }
}

impl From<Kilojoules> for Kilocalories {
    fn from(kj: Kilojoules) -> Self {
        Kilocalories(kj.0 / KJ_PER_KCAL)
    }
}
