//! # Published Equations
//!
//! All predictive formulas used by the calculators live here, separate from
//! field definitions and validation. Keeping them in one place makes it easy
//! to check each one against its publication.
//!
//! ## Modules
//!
//! - [`energy`] - BMR/RMR predictions and activity-adjusted expenditure
//! - [`nutrition`] - Meal split and macronutrient grams
//! - [`registry`] - Equation metadata and usage tracking for report appendices
//!
//! ## References
//!
//! - Mifflin et al. (1990), Am J Clin Nutr 51(2)
//! - Roza & Shizgal (1984), Am J Clin Nutr 40(1)
//! - Owen et al. (1986, 1987), Am J Clin Nutr 44, 46
//! - Schofield (1985), Hum Nutr Clin Nutr 39 Suppl 1

pub mod energy;
pub mod nutrition;
pub mod registry;

pub use energy::{
    harris_benedict_revised,
    katch_mcardle,
    lean_body_mass,
    mifflin_st_jeor,
    owen,
    schofield,
    schofield_kcal,
    total_daily_energy,
    ActivityLevel,
    SchofieldBand,
    Sex,
};

pub use nutrition::{energy_per_meal, macronutrient_grams, Macronutrient};

pub use registry::{
    Citation,
    Equation,
    EquationCategory,
    EquationMetadata,
    EquationTracker,
    EquationUsage,
    Variable,
    ALL_EQUATIONS,
    generate_equations_markdown,
};
