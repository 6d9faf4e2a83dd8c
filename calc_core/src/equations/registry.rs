//! # Equation Registry
//!
//! Central registry of the published equations the calculators apply. Each
//! equation has metadata including its citation, formula and variable
//! definitions.
//!
//! ## Architecture
//!
//! The registry provides:
//! - Type-safe equation identification via the `Equation` enum
//! - Full metadata for report appendices and audit trails
//! - Serialization support for JSON export
//!
//! ## Usage
//!
//! ```rust
//! use calc_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record(Equation::MifflinStJeor, "BMR");
//!
//! let meta = Equation::MifflinStJeor.metadata();
//! assert!(meta.formula_plain.contains("6.25H"));
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// Citations
// ============================================================================

/// Published source of an equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Citation {
    /// Mifflin et al., Am J Clin Nutr 1990
    Mifflin1990,
    /// Roza & Shizgal, Am J Clin Nutr 1984 (Harris-Benedict revision)
    RozaShizgal1984,
    /// Owen et al., Am J Clin Nutr 1986 (women) and 1987 (men)
    Owen1986,
    /// Schofield, Hum Nutr Clin Nutr 1985 (adopted by FAO/WHO/UNU)
    Schofield1985,
    /// McArdle, Katch & Katch, Exercise Physiology
    McArdleKatch,
    /// Atwater general factors
    Atwater,
    /// Arithmetic only
    Arithmetic,
}

impl Citation {
    /// Format the reference for display in reports
    pub fn citation(&self) -> &'static str {
        match self {
            Citation::Mifflin1990 => "Mifflin MD et al. (1990), Am J Clin Nutr 51(2):241-247",
            Citation::RozaShizgal1984 => "Roza AM, Shizgal HM (1984), Am J Clin Nutr 40(1):168-182",
            Citation::Owen1986 => "Owen OE et al. (1986, 1987), Am J Clin Nutr 44:1-19 and 46:875-885",
            Citation::Schofield1985 => "Schofield WN (1985), Hum Nutr Clin Nutr 39 Suppl 1:5-41",
            Citation::McArdleKatch => "McArdle WD, Katch FI, Katch VL, Exercise Physiology",
            Citation::Atwater => "Atwater general factors (4/4/9 kcal per gram)",
            Citation::Arithmetic => "Arithmetic",
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            Citation::Mifflin1990 => "Mifflin 1990",
            Citation::RozaShizgal1984 => "Roza & Shizgal 1984",
            Citation::Owen1986 => "Owen 1986/87",
            Citation::Schofield1985 => "Schofield 1985",
            Citation::McArdleKatch => "McArdle",
            Citation::Atwater => "Atwater",
            Citation::Arithmetic => "Arithmetic",
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for organizing equations in the report appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Basal / resting metabolic rate predictions
    MetabolicRate,
    /// Body composition (lean mass)
    BodyComposition,
    /// Activity-adjusted expenditure
    EnergyExpenditure,
    /// Meal and macronutrient planning
    MealPlanning,
}

impl EquationCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::MetabolicRate => "Metabolic Rate",
            EquationCategory::BodyComposition => "Body Composition",
            EquationCategory::EnergyExpenditure => "Energy Expenditure",
            EquationCategory::MealPlanning => "Meal Planning",
        }
    }

    /// Sort order for the appendix (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::BodyComposition => 1,
            EquationCategory::MetabolicRate => 2,
            EquationCategory::EnergyExpenditure => 3,
            EquationCategory::MealPlanning => 4,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "W", "H", "A")
    pub symbol: &'static str,
    pub description: &'static str,
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

const WEIGHT: Variable = Variable::new("W", "Body weight", "kg");
const HEIGHT: Variable = Variable::new("H", "Height", "cm");
const AGE: Variable = Variable::new("A", "Age", "years");

// ============================================================================
// Equation Metadata
// ============================================================================

/// Complete metadata for a published equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    pub description: &'static str,
    /// The formula in Typst math notation for PDF rendering
    pub formula_typst: &'static str,
    /// The formula in plain text for markdown and terminals
    pub formula_plain: &'static str,
    pub reference: Citation,
    pub variables: Vec<Variable>,
    pub assumptions: Vec<&'static str>,
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// Every equation applied by the built-in calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    MifflinStJeor,
    HarrisBenedictRevised,
    Owen,
    Schofield,
    LeanBodyMass,
    KatchMcArdle,
    ActivityMultiplier,
    EnergyPerMeal,
    MacronutrientGrams,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::MifflinStJeor => EquationMetadata {
                name: "Mifflin-St Jeor",
                description: "Resting energy expenditure predicted from weight, height, age and sex",
                formula_typst: r#"$"BMR" = 10 W + 6.25 H - 5 A + s$, $s = +5$ (male), $s = -161$ (female)"#,
                formula_plain: "BMR = 10W + 6.25H - 5A + 5 (male) | - 161 (female)",
                reference: Citation::Mifflin1990,
                variables: vec![WEIGHT, HEIGHT, AGE, Variable::new("BMR", "Basal metabolic rate", "kcal/day")],
                assumptions: vec!["Healthy adults", "Validated for ages 19-78"],
                category: EquationCategory::MetabolicRate,
                source_module: "equations/energy.rs",
                source_function: "mifflin_st_jeor",
            },

            Equation::HarrisBenedictRevised => EquationMetadata {
                name: "Harris-Benedict (revised)",
                description: "Harris-Benedict equation with coefficients re-derived by Roza and Shizgal",
                formula_typst: r#"$"BMR"_m = 88.362 + 13.397 W + 4.799 H - 5.677 A$, $"BMR"_f = 447.593 + 9.247 W + 3.098 H - 4.330 A$"#,
                formula_plain: "BMR_m = 88.362 + 13.397W + 4.799H - 5.677A, BMR_f = 447.593 + 9.247W + 3.098H - 4.330A",
                reference: Citation::RozaShizgal1984,
                variables: vec![WEIGHT, HEIGHT, AGE],
                assumptions: vec!["Adults"],
                category: EquationCategory::MetabolicRate,
                source_module: "equations/energy.rs",
                source_function: "harris_benedict_revised",
            },

            Equation::Owen => EquationMetadata {
                name: "Owen",
                description: "Resting metabolic rate predicted from body weight and sex",
                formula_typst: r#"$"RMR"_m = 879 + 10.2 W$, $"RMR"_f = 795 + 7.18 W$"#,
                formula_plain: "RMR_m = 879 + 10.2W, RMR_f = 795 + 7.18W",
                reference: Citation::Owen1986,
                variables: vec![WEIGHT, Variable::new("RMR", "Resting metabolic rate", "kcal/day")],
                assumptions: vec!["Adults", "Weight is the only anthropometric input"],
                category: EquationCategory::MetabolicRate,
                source_module: "equations/energy.rs",
                source_function: "owen",
            },

            Equation::Schofield => EquationMetadata {
                name: "Schofield",
                description: "Basal metabolic rate by sex and age band, from body weight",
                formula_typst: r#"$"BMR" = (a W + b) times 239.006$ with $a, b$ from the age band table"#,
                formula_plain: "BMR = (aW + b) MJ/day x 239.006 kcal/MJ, a and b by sex and age band",
                reference: Citation::Schofield1985,
                variables: vec![
                    WEIGHT,
                    Variable::new("a", "Band slope", "MJ/day/kg"),
                    Variable::new("b", "Band intercept", "MJ/day"),
                ],
                assumptions: vec!["Age bands 0-3, 3-10, 10-18, 18-30, 30-60, 60+", "Valid for children"],
                category: EquationCategory::MetabolicRate,
                source_module: "equations/energy.rs",
                source_function: "schofield",
            },

            Equation::LeanBodyMass => EquationMetadata {
                name: "Lean Body Mass",
                description: "Fat-free mass from total weight and body-fat percentage",
                formula_typst: r#"$"LBM" = W (1 - "BF" / 100)$"#,
                formula_plain: "LBM = W(1 - BF/100)",
                reference: Citation::Arithmetic,
                variables: vec![WEIGHT, Variable::new("BF", "Body fat", "%")],
                assumptions: vec!["Body-fat percentage measured or estimated externally"],
                category: EquationCategory::BodyComposition,
                source_module: "equations/energy.rs",
                source_function: "lean_body_mass",
            },

            Equation::KatchMcArdle => EquationMetadata {
                name: "Katch-McArdle",
                description: "Basal metabolic rate predicted from lean body mass",
                formula_typst: r#"$"BMR" = 370 + 21.6 "LBM"$"#,
                formula_plain: "BMR = 370 + 21.6 LBM",
                reference: Citation::McArdleKatch,
                variables: vec![Variable::new("LBM", "Lean body mass", "kg")],
                assumptions: vec!["Independent of sex"],
                category: EquationCategory::MetabolicRate,
                source_module: "equations/energy.rs",
                source_function: "katch_mcardle",
            },

            Equation::ActivityMultiplier => EquationMetadata {
                name: "Activity Multiplier",
                description: "Total daily energy expenditure from BMR and activity level",
                formula_typst: r#"$"TDEE" = "BMR" times f$, $f in {1.2, 1.375, 1.55, 1.725, 1.9}$"#,
                formula_plain: "TDEE = BMR x f, f = 1.2 | 1.375 | 1.55 | 1.725 | 1.9",
                reference: Citation::McArdleKatch,
                variables: vec![
                    Variable::new("BMR", "Basal metabolic rate", "kcal/day"),
                    Variable::new("f", "Activity factor", "-"),
                ],
                assumptions: vec!["Self-reported activity level"],
                category: EquationCategory::EnergyExpenditure,
                source_module: "equations/energy.rs",
                source_function: "total_daily_energy",
            },

            Equation::EnergyPerMeal => EquationMetadata {
                name: "Energy per Meal",
                description: "Daily energy target split evenly across meals",
                formula_typst: r#"$E_"meal" = E_"day" / n$"#,
                formula_plain: "E_meal = E_day / n",
                reference: Citation::Arithmetic,
                variables: vec![
                    Variable::new("E_day", "Daily energy target", "kcal"),
                    Variable::new("n", "Meals per day", "-"),
                ],
                assumptions: vec!["Even split between meals"],
                category: EquationCategory::MealPlanning,
                source_module: "equations/nutrition.rs",
                source_function: "energy_per_meal",
            },

            Equation::MacronutrientGrams => EquationMetadata {
                name: "Macronutrient Grams",
                description: "Grams of a macronutrient supplying a share of the energy target",
                formula_typst: r#"$g = E p / (100 k)$, $k = 4$ (protein, carbohydrate), $k = 9$ (fat)"#,
                formula_plain: "g = E * p / 100 / k, k = 4 (protein, carbohydrate) | 9 (fat)",
                reference: Citation::Atwater,
                variables: vec![
                    Variable::new("E", "Energy", "kcal"),
                    Variable::new("p", "Share of energy", "%"),
                    Variable::new("k", "Energy density", "kcal/g"),
                ],
                assumptions: vec!["Atwater general factors"],
                category: EquationCategory::MealPlanning,
                source_module: "equations/nutrition.rs",
                source_function: "macronutrient_grams",
            },
        }
    }

    /// Get all equations in a given category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }

    /// All categories, in appendix order
    pub fn all_categories() -> Vec<EquationCategory> {
        use EquationCategory::*;
        let mut cats = vec![MetabolicRate, BodyComposition, EnergyExpenditure, MealPlanning];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::MifflinStJeor,
    Equation::HarrisBenedictRevised,
    Equation::Owen,
    Equation::Schofield,
    Equation::LeanBodyMass,
    Equation::KatchMcArdle,
    Equation::ActivityMultiplier,
    Equation::EnergyPerMeal,
    Equation::MacronutrientGrams,
];

// ============================================================================
// Equation Usage Tracking
// ============================================================================

/// Record of an equation being applied during an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationUsage {
    pub equation: Equation,
    /// Which output the equation produced (e.g., "TDEE")
    pub context: String,
}

/// Collector for equation usage during an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage {
            equation,
            context: context.into(),
        });
    }

    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }

    /// Unique equations, in first-use order
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Group unique equations by category, in appendix order
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }

    /// Contexts an equation was applied in, deduplicated and sorted
    pub fn contexts_for(&self, equation: Equation) -> Vec<&str> {
        let mut contexts: Vec<&str> = self
            .usages
            .iter()
            .filter(|u| u.equation == equation)
            .map(|u| u.context.as_str())
            .collect();
        contexts.sort();
        contexts.dedup();
        contexts
    }
}

// ============================================================================
// Typst Appendix Generation
// ============================================================================

impl EquationTracker {
    /// Generate Typst markup for the "Equations Used" appendix.
    ///
    /// ```rust
    /// use calc_core::equations::registry::{Equation, EquationTracker};
    ///
    /// let mut tracker = EquationTracker::new();
    /// tracker.record(Equation::Owen, "RMR");
    ///
    /// let typst = tracker.generate_appendix_typst();
    /// assert!(typst.contains("Owen"));
    /// ```
    pub fn generate_appendix_typst(&self) -> String {
        let mut output = String::new();

        output.push_str(
            r##"
#v(16pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

== Equations Used

"##,
        );

        let by_category = self.by_category();
        if by_category.is_empty() {
            output.push_str("#text(style: \"italic\")[No equations recorded for this calculation.]\n");
            return output;
        }

        for (category, equations) in by_category {
            output.push_str(&format!("=== {}\n\n", category.display_name()));

            for equation in equations {
                let meta = equation.metadata();

                output.push_str(&format!("*{}* -- {}\n\n", meta.name, meta.description));
                output.push_str(&format!("{}\n\n", meta.formula_typst));
                output.push_str(&format!(
                    "#text(size: 9pt)[Reference: {}]\n\n",
                    meta.reference.citation()
                ));

                let contexts = self.contexts_for(equation);
                if !contexts.is_empty() {
                    output.push_str(&format!(
                        "#text(size: 9pt)[Applied to: {}]\n\n",
                        contexts.join(", ")
                    ));
                }

                if !meta.assumptions.is_empty() {
                    output.push_str("#text(size: 9pt)[Assumptions: ");
                    output.push_str(&meta.assumptions.join("; "));
                    output.push_str("]\n\n");
                }

                output.push_str("#v(6pt)\n");
            }
        }

        output
    }
}

// ============================================================================
// Markdown Generation for EQUATIONS.md
// ============================================================================

/// Generate the EQUATIONS.md reference listing every registered equation.
///
/// ```rust
/// use calc_core::equations::registry::generate_equations_markdown;
///
/// let markdown = generate_equations_markdown();
/// assert!(markdown.contains("# Equations Reference"));
/// assert!(markdown.contains("Mifflin-St Jeor"));
/// ```
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(8_000);

    output.push_str(
        r#"# Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

Every formula applied by the built-in calculators, with its published source.

---

"#,
    );

    let categories = Equation::all_categories();

    for category in &categories {
        let equations = Equation::in_category(*category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!(
                        "| {} | {} | {} |\n",
                        var.symbol, var.description, var.units
                    ));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`]({})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Equations:** {}\n- **Categories:** {}\n",
        ALL_EQUATIONS.len(),
        categories.len()
    ));

    output
}
