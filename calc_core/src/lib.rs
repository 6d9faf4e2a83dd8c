//! # calc_core - Metabolic Calculator Engine
//!
//! `calc_core` describes energy-expenditure calculators declaratively (input
//! fields plus a pure formula) and evaluates them. All inputs and results are
//! JSON-serializable, so the same engine can sit behind a CLI, a web form or
//! an API.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Formulas are pure functions of validated input
//! - **Exhaustive validation**: Every failing field is reported at once
//! - **Rich Errors**: Structured error types, not just strings
//! - **Traceable**: Results record the published equations they used
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::{registry, RawInput};
//!
//! let bmr = registry::global().get("bmr").unwrap();
//! let input = RawInput::new()
//!     .with("weightKg", 70.0)
//!     .with("heightCm", 175.0)
//!     .with("age", 30.0)
//!     .with("sex", "male");
//!
//! let result = bmr.calculate(&input).unwrap();
//! assert_eq!(result.number("bmr"), Some(1648.75));
//!
//! // Serialize for storage or transmission
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`schema`] - Field descriptors and constraints
//! - [`input`] - Raw form input and validated field values
//! - [`definition`] - Calculator definitions
//! - [`engine`] - Validation and evaluation
//! - [`registry`] - Calculator lookup by id
//! - [`calculators`] - Built-in BMR, Owen, Schofield, multi and meal calculators
//! - [`equations`] - Published equations and their metadata
//! - [`result`] - Calculation results
//! - [`session`] - Edit / submit / export cycle of one calculator page
//! - [`pdf`] - Typst report rendering
//! - [`units`] - Units of measure and energy conversions
//! - [`errors`] - Structured error types

pub mod calculators;
pub mod definition;
pub mod engine;
pub mod equations;
pub mod errors;
pub mod input;
pub mod pdf;
pub mod registry;
pub mod result;
pub mod schema;
pub mod session;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use definition::CalculatorDefinition;
pub use errors::{CalcError, CalcResult, FieldIssue, IssueKind};
pub use input::{FieldValue, RawInput, RawValue};
pub use registry::CalculatorRegistry;
pub use result::{CalculatorResult, Output, OutputValue};
pub use schema::{FieldKind, FieldSchema};
pub use session::CalculatorSession;
