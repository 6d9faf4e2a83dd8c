//! # Calculator Registry
//!
//! Table of calculator definitions keyed by id. The process-wide table
//! ([`global`]) is built once from the built-in calculators on first use
//! and is read-only afterwards, so lookups need no locking.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::registry;
//!
//! let bmr = registry::global().get("bmr").unwrap();
//! assert!(bmr.field_by_id("weightKg").is_some());
//!
//! let err = registry::global().get("unknown-id").unwrap_err();
//! assert_eq!(err.error_code(), "NOT_FOUND");
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::calculators;
use crate::definition::CalculatorDefinition;
use crate::errors::{CalcError, CalcResult};
use crate::input::RawInput;
use crate::result::CalculatorResult;

static GLOBAL: Lazy<CalculatorRegistry> = Lazy::new(CalculatorRegistry::builtin);

/// The process-wide registry of built-in calculators
pub fn global() -> &'static CalculatorRegistry {
    &GLOBAL
}

/// Calculator definitions in registration (menu) order, with O(1) lookup.
#[derive(Debug, Clone, Default)]
pub struct CalculatorRegistry {
    definitions: Vec<CalculatorDefinition>,
    index: HashMap<&'static str, usize>,
}

impl CalculatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in calculator.
    ///
    /// Built-ins that fail to register are logged and skipped; the unit
    /// tests keep that list empty.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for definition in calculators::builtin() {
            let id = definition.id;
            if let Err(err) = registry.register(definition) {
                warn!(calculator = id, error = %err, "skipping built-in calculator");
            }
        }
        registry
    }

    /// Add a definition, rejecting duplicate ids and malformed definitions.
    pub fn register(&mut self, definition: CalculatorDefinition) -> CalcResult<()> {
        definition.check()?;
        if self.index.contains_key(definition.id) {
            return Err(CalcError::DuplicateCalculator {
                calculator_id: definition.id.to_string(),
            });
        }
        self.index.insert(definition.id, self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Look up a definition by id
    pub fn get(&self, id: &str) -> CalcResult<&CalculatorDefinition> {
        match self.index.get(id) {
            Some(&i) => Ok(&self.definitions[i]),
            None => {
                debug!(calculator = id, "calculator not registered");
                Err(CalcError::not_found(id))
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Ids in menu order
    pub fn ids(&self) -> Vec<&'static str> {
        self.definitions.iter().map(|d| d.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalculatorDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Look up `id` and evaluate `input` against it
    pub fn evaluate(&self, id: &str, input: &RawInput) -> CalcResult<CalculatorResult> {
        self.get(id)?.calculate(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ValidatedInput;
    use crate::result::FormulaOutput;
    use crate::schema::FieldSchema;

    fn nothing(_: &ValidatedInput) -> CalcResult<FormulaOutput> {
        Ok(FormulaOutput::new())
    }

    #[test]
    fn test_every_builtin_registers() {
        assert_eq!(global().len(), calculators::builtin().len());
        assert_eq!(global().ids(), vec!["bmr", "owen", "schofield", "multi", "meal"]);
    }

    #[test]
    fn test_get_bmr_fields() {
        let bmr = global().get("bmr").unwrap();
        let ids: Vec<_> = bmr.fields().iter().map(|f| f.id).collect();
        for expected in ["weightKg", "heightCm", "age", "sex"] {
            assert!(ids.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_unknown_id_not_found() {
        let err = global().get("unknown-id").unwrap_err();
        assert!(matches!(err, CalcError::NotFound { ref calculator_id } if calculator_id == "unknown-id"));
        assert!(!global().contains("unknown-id"));
    }

    #[test]
    fn test_register_rejects_duplicates_and_bad_definitions() {
        let mut registry = CalculatorRegistry::new();
        let def = CalculatorDefinition::new("x", "X", "test", nothing).field(FieldSchema::number("a", "A"));
        registry.register(def.clone()).unwrap();

        let err = registry.register(def).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_CALCULATOR");

        let empty = CalculatorDefinition::new("y", "Y", "test", nothing);
        assert_eq!(registry.register(empty).unwrap_err().error_code(), "INVALID_DEFINITION");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_evaluate_by_id() {
        let input = RawInput::new().with("weightKg", 70.0).with("sex", "male");
        let result = global().evaluate("owen", &input).unwrap();
        assert_eq!(result.calculator_id, "owen");
        assert_eq!(global().evaluate("nope", &input).unwrap_err().error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_concurrent_lookups() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    let input = RawInput::new()
                        .with("weightKg", 70.0)
                        .with("heightCm", 175.0)
                        .with("age", 30.0)
                        .with("sex", "male");
                    global().evaluate("bmr", &input).unwrap().number("bmr")
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(1648.75));
        }
    }
}
