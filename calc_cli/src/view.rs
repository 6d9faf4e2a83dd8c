//! Plain-text views of calculators, results and errors.
//!
//! Everything is rendered from a definition and a result; nothing here
//! evaluates a formula.

use std::fmt::Write as _;

use calc_core::{CalcError, CalculatorDefinition, CalculatorRegistry, CalculatorResult, FieldSchema};
use serde::Serialize;

/// One row of `list --json`.
#[derive(Debug, Serialize)]
pub struct CalculatorSummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub fields: Vec<&'a str>,
}

impl<'a> From<&'a CalculatorDefinition> for CalculatorSummary<'a> {
    fn from(definition: &'a CalculatorDefinition) -> Self {
        Self {
            id: definition.id,
            name: definition.name,
            description: definition.description,
            fields: definition.fields().iter().map(|f| f.id).collect(),
        }
    }
}

pub fn render_list(registry: &CalculatorRegistry) -> String {
    let mut out = String::new();
    for definition in registry.iter() {
        let _ = writeln!(out, "{:<10} {:<28} {}", definition.id, definition.name, definition.description);
    }
    out
}

pub fn render_fields(definition: &CalculatorDefinition) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", definition.name, definition.id);
    let _ = writeln!(out, "{}", definition.description);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<16} {:<22} {:<7} {:<9} {:<10} constraints",
        "field", "label", "kind", "unit", "required"
    );

    for field in definition.fields() {
        let _ = writeln!(
            out,
            "{:<16} {:<22} {:<7} {:<9} {:<10} {}",
            field.id,
            field.label,
            field.kind_name(),
            field.unit.map(|u| u.symbol()).unwrap_or("-"),
            requirement(field),
            field.constraint_summary()
        );
        if let Some(help) = field.help {
            let _ = writeln!(out, "{:<16} {}", "", help);
        }
    }

    if !definition.equations().is_empty() {
        let names: Vec<_> = definition.equations().iter().map(|eq| eq.metadata().name).collect();
        let _ = writeln!(out);
        let _ = writeln!(out, "Equations: {}", names.join(", "));
    }
    out
}

fn requirement(field: &FieldSchema) -> String {
    match (field.required, field.default) {
        (_, Some(default)) => format!("={}", default.to_value()),
        (true, None) => "yes".to_string(),
        (false, None) => "no".to_string(),
    }
}

pub fn render_result(definition: &CalculatorDefinition, result: &CalculatorResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", definition.name);
    let _ = writeln!(out, "{}", "=".repeat(definition.name.len()));

    let _ = writeln!(out, "\nInputs:");
    for echo in &result.inputs {
        let field = definition.field_by_id(&echo.id);
        let label = field.map(|f| f.label).unwrap_or(echo.id.as_str());
        let value = echo
            .value
            .as_str()
            .and_then(|choice| field.and_then(|f| f.option_label(choice)))
            .map(str::to_string)
            .unwrap_or_else(|| echo.value.to_string());
        let unit = field.and_then(|f| f.unit).map(|u| format!(" {}", u)).unwrap_or_default();
        let marker = if echo.defaulted { " (default)" } else { "" };
        let _ = writeln!(out, "  {:<32} {}{}{}", label, value, unit, marker);
    }

    let _ = writeln!(out, "\nResults:");
    for output in &result.outputs {
        let _ = writeln!(out, "  {:<32} {}", output.label, output.display());
    }

    let equations = result.equations.unique_equations();
    if !equations.is_empty() {
        let names: Vec<String> = equations
            .iter()
            .map(|eq| {
                let meta = eq.metadata();
                format!("{} ({})", meta.name, meta.reference.short_form())
            })
            .collect();
        let _ = writeln!(out, "\nEquations used: {}", names.join(", "));
    }
    out
}

/// Human-readable error, with field labels looked up in `registry`
pub fn render_error(err: &CalcError, registry: &CalculatorRegistry) -> String {
    match err {
        CalcError::NotFound { calculator_id } => format!("calculator not available: {}", calculator_id),
        CalcError::Validation { calculator_id, issues } | CalcError::Domain { calculator_id, issues } => {
            let definition = registry.get(calculator_id).ok();
            let mut out = String::from("Please correct the following:\n");
            for issue in issues {
                let label = definition
                    .and_then(|d| d.field_by_id(&issue.field))
                    .map(|f| f.label)
                    .unwrap_or(issue.field.as_str());
                let _ = writeln!(out, "  - {} ({}): {}", label, issue.field, issue.reason);
            }
            out
        }
        other => format!("error: {}", other),
    }
}
