//! # Metabolic Calculator CLI
//!
//! Command-line front end for the calculators in `calc_core`.
//!
//! ```text
//! calc_cli list
//! calc_cli show bmr
//! calc_cli run bmr --set weightKg=70 --set heightCm=175 --set age=30 --set sex=male
//! calc_cli run meal --input meal.json --json
//! calc_cli prompt schofield --pdf schofield.pdf
//! ```
//!
//! Exit codes: 0 on success, 2 when the calculator id is unknown, 1 for any
//! other failure (including input the calculator rejected).

mod cli;
mod config;
mod error;
mod prompt;
mod telemetry;
mod view;

use std::fs;
use std::io;

use calc_core::pdf::ReportMeta;
use calc_core::{registry, CalcError, CalculatorSession, RawInput};
use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, PromptArgs, ReportArgs, RunArgs};
use crate::config::{CliConfig, ReportConfig};
use crate::error::CliError;

fn main() {
    if let Err(err) = run_cli() {
        match &err {
            CliError::Calc(calc) => eprintln!("{}", view::render_error(calc, registry::global())),
            other => eprintln!("error: {other}"),
        }
        std::process::exit(err.exit_code());
    }
}

fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    let mut config = CliConfig::load()?;
    if let Some(level) = cli.log_level {
        config.telemetry.log_level = level;
    }
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::List { json } => list(json),
        Command::Show { id } => {
            let definition = registry::global().get(&id)?;
            print!("{}", view::render_fields(definition));
            Ok(())
        }
        Command::Run(args) => run(args, &config.report),
        Command::Prompt(args) => prompt(args, &config.report),
    }
}

fn list(json: bool) -> Result<(), CliError> {
    let registry = registry::global();
    if json {
        let summaries: Vec<view::CalculatorSummary<'_>> = registry.iter().map(Into::into).collect();
        let rendered = serde_json::to_string_pretty(&summaries).map_err(calc_core::CalcError::from)?;
        println!("{}", rendered);
    } else {
        print!("{}", view::render_list(registry));
    }
    Ok(())
}

fn run(args: RunArgs, report: &ReportConfig) -> Result<(), CliError> {
    let definition = registry::global().get(&args.id)?;
    let mut session = CalculatorSession::new(definition);

    let from_file = match &args.input {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
            Some(RawInput::from_json(&json)?)
        }
        None => None,
    };
    session.load(collect_input(from_file, args.assignments));

    match session.submit() {
        Ok(result) => {
            if args.json {
                println!("{}", result.to_json_pretty()?);
            } else {
                print!("{}", view::render_result(definition, result));
            }
        }
        Err(err) => {
            if args.json {
                if let Some(rendered) = error_json(&err) {
                    println!("{}", rendered);
                }
            }
            return Err(err.into());
        }
    }

    export(&session, &args.report, report)
}

fn prompt(args: PromptArgs, report: &ReportConfig) -> Result<(), CliError> {
    let mut session = CalculatorSession::open(registry::global(), &args.id)?;
    let definition = session.definition();

    println!("{}\n{}\n", definition.name, definition.description);
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    prompt::fill_session(&mut session, &mut reader, &mut writer)?;

    if let Some(result) = session.result() {
        print!("\n{}", view::render_result(definition, result));
    }
    export(&session, &args.report, report)
}

/// `--input` file values, overridden field by field by `--set` assignments
fn collect_input(from_file: Option<RawInput>, assignments: Vec<(String, String)>) -> RawInput {
    let mut input = from_file.unwrap_or_default();
    for (field, value) in assignments {
        input.set(field, value);
    }
    input
}

/// Error body printed by `run --json`
fn error_json(err: &CalcError) -> Option<String> {
    serde_json::to_string_pretty(err).ok()
}

/// Write the PDF report when `--pdf` was given
fn export(session: &CalculatorSession<'_>, args: &ReportArgs, report: &ReportConfig) -> Result<(), CliError> {
    let Some(pdf) = &args.pdf else {
        return Ok(());
    };

    let meta = ReportMeta::new(report.author_for(args.author.as_deref()), args.client.clone());
    let bytes = session.export_pdf(&meta)?;

    let path = report.resolve(pdf.clone());
    fs::write(&path, &bytes).map_err(|e| CliError::io(&path, e))?;
    info!(session = %session.id, path = %path.display(), bytes = bytes.len(), "report written");
    eprintln!("Report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::RawValue;
    use std::path::PathBuf;

    #[test]
    fn test_set_overrides_input_file() {
        let file = RawInput::from_json(r#"{"weightKg": 80, "age": 30, "sex": "male"}"#).unwrap();
        let input = collect_input(
            Some(file),
            vec![("weightKg".to_string(), "70".to_string()), ("heightCm".to_string(), "175".to_string())],
        );

        assert_eq!(input.get("weightKg"), Some(&RawValue::from("70")));
        assert_eq!(input.get("age"), Some(&RawValue::from(30.0)));
        assert_eq!(input.len(), 4);

        let result = registry::global().evaluate("bmr", &input).unwrap();
        assert!((result.number("bmr").unwrap() - 1648.75).abs() < 1e-9);
    }

    #[test]
    fn test_assignments_without_file() {
        let input = collect_input(None, vec![("sex".to_string(), "female".to_string())]);
        assert_eq!(input.len(), 1);
        assert!(collect_input(None, Vec::new()).is_empty());
    }

    #[test]
    fn test_author_precedence() {
        let configured = ReportConfig {
            author: Some("Clinic".to_string()),
            output_dir: PathBuf::from("."),
        };
        assert_eq!(configured.author_for(Some("Dr. Lee")), "Dr. Lee");
        assert_eq!(configured.author_for(None), "Clinic");
        assert_eq!(configured.author_for(Some("  ")), "Clinic");

        let unset = ReportConfig {
            author: None,
            output_dir: PathBuf::from("."),
        };
        assert_eq!(unset.author_for(None), "");
    }

    #[test]
    fn test_error_json_names_fields() {
        let input = RawInput::new().with("weightKg", 70.0);
        let err = registry::global().evaluate("bmr", &input).unwrap_err();
        let json: serde_json::Value = serde_json::from_str(&error_json(&err).unwrap()).unwrap();

        assert_eq!(json["type"], "Validation");
        assert_eq!(json["details"]["calculator_id"], "bmr");
        let fields: Vec<&str> = json["details"]["issues"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|issue| issue["field"].as_str())
            .collect();
        assert!(fields.contains(&"heightCm"));
        assert!(fields.contains(&"sex"));
    }
}
