use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "calc_cli",
    about = "Run BMR, Owen, Schofield, multi-equation and meal calculators from the command line",
    version
)]
pub struct Cli {
    /// Override the configured log level/filter (e.g. "debug", "calc_core=trace")
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available calculators
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the input fields of a calculator
    Show {
        /// Calculator id (e.g. "bmr")
        id: String,
    },
    /// Evaluate a calculator from flags and/or a JSON input file
    Run(RunArgs),
    /// Fill in a calculator's fields interactively, then evaluate
    Prompt(PromptArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Calculator id (e.g. "bmr")
    pub id: String,
    /// Field value, repeatable (e.g. --set weightKg=70 --set sex=male)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub assignments: Vec<(String, String)>,
    /// JSON object of field values; --set entries override it
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Print the result (or error) as JSON
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Calculator id (e.g. "meal")
    pub id: String,
    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Also write a PDF report (relative paths land in CALC_OUTPUT_DIR)
    #[arg(long)]
    pub pdf: Option<PathBuf>,
    /// "Prepared by" line of the report (overrides CALC_REPORT_AUTHOR)
    #[arg(long)]
    pub author: Option<String>,
    /// "Prepared for" line of the report
    #[arg(long, default_value = "")]
    pub client: String,
}

/// Parse `field=value`. The value may be empty (treated as not supplied).
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", raw))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    Ok((field.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("weightKg=70").unwrap(),
            ("weightKg".to_string(), "70".to_string())
        );
        assert_eq!(parse_assignment("note=a=b").unwrap().1, "a=b");
        assert_eq!(parse_assignment("age=").unwrap().1, "");
        assert!(parse_assignment("weightKg").is_err());
        assert!(parse_assignment(" =70").is_err());
    }

    #[test]
    fn test_run_command_parses() {
        let cli = Cli::try_parse_from([
            "calc_cli", "run", "bmr", "--set", "weightKg=70", "--set", "sex=male", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.id, "bmr");
                assert_eq!(args.assignments.len(), 2);
                assert!(args.json);
                assert!(args.report.pdf.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
