//! Write the equations reference (EQUATIONS.md) from the equation registry.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gen-equations                 # write the default path
//! cargo run --bin gen-equations -- docs/EQ.md   # write elsewhere
//! cargo run --bin gen-equations -- --check      # exit 1 if the file is stale
//! ```
//!
//! The default output is `calc_core/src/equations/EQUATIONS.md`, relative to
//! the workspace root.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use calc_core::equations::{generate_equations_markdown, Equation, ALL_EQUATIONS};
use clap::Parser;

const DEFAULT_OUTPUT: &str = "calc_core/src/equations/EQUATIONS.md";

#[derive(Parser, Debug)]
#[command(name = "gen-equations", about = "Write the equations reference markdown")]
struct Cli {
    /// Output file
    #[arg(default_value = DEFAULT_OUTPUT)]
    path: PathBuf,
    /// Compare the file against the registry instead of writing it
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output_path = cli.path;
    let markdown = generate_equations_markdown();

    if cli.check {
        return match fs::read_to_string(&output_path) {
            Ok(existing) if existing == markdown => {
                println!("{} is up to date.", output_path.display());
                ExitCode::SUCCESS
            }
            Ok(_) => {
                eprintln!("{} is stale; run gen-equations to refresh it.", output_path.display());
                ExitCode::FAILURE
            }
            Err(e) => {
                eprintln!("Cannot read {}: {}", output_path.display(), e);
                ExitCode::FAILURE
            }
        };
    }

    if let Err(e) = fs::write(&output_path, &markdown) {
        eprintln!("Error writing {}: {}", output_path.display(), e);
        return ExitCode::FAILURE;
    }

    println!(
        "Wrote {} equations ({} bytes) to {}",
        ALL_EQUATIONS.len(),
        markdown.len(),
        output_path.display()
    );
    for category in Equation::all_categories() {
        println!(
            "  {:<24} {}",
            category.display_name(),
            Equation::in_category(category).len()
        );
    }
    ExitCode::SUCCESS
}
