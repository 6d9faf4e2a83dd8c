use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Settings for the command-line front end.
///
/// Values come from the environment, after an optional `.env` file has been
/// loaded. Command-line flags override them.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub telemetry: TelemetryConfig,
    pub report: ReportConfig,
}

impl CliConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let log_level = env::var("CALC_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        let author = env::var("CALC_REPORT_AUTHOR")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let output_dir = PathBuf::from(env::var("CALC_OUTPUT_DIR").unwrap_or_else(|_| ".".to_string()));
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(ConfigError::OutputDirNotADirectory { path: output_dir });
        }

        Ok(Self {
            telemetry: TelemetryConfig { log_level },
            report: ReportConfig { author, output_dir },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults for exported reports.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Printed as "Prepared by" unless `--author` is given
    pub author: Option<String>,
    /// Base directory for relative `--pdf` paths
    pub output_dir: PathBuf,
}

impl ReportConfig {
    /// "Prepared by" line: the `--author` flag, then the configured author,
    /// then blank
    pub fn author_for(&self, flag: Option<&str>) -> String {
        flag.map(str::trim)
            .filter(|name| !name.is_empty())
            .or(self.author.as_deref())
            .unwrap_or_default()
            .to_string()
    }

    /// Resolve a report path against the output directory
    pub fn resolve(&self, path: PathBuf) -> PathBuf {
        if path.is_absolute() {
            path
        } else {
            self.output_dir.join(path)
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CALC_OUTPUT_DIR '{}' exists but is not a directory", .path.display())]
    OutputDirNotADirectory { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("CALC_LOG_LEVEL");
        env::remove_var("CALC_REPORT_AUTHOR");
        env::remove_var("CALC_OUTPUT_DIR");
    }

    #[test]
    fn test_load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().unwrap();
        reset_env();
        let config = CliConfig::load().unwrap();
        assert_eq!(config.telemetry.log_level, "warn");
        assert_eq!(config.report.author, None);
        assert_eq!(config.report.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_blank_author_is_ignored() {
        let _lock = env_guard().lock().unwrap();
        reset_env();
        env::set_var("CALC_REPORT_AUTHOR", "   ");
        env::set_var("CALC_LOG_LEVEL", "debug");
        let config = CliConfig::load().unwrap();
        assert_eq!(config.report.author, None);
        assert_eq!(config.telemetry.log_level, "debug");
        reset_env();
    }

    #[test]
    fn test_output_dir_must_be_directory() {
        let _lock = env_guard().lock().unwrap();
        reset_env();
        env::set_var("CALC_OUTPUT_DIR", "Cargo.toml");
        let err = CliConfig::load().unwrap_err();
        assert!(err.to_string().contains("not a directory"));
        reset_env();
    }

    #[test]
    fn test_relative_report_paths_resolve_against_output_dir() {
        let report = ReportConfig {
            author: None,
            output_dir: PathBuf::from("reports"),
        };
        assert_eq!(report.resolve(PathBuf::from("bmr.pdf")), PathBuf::from("reports/bmr.pdf"));
        let absolute = env::temp_dir().join("bmr.pdf");
        assert_eq!(report.resolve(absolute.clone()), absolute);
    }
}
