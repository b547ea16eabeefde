pub mod toml_config;

use crate::core::dates::week_of_year;
use crate::domain::model::OutputFormat;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use chrono::{Datelike, NaiveDate};

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::MenuConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "mensa-etl")]
#[command(about = "Extracts weekly canteen menus into JSON or CSV")]
pub struct CliConfig {
    /// Location identifier, e.g. mensa-garching or fmi-bistro
    pub location: String,

    #[arg(short, long, help = "TOML file overriding prices, locations and output")]
    pub config: Option<String>,

    #[arg(short, long, help = "Read the menu document from a local file instead of HTTP")]
    pub input: Option<String>,

    #[arg(long, help = "Year of the menus [default: current year]")]
    pub year: Option<i32>,

    #[arg(long, help = "Week number, weeks start on Monday [default: current week]")]
    pub week: Option<u32>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub format: Vec<OutputFormat>,

    #[arg(long, help = "Print the menus as JSON instead of writing files")]
    pub stdout: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併命令列參數與設定檔，命令列優先
    pub fn settings(&self, file: &MenuConfig, today: NaiveDate) -> Result<RunSettings> {
        let settings = RunSettings {
            year: self.year.unwrap_or_else(|| today.year()),
            week: self.week.unwrap_or_else(|| week_of_year(today)),
            input_path: self.input.clone(),
            output_path: self
                .output_path
                .clone()
                .unwrap_or_else(|| file.output_path().to_string()),
            output_formats: if self.format.is_empty() {
                file.output_formats()
            } else {
                self.format.clone()
            },
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("location", &self.location)?;
        if let Some(week) = self.week {
            validation::validate_range("week", week, 0, 53)?;
        }
        if let Some(path) = &self.output_path {
            validation::validate_path("output_path", path)?;
        }
        Ok(())
    }
}

/// Resolved settings of one extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub year: i32,
    pub week: u32,
    pub input_path: Option<String>,
    pub output_path: String,
    pub output_formats: Vec<OutputFormat>,
}

impl RunSettings {
    /// Settings for the week containing `date`, with default output.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            week: week_of_year(date),
            input_path: None,
            output_path: toml_config::DEFAULT_OUTPUT_PATH.to_string(),
            output_formats: vec![OutputFormat::Json],
        }
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_range("week", self.week, 0, 53)?;
        validation::validate_path("output_path", &self.output_path)?;
        if self.output_formats.is_empty() {
            return Err(crate::utils::error::MenuError::MissingConfigError {
                field: "output formats".to_string(),
            });
        }
        Ok(())
    }
}

impl ConfigProvider for RunSettings {
    fn year(&self) -> i32 {
        self.year
    }

    fn week(&self) -> u32 {
        self.week
    }

    fn input_path(&self) -> Option<&str> {
        self.input_path.as_deref()
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.output_formats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::toml_config::MenuConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_for_date_uses_monday_based_week() {
        let settings = RunSettings::for_date(date(2024, 1, 17));
        assert_eq!(settings.year, 2024);
        assert_eq!(settings.week, 3);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_formats_are_rejected() {
        let mut settings = RunSettings::for_date(date(2024, 1, 17));
        settings.output_formats.clear();
        assert!(settings.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_defaults_come_from_file_and_today() {
        let cli = CliConfig::parse_from(["mensa-etl", "mensa-garching"]);
        let file = MenuConfig::from_toml_str("[output]\npath = \"./menus\"\n").unwrap();

        let settings = cli.settings(&file, date(2024, 1, 1)).unwrap();

        assert_eq!(settings.year, 2024);
        assert_eq!(settings.week, 1);
        assert_eq!(settings.output_path, "./menus");
        assert_eq!(settings.output_formats, vec![OutputFormat::Json]);
        assert_eq!(settings.input_path, None);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_flags_override_file() {
        let cli = CliConfig::parse_from([
            "mensa-etl",
            "fmi-bistro",
            "--input",
            "bistro.txt",
            "--year",
            "2019",
            "--week",
            "5",
            "--format",
            "json,csv",
            "--output-path",
            "/tmp/menus",
        ]);
        let file = MenuConfig::default();

        let settings = cli.settings(&file, date(2024, 6, 1)).unwrap();

        assert_eq!(settings.year, 2019);
        assert_eq!(settings.week, 5);
        assert_eq!(settings.input_path.as_deref(), Some("bistro.txt"));
        assert_eq!(settings.output_path, "/tmp/menus");
        assert_eq!(
            settings.output_formats,
            vec![OutputFormat::Json, OutputFormat::Csv]
        );
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_rejects_week_out_of_range() {
        let cli = CliConfig::parse_from(["mensa-etl", "mensa-garching", "--week", "60"]);
        assert!(cli.validate().is_err());
        assert!(cli.settings(&MenuConfig::default(), date(2024, 1, 1)).is_err());
    }
}
