use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Could not parse date from '{input}'")]
    DateParse { input: String },

    #[error("No price entry for dish type '{label}'")]
    MissingPriceEntry { label: String },

    #[error("Structural mismatch: {reason}")]
    StructuralMismatch { reason: String },

    #[error("Week {week} of year {year} is outside the supported calendar range")]
    InvalidWeekDate { year: i32, week: u32 },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl MenuError {
    /// 給使用者看的簡短錯誤訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            MenuError::HttpError(_) | MenuError::HttpStatus { .. } => {
                "Could not download the menu page".to_string()
            }
            MenuError::IoError(e) => format!("File system error: {}", e),
            MenuError::ConfigError { .. }
            | MenuError::InvalidConfigValueError { .. }
            | MenuError::MissingConfigError { .. } => format!("Invalid configuration: {}", self),
            _ => self.to_string(),
        }
    }

    /// 命令列輸出的錯誤報告 (訊息與建議各一行)
    pub fn cli_report(&self) -> String {
        format!(
            "❌ {}\n💡 Suggestion: {}",
            self.user_friendly_message(),
            self.recovery_suggestion()
        )
    }

    /// 建議的修復方式
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MenuError::HttpError(_) | MenuError::HttpStatus { .. } => {
                "Check your network connection and the location URL, or pass --input with a saved copy"
            }
            MenuError::IoError(_) => "Check that the input file exists and the output path is writable",
            MenuError::ConfigError { .. } | MenuError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again"
            }
            MenuError::MissingConfigError { .. } => "Provide the missing option on the command line",
            MenuError::InvalidWeekDate { .. } => "Pass a --year within the supported range",
            _ => "Re-run with --verbose for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, MenuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_parse_message_names_input() {
        let err = MenuError::DateParse {
            input: "XYZ".to_string(),
        };
        assert_eq!(err.to_string(), "Could not parse date from 'XYZ'");
    }

    #[test]
    fn test_cli_report_is_english() {
        let err = MenuError::MissingConfigError {
            field: "input".to_string(),
        };
        let report = err.cli_report();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("❌ Invalid configuration"));
        assert_eq!(
            lines[1],
            "💡 Suggestion: Provide the missing option on the command line"
        );
    }

    #[test]
    fn test_missing_config_suggests_cli_option() {
        let err = MenuError::MissingConfigError {
            field: "input".to_string(),
        };
        assert!(err.recovery_suggestion().contains("command line"));
        assert!(err.user_friendly_message().contains("input"));
    }
}
