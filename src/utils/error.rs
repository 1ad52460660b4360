use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Parse error in row {row}, column '{column}': '{value}' is not an integer")]
    ParseError {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Index error: {message}")]
    IndexError { message: String },

    #[error("Invalid input: {message}")]
    InvalidInputError { message: String },

    #[error("Division error: total resources of '{name}' is zero")]
    DivisionError { name: String },

    #[error("Overflow error: {field} of '{name}' is out of range")]
    OverflowError { name: String, field: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Input,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 使用者可以修正輸入後重試
    Medium,
    High,
    Critical,
}

impl AnalyticsError {
    pub fn index(message: impl Into<String>) -> Self {
        Self::IndexError {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInputError {
            message: message.into(),
        }
    }

    pub fn overflow(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::OverflowError {
            name: name.into(),
            field: field.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ParseError { .. }
            | Self::DivisionError { .. }
            | Self::OverflowError { .. }
            | Self::CsvError(_) => ErrorCategory::Data,
            Self::IndexError { .. } | Self::InvalidInputError { .. } => ErrorCategory::Input,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::IndexError { .. } | Self::InvalidInputError { .. } => ErrorSeverity::Medium,
            Self::ParseError { .. }
            | Self::DivisionError { .. }
            | Self::OverflowError { .. }
            | Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ParseError { .. } => {
                "Fix the non-numeric cell in the CSV file or rerun with --skip-invalid-rows"
            }
            Self::IndexError { .. } => {
                "Select exactly two different rows that exist in the table (see `show`)"
            }
            Self::InvalidInputError { .. } => "Enter a non-negative whole number and try again",
            Self::DivisionError { .. } => {
                "Give the hospital at least one resource or rerun with --zero-total-as-zero"
            }
            Self::OverflowError { .. } => {
                "Use smaller counts; reload the data file if the values have run away"
            }
            Self::CsvError(_) => "Check that the data file is comma-separated text",
            Self::IoError(_) => "Check that the file exists and is readable",
            Self::SerializationError(_) => "Retry without --json",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ParseError { row, column, value } => format!(
                "Row {} has '{}' in column '{}', which is not a whole number",
                row, value, column
            ),
            Self::IndexError { message } => format!("Row selection problem: {}", message),
            Self::InvalidInputError { message } => {
                format!("Please enter a valid value: {}", message)
            }
            Self::DivisionError { name } => {
                format!("Cannot chart '{}': it has no resources at all", name)
            }
            Self::OverflowError { name, field } => {
                format!("{} of '{}' would overflow", field, name)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_category() {
        let input = AnalyticsError::invalid_input("blank");
        assert_eq!(input.category(), ErrorCategory::Input);
        assert_eq!(input.severity(), ErrorSeverity::Medium);

        let io = AnalyticsError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert_eq!(io.category(), ErrorCategory::System);
        assert_eq!(io.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_parse_error_message_names_cell() {
        let err = AnalyticsError::ParseError {
            row: 3,
            column: "staff".to_string(),
            value: "ten".to_string(),
        };
        assert!(err.to_string().contains("row 3"));
        assert!(err.user_friendly_message().contains("'ten'"));
    }

    #[test]
    fn test_overflow_is_a_data_error() {
        let err = AnalyticsError::overflow("General", "Number of Staff");
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("'General'"));
    }
}
