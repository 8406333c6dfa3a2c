use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while locating or analyzing code
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Entity (or method) definition could not be found
    #[error("Could not find entity '{entity}' in the codebase")]
    NotFound {
        entity: String,
        method: Option<String>,
        suggestions: Vec<String>,
    },

    /// Source did not conform to the grammar
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Line-range target does not exist
    #[error("Could not locate file: {path}")]
    FileNotFound {
        path: String,
        attempted_paths: Vec<PathBuf>,
        suggestions: Vec<String>,
    },

    /// Line-range target exists but could not be read
    #[error("Could not read file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed line specification
    #[error("Could not parse line number: {spec}")]
    InvalidLineSpec { spec: String, expected: String },

    /// Line outside of the file
    #[error("Line {line} is out of range (file has {total_lines} lines)")]
    LineOutOfRange {
        line: usize,
        total_lines: usize,
        valid_range: String,
    },

    /// Unexpected failure inside one analyzer
    #[error("Internal analysis error: {0}")]
    InternalAnalysisError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Create a not-found error with the standard remediation hints
    pub fn not_found(entity: impl Into<String>, method: Option<&str>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            method: method.map(str::to_string),
            suggestions: vec![
                "Check if the class/method name is spelled correctly".to_string(),
                "Ensure the file is in the project directory".to_string(),
                "Try providing the file_path parameter".to_string(),
            ],
        }
    }

    /// Create a file-not-found error listing every path that was tried
    pub fn file_not_found(path: impl Into<String>, attempted_paths: Vec<PathBuf>) -> Self {
        Self::FileNotFound {
            path: path.into(),
            attempted_paths,
            suggestions: vec![
                "Check if the file path is correct".to_string(),
                "Ensure the file exists on your machine".to_string(),
                "Try using an absolute path".to_string(),
                "Verify file permissions".to_string(),
            ],
        }
    }

    /// Create an invalid line spec error
    pub fn invalid_line_spec(spec: impl Into<String>) -> Self {
        Self::InvalidLineSpec {
            spec: spec.into(),
            expected: "Single line (e.g., '42') or range (e.g., '42-45')".to_string(),
        }
    }

    /// Create a line out of range error
    pub fn line_out_of_range(line: usize, total_lines: usize) -> Self {
        Self::LineOutOfRange {
            line,
            total_lines,
            valid_range: format!("1-{total_lines}"),
        }
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an internal analysis error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalAnalysisError(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::ParseError(_) => "parse_error",
            Self::FileNotFound { .. } => "file_not_found",
            Self::FileReadError { .. } => "file_read_error",
            Self::InvalidLineSpec { .. } => "invalid_line_spec",
            Self::LineOutOfRange { .. } => "line_out_of_range",
            Self::InternalAnalysisError(_) => "internal_analysis_error",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Io(_) => "io_error",
        }
    }

    /// Actionable hints for the caller
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotFound { suggestions, .. } | Self::FileNotFound { suggestions, .. } => {
                suggestions.clone()
            }
            Self::FileReadError { .. } => vec![
                "Verify file permissions".to_string(),
                "Ensure the file is UTF-8 encoded text".to_string(),
            ],
            Self::InvalidLineSpec { expected, .. } => vec![expected.clone()],
            Self::LineOutOfRange { valid_range, .. } => {
                vec![format!("Use a line within {valid_range}")]
            }
            Self::ParseError(_) => vec!["Check if the code is syntactically valid".to_string()],
            Self::InternalAnalysisError(_) | Self::Io(_) => {
                vec!["Try with a simpler entity first to verify the analyzer works".to_string()]
            }
            Self::InvalidConfig(_) => vec!["Review the configuration values".to_string()],
        }
    }

    /// Render the error as a serializable document
    pub fn to_report(&self) -> ErrorReport {
        let details = match self {
            Self::NotFound { entity, method, .. } => serde_json::json!({
                "entity_name": entity,
                "method_name": method,
            }),
            Self::FileNotFound {
                attempted_paths, ..
            } => serde_json::json!({ "attempted_paths": attempted_paths }),
            Self::FileReadError { path, .. } => serde_json::json!({ "file_path": path }),
            Self::InvalidLineSpec { expected, .. } => {
                serde_json::json!({ "expected_format": expected })
            }
            Self::LineOutOfRange { valid_range, .. } => {
                serde_json::json!({ "valid_range": valid_range })
            }
            _ => serde_json::Value::Null,
        };

        ErrorReport {
            error: self.to_string(),
            kind: self.kind(),
            suggestions: self.suggestions(),
            details,
        }
    }
}

/// Error rendered as data for the transport layer
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub kind: &'static str,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn out_of_range_reports_valid_interval() {
        let err = AnalysisError::line_out_of_range(999_999, 50);
        let report = err.to_report();
        assert_eq!(report.kind, "line_out_of_range");
        assert_eq!(report.details["valid_range"], "1-50");
    }

    #[test]
    fn not_found_carries_suggestions() {
        let err = AnalysisError::not_found("Missing", None);
        assert_eq!(err.suggestions().len(), 3);
        assert!(err.to_string().contains("Missing"));
    }
}
