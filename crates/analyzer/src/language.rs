use crate::error::{AnalysisError, Result};
use std::path::Path;

/// Language of a file that may hold a locatable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" | "pyw" => Language::Python,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Unknown => "unknown",
        }
    }

    /// Check if entity analysis (locate + parse) is available for this language
    pub fn supports_ast(self) -> bool {
        matches!(self, Language::Python)
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> Result<tree_sitter::Language> {
        match self {
            Language::Python => Ok(tree_sitter_python::LANGUAGE.into()),
            Language::Unknown => Err(AnalysisError::parse(format!(
                "no grammar available for {}",
                self.as_str()
            ))),
        }
    }
}
