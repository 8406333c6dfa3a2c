use crate::structure::SyntaxTarget;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// What to analyze, identified by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocateRequest {
    /// Class or function name
    pub entity_name: String,

    /// Method to narrow to when the entity is a class
    pub method_name: Option<String>,

    /// File to search; the project root is scanned when absent
    pub file_path: Option<PathBuf>,
}

impl LocateRequest {
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            method_name: None,
            file_path: None,
        }
    }

    /// Builder: narrow to a method
    #[must_use]
    pub fn method(mut self, method_name: impl Into<String>) -> Self {
        self.method_name = Some(method_name.into());
        self
    }

    /// Builder: search a single file
    #[must_use]
    pub fn in_file(mut self, file_path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }
}

/// What to analyze, identified by position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRequest {
    pub file_path: String,

    /// Single line ("42") or inclusive range ("42-45")
    pub line_spec: String,

    pub question: String,

    pub target_symbol: Option<String>,

    /// Window size; the configured default applies when absent
    pub context_window: Option<usize>,
}

impl LineRequest {
    pub fn new(
        file_path: impl Into<String>,
        line_spec: impl Into<String>,
        question: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            line_spec: line_spec.into(),
            question: question.into(),
            target_symbol: None,
            context_window: None,
        }
    }

    /// Builder: focus on a symbol
    #[must_use]
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.target_symbol = Some(symbol.into());
        self
    }

    /// Builder: override the context window
    #[must_use]
    pub const fn window(mut self, window: usize) -> Self {
        self.context_window = Some(window);
        self
    }
}

/// Kind of definition that was located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Class,
    Function,
}

impl EntityKind {
    pub fn from_keyword(keyword: &str) -> Self {
        if keyword == "class" {
            EntityKind::Class
        } else {
            EntityKind::Function
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Class => "class",
            EntityKind::Function => "function",
        }
    }
}

/// Declarations surrounding the located entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surrounding {
    /// Import statements in source order
    pub imports: Vec<String>,
    pub sibling_classes: BTreeSet<String>,
    pub sibling_functions: BTreeSet<String>,
    pub module_constants: BTreeSet<String>,
}

impl Surrounding {
    /// Fold declarations from another harvest into this one
    pub fn merge(&mut self, other: Surrounding) {
        for import in other.imports {
            if !self.imports.contains(&import) {
                self.imports.push(import);
            }
        }
        self.sibling_classes.extend(other.sibling_classes);
        self.sibling_functions.extend(other.sibling_functions);
        self.module_constants.extend(other.module_constants);
    }
}

/// Everything known about a located entity
///
/// `source_text` always holds the complete indentation-delimited block of the
/// definition, starting at its header line.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub entity_name: String,
    pub method_name: Option<String>,
    pub source_text: String,
    pub file_path: PathBuf,

    /// 1-indexed line of the definition header
    pub start_line: usize,

    pub entity_kind: EntityKind,

    /// Present only when the block parsed cleanly and the node was found
    pub syntax: Option<SyntaxTarget>,

    pub surrounding: Surrounding,

    /// Set when the block did not parse
    pub parse_error: Option<String>,
}

impl SourceContext {
    /// Number of lines in the extracted block
    pub fn line_count(&self) -> usize {
        self.source_text.lines().count()
    }

    /// 1-indexed, inclusive end line of the block
    pub fn end_line(&self) -> usize {
        self.start_line + self.line_count().saturating_sub(1)
    }

    /// True when the file location is known
    pub fn has_file_path(&self) -> bool {
        !self.file_path.as_os_str().is_empty()
    }
}

/// Category of a detected issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Security,
    Performance,
    Correctness,
    Maintainability,
    Reliability,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Security => "security",
            Category::Performance => "performance",
            Category::Correctness => "correctness",
            Category::Maintainability => "maintainability",
            Category::Reliability => "reliability",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity bucket of a detected issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Critical and high findings demand an immediate fix
    pub const fn is_urgent(self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: Category,

    /// Short label, e.g. "Code Injection"
    pub title: String,

    pub description: String,
    pub severity: Severity,
    pub suggestion: String,
}

impl Finding {
    #[must_use]
    pub fn new(
        category: Category,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            category,
            title: title.into(),
            description: description.into(),
            severity,
            suggestion: suggestion.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        assert!(Severity::High.is_urgent());
        assert!(!Severity::Medium.is_urgent());
    }

    #[test]
    fn surrounding_merge_keeps_import_order() {
        let mut left = Surrounding {
            imports: vec!["import os".to_string()],
            ..Default::default()
        };
        let right = Surrounding {
            imports: vec!["import os".to_string(), "import re".to_string()],
            sibling_classes: BTreeSet::from(["Other".to_string()]),
            ..Default::default()
        };
        left.merge(right);
        assert_eq!(left.imports, vec!["import os", "import re"]);
        assert!(left.sibling_classes.contains("Other"));
    }

    #[test]
    fn request_builders() {
        let request = LocateRequest::new("UserManager")
            .method("add_user")
            .in_file("app.py");
        assert_eq!(request.method_name.as_deref(), Some("add_user"));
        assert_eq!(request.file_path, Some(PathBuf::from("app.py")));
    }
}
