use super::{patterns, syntax_of};
use crate::error::Result;
use crate::structure::{definition_name, unwrap_decorated, SyntaxTarget, FUNCTION_KIND};
use crate::types::{EntityKind, SourceContext};
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

/// Docstrings longer than this are cut in the report
const EXCERPT_CHARS: usize = 200;

/// Name fragments and the purpose they suggest, first match wins
const PURPOSE_TAGS: &[(&[&str], &str)] = &[
    (&["manager", "handler", "controller"], "Control/Management"),
    (&["parser", "processor", "analyzer"], "Data Processing"),
    (&["client", "service", "api"], "External Communication"),
    (&["validator", "checker"], "Validation"),
];

const GENERAL_PURPOSE: &str = "General Purpose";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurposeAnalysis {
    pub primary_purpose: String,
    pub design_patterns: Vec<String>,
    pub naming_analysis: NamingAnalysis,
    pub docstring_analysis: DocstringAnalysis,

    /// Present for classes whose syntax node was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_surface: Option<ApiSurface>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingAnalysis {
    pub follows_convention: bool,
    pub descriptive: bool,
    pub suggests_purpose: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocstringAnalysis {
    pub exists: bool,
    pub length: usize,
    pub has_parameters: bool,
    pub has_returns: bool,
    pub has_examples: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl DocstringAnalysis {
    fn from_text(doc: Option<String>) -> Self {
        let Some(doc) = doc else {
            return Self::default();
        };
        let length = doc.chars().count();
        let excerpt = if length > EXCERPT_CHARS {
            format!("{}...", doc.chars().take(EXCERPT_CHARS).collect::<String>())
        } else {
            doc.clone()
        };
        Self {
            exists: true,
            length,
            has_parameters: doc.contains("Args:") || doc.contains("Parameters:"),
            has_returns: doc.contains("Returns:") || doc.contains("Return:"),
            has_examples: doc.contains("Example"),
            excerpt: Some(excerpt),
        }
    }
}

/// Members declared directly in a class body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSurface {
    pub public_methods: Vec<String>,
    pub private_methods: Vec<String>,
    pub properties: Vec<String>,
    pub class_variables: Vec<String>,
}

/// Purpose, naming, documentation and API of the located entity
pub fn analyze(context: &SourceContext, short_name_threshold: usize) -> Result<PurposeAnalysis> {
    let name = context.entity_name.as_str();
    let suggested = purpose_from_name(name);

    let api_surface = match syntax_of(context) {
        Ok((syntax, node)) if syntax.is_class() => Some(api_surface(syntax, node)),
        _ => None,
    };

    Ok(PurposeAnalysis {
        primary_purpose: suggested.to_string(),
        design_patterns: patterns::detect(&context.source_text),
        naming_analysis: NamingAnalysis {
            follows_convention: follows_convention(name, context.entity_kind),
            descriptive: name.chars().count() > short_name_threshold,
            suggests_purpose: suggested.to_string(),
        },
        docstring_analysis: documentation(context),
        api_surface,
    })
}

pub fn purpose_from_name(name: &str) -> &'static str {
    let lowered = name.to_lowercase();
    PURPOSE_TAGS
        .iter()
        .find(|(fragments, _)| fragments.iter().any(|f| lowered.contains(f)))
        .map_or(GENERAL_PURPOSE, |(_, purpose)| *purpose)
}

/// Classes are CapWords; functions are lower_snake_case
pub fn follows_convention(name: &str, kind: EntityKind) -> bool {
    match kind {
        EntityKind::Class => {
            name.chars().next().is_some_and(char::is_uppercase) && !name.contains('_')
        }
        EntityKind::Function => {
            let has_cased = name.chars().any(char::is_alphabetic);
            (has_cased && !name.chars().any(char::is_uppercase)) || name.contains('_')
        }
    }
}

/// Documentation of the entity: the tree docstring, else a leading string or
/// comment block. Comments never reach the tree docstring, so the text
/// fallback runs for parsed blocks too.
pub fn documentation(context: &SourceContext) -> DocstringAnalysis {
    let from_tree = context.syntax.as_ref().and_then(SyntaxTarget::docstring);
    DocstringAnalysis::from_text(from_tree.or_else(|| leading_doc_text(&context.source_text)))
}

/// First body line read as a string literal or comment block
fn leading_doc_text(source_text: &str) -> Option<String> {
    let mut body = source_text
        .lines()
        .skip(1)
        .map(str::trim)
        .skip_while(|line| line.is_empty());
    let first = body.next()?;

    if first.starts_with('#') {
        let mut lines = vec![first];
        lines.extend(body.take_while(|line| line.starts_with('#')));
        let text = lines
            .iter()
            .map(|line| line.trim_start_matches('#').trim())
            .collect::<Vec<_>>()
            .join("\n");
        return non_empty(text);
    }

    for delimiter in ["\"\"\"", "'''"] {
        if let Some(rest) = first.strip_prefix(delimiter) {
            if let Some((inline, _)) = rest.split_once(delimiter) {
                return non_empty(inline.to_string());
            }
            let mut lines = vec![rest];
            for line in body {
                if let Some((tail, _)) = line.split_once(delimiter) {
                    lines.push(tail);
                    break;
                }
                lines.push(line);
            }
            return non_empty(lines.join("\n"));
        }
    }

    for quote in ['"', '\''] {
        if let Some(rest) = first.strip_prefix(quote) {
            let inline = rest.split(quote).next().unwrap_or_default();
            return non_empty(inline.to_string());
        }
    }

    None
}

fn non_empty(text: String) -> Option<String> {
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn api_surface(syntax: &SyntaxTarget, class: Node<'_>) -> ApiSurface {
    let mut api = ApiSurface::default();
    let Some(body) = class.child_by_field_name("body") else {
        return api;
    };

    let text = syntax.text();
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        let definition = unwrap_decorated(member);
        if definition.kind() == FUNCTION_KIND {
            let Some(name) = definition_name(definition, text) else {
                continue;
            };
            if is_property(syntax, member) {
                api.properties.push(name.to_string());
            }
            if name.starts_with('_') {
                api.private_methods.push(name.to_string());
            } else {
                api.public_methods.push(name.to_string());
            }
        } else if definition.kind() == "expression_statement" {
            if let Some(name) = class_variable(syntax, definition) {
                api.class_variables.push(name);
            }
        }
    }
    api
}

fn is_property(syntax: &SyntaxTarget, member: Node<'_>) -> bool {
    if member.kind() != "decorated_definition" {
        return false;
    }
    let mut cursor = member.walk();
    let found = member
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "decorator")
        .any(|decorator| {
            syntax
                .node_text(decorator)
                .is_ok_and(|text| text.trim() == "@property")
        });
    found
}

fn class_variable(syntax: &SyntaxTarget, statement: Node<'_>) -> Option<String> {
    let assignment = statement.named_child(0)?;
    if assignment.kind() != "assignment" {
        return None;
    }
    let left = assignment.child_by_field_name("left")?;
    if left.kind() != "identifier" {
        return None;
    }
    syntax.node_text(left).ok().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::context;
    use pretty_assertions::assert_eq;

    const MANAGER: &str = r#"class SessionManager:
    """Track sessions.

    Args:
        store: backing store
    """

    timeout = 30

    def __init__(self, store):
        self.store = store

    @property
    def active(self):
        return len(self.store)

    def _evict(self):
        pass
"#;

    #[test]
    fn analyzes_documented_class() {
        let analysis = analyze(&context(MANAGER, "SessionManager"), 3).unwrap();

        assert_eq!(analysis.primary_purpose, "Control/Management");
        assert!(analysis.naming_analysis.follows_convention);
        assert!(analysis.naming_analysis.descriptive);
        assert!(analysis.docstring_analysis.exists);
        assert!(analysis.docstring_analysis.has_parameters);
        assert!(!analysis.docstring_analysis.has_returns);
        assert_eq!(
            analysis.design_patterns,
            vec!["Constructor Pattern", "Property Pattern"]
        );

        let api = analysis.api_surface.expect("class api");
        assert_eq!(api.public_methods, vec!["active"]);
        assert_eq!(api.private_methods, vec!["__init__", "_evict"]);
        assert_eq!(api.properties, vec!["active"]);
        assert_eq!(api.class_variables, vec!["timeout"]);
    }

    #[test]
    fn purpose_tags_follow_table_order() {
        assert_eq!(purpose_from_name("RequestHandler"), "Control/Management");
        assert_eq!(purpose_from_name("json_parser"), "Data Processing");
        assert_eq!(purpose_from_name("ApiClient"), "External Communication");
        assert_eq!(purpose_from_name("SchemaValidator"), "Validation");
        assert_eq!(purpose_from_name("compute"), "General Purpose");
    }

    #[test]
    fn naming_conventions() {
        assert!(follows_convention("UserManager", EntityKind::Class));
        assert!(!follows_convention("user_manager", EntityKind::Class));
        assert!(follows_convention("load_users", EntityKind::Function));
        assert!(!follows_convention("loadUsers", EntityKind::Function));
    }

    #[test]
    fn comment_counts_as_documentation_without_tree() {
        let broken = "def broken(:\n    # Explains the intent\n    pass";
        let ctx = context(broken, "broken");
        assert!(ctx.syntax.is_none());
        let doc = documentation(&ctx);
        assert!(doc.exists);
        assert_eq!(doc.excerpt.as_deref(), Some("Explains the intent"));
    }

    #[test]
    fn comment_counts_as_documentation_with_tree() {
        let ctx = context("def double(x):\n    # Doubles the input\n    return x * 2\n", "double");
        assert!(ctx.syntax.is_some());
        let doc = documentation(&ctx);
        assert!(doc.exists);
        assert_eq!(doc.excerpt.as_deref(), Some("Doubles the input"));
    }

    #[test]
    fn long_docstring_is_truncated() {
        let long = "x".repeat(250);
        let code = format!("def f():\n    \"\"\"{long}\"\"\"\n    return 1\n");
        let doc = documentation(&context(&code, "f"));
        assert_eq!(doc.length, 250);
        let excerpt = doc.excerpt.unwrap();
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), 203);
    }

    #[test]
    fn undocumented_function_has_no_api() {
        let analysis = analyze(&context("def run(x):\n    return x\n", "run"), 3).unwrap();
        assert!(!analysis.docstring_analysis.exists);
        assert!(analysis.api_surface.is_none());
        assert!(!analysis.naming_analysis.descriptive);
    }
}
