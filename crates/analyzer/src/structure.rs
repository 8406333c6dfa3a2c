use crate::block::dedent;
use crate::error::{AnalysisError, Result};
use crate::language::Language;
use crate::types::Surrounding;
use std::collections::BTreeSet;
use tree_sitter::{Node, Parser, Tree};

pub(crate) const CLASS_KIND: &str = "class_definition";
pub(crate) const FUNCTION_KIND: &str = "function_definition";

/// Parsed block plus the position of the entity node inside it
#[derive(Debug, Clone)]
pub struct SyntaxTarget {
    tree: Tree,
    text: String,
    start_byte: usize,
    end_byte: usize,
    kind: String,
}

impl SyntaxTarget {
    fn new(tree: Tree, text: String, node: Node<'_>) -> Self {
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            kind: node.kind().to_string(),
            tree,
            text,
        }
    }

    /// The entity node
    pub fn node(&self) -> Option<Node<'_>> {
        let mut node = self
            .tree
            .root_node()
            .descendant_for_byte_range(self.start_byte, self.end_byte)?;
        while node.kind() != self.kind
            || node.start_byte() != self.start_byte
            || node.end_byte() != self.end_byte
        {
            node = node.parent()?;
        }
        Some(node)
    }

    /// Root of the parsed block
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// The text the tree was parsed from (dedented block)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source text of any node in this tree
    pub fn node_text(&self, node: Node<'_>) -> Result<&str> {
        node.utf8_text(self.text.as_bytes())
            .map_err(|e| AnalysisError::internal(format!("node text is not UTF-8: {e}")))
    }

    pub fn is_class(&self) -> bool {
        self.kind == CLASS_KIND
    }

    /// 1-indexed line of a node relative to the start of the block
    pub fn relative_line(node: Node<'_>) -> usize {
        node.start_position().row + 1
    }

    /// Docstring of the entity node, when its body opens with a string literal
    pub fn docstring(&self) -> Option<String> {
        let node = self.node()?;
        let body = node.child_by_field_name("body")?;
        let first = body.named_child(0)?;
        if first.kind() != "expression_statement" {
            return None;
        }
        let literal = first.named_child(0)?;
        if literal.kind() != "string" {
            return None;
        }

        let mut cursor = literal.walk();
        let content: String = literal
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "string_content")
            .filter_map(|child| self.node_text(child).ok())
            .collect();
        let content = content.trim().to_string();
        (!content.is_empty()).then_some(content)
    }
}

/// Result of structural analysis; a missing tree is not an error
#[derive(Debug, Clone, Default)]
pub struct StructureOutcome {
    pub syntax: Option<SyntaxTarget>,
    pub surrounding: Surrounding,
    pub parse_error: Option<String>,
}

/// Tree-sitter based analyzer for located blocks
pub struct StructuralAnalyzer {
    parser: Parser,
}

impl StructuralAnalyzer {
    /// Create analyzer for the Python grammar
    pub fn new() -> Result<Self> {
        let ts_language = Language::Python.tree_sitter_language()?;
        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| AnalysisError::parse(format!("Failed to set language: {e}")))?;
        Ok(Self { parser })
    }

    /// Parse a located block, select the entity node and harvest declarations.
    ///
    /// Parse failures are recorded in the outcome; downstream analyzers fall
    /// back to text heuristics.
    pub fn analyze_structure(
        &mut self,
        source_text: &str,
        entity_name: &str,
        method_name: Option<&str>,
    ) -> StructureOutcome {
        let text = dedent(source_text);
        let tree = match self.parse(&text) {
            Ok(tree) => tree,
            Err(e) => {
                log::warn!("Structural analysis of '{entity_name}' degraded: {e}");
                return StructureOutcome {
                    parse_error: Some(e.to_string()),
                    ..Default::default()
                };
            }
        };

        let root = tree.root_node();
        let target = find_entity_node(root, &text, entity_name, method_name);
        let mut exclude = vec![entity_name];
        exclude.extend(method_name);
        let surrounding = collect_surrounding(root, &text, target, &exclude);

        let syntax = target.map(|node| SyntaxTarget::new(tree.clone(), text.clone(), node));
        if syntax.is_none() {
            log::debug!("No syntax node named '{entity_name}' in parsed block");
        }

        StructureOutcome {
            syntax,
            surrounding,
            parse_error: None,
        }
    }

    /// Harvest module-level declarations from the whole file
    pub fn harvest_file(&mut self, file_text: &str, exclude: &[&str]) -> Option<Surrounding> {
        match self.parse(file_text) {
            Ok(tree) => Some(collect_surrounding(tree.root_node(), file_text, None, exclude)),
            Err(e) => {
                log::debug!("File-level harvest skipped: {e}");
                None
            }
        }
    }

    fn parse(&mut self, text: &str) -> Result<Tree> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| AnalysisError::parse("Failed to parse source code"))?;

        let root = tree.root_node();
        if root.has_error() {
            let detail = first_error(root)
                .map(|node| {
                    let pos = node.start_position();
                    format!("invalid syntax at line {}, column {}", pos.row + 1, pos.column + 1)
                })
                .unwrap_or_else(|| "invalid syntax".to_string());
            return Err(AnalysisError::parse(detail));
        }

        Ok(tree)
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

/// Name of a class/function definition node
pub(crate) fn definition_name<'a>(node: Node<'_>, text: &'a str) -> Option<&'a str> {
    node.child_by_field_name("name")
        .and_then(|name| name.utf8_text(text.as_bytes()).ok())
}

/// Unwrap `@decorator` wrappers to the definition they decorate
pub(crate) fn unwrap_decorated(node: Node<'_>) -> Node<'_> {
    if node.kind() == "decorated_definition" {
        if let Some(definition) = node.child_by_field_name("definition") {
            return definition;
        }
    }
    node
}

/// Preorder walk over every node of the tree
pub(crate) fn walk_tree<'tree>(root: Node<'tree>, mut visit: impl FnMut(Node<'tree>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// First definition named `entity_name`; narrowed to a direct method when requested
fn find_entity_node<'tree>(
    root: Node<'tree>,
    text: &str,
    entity_name: &str,
    method_name: Option<&str>,
) -> Option<Node<'tree>> {
    let mut found = None;
    walk_tree(root, |node| {
        if found.is_some() {
            return;
        }
        if matches!(node.kind(), CLASS_KIND | FUNCTION_KIND)
            && definition_name(node, text) == Some(entity_name)
        {
            found = Some(node);
        }
    });

    let entity = found?;
    let Some(method_name) = method_name else {
        return Some(entity);
    };
    if entity.kind() != CLASS_KIND {
        return Some(entity);
    }

    let method = entity.child_by_field_name("body").and_then(|body| {
        let mut cursor = body.walk();
        let children: Vec<_> = body.named_children(&mut cursor).collect();
        children
            .into_iter()
            .map(unwrap_decorated)
            .find(|child| {
                child.kind() == FUNCTION_KIND && definition_name(*child, text) == Some(method_name)
            })
    });

    if method.is_none() {
        log::debug!("Method '{method_name}' not found in '{entity_name}', using class context");
    }
    method.or(Some(entity))
}

/// Collapse an import statement onto one line
fn normalize_import(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_surrounding(
    root: Node<'_>,
    text: &str,
    target: Option<Node<'_>>,
    exclude: &[&str],
) -> Surrounding {
    let mut surrounding = Surrounding::default();
    let target_id = target.map(|node| node.id());
    let is_excluded = |name: &str| exclude.contains(&name);

    walk_tree(root, |node| match node.kind() {
        "import_statement" | "import_from_statement" => {
            if let Ok(raw) = node.utf8_text(text.as_bytes()) {
                let import = normalize_import(raw);
                if !surrounding.imports.contains(&import) {
                    surrounding.imports.push(import);
                }
            }
        }
        CLASS_KIND | FUNCTION_KIND if Some(node.id()) != target_id => {
            if let Some(name) = definition_name(node, text).filter(|name| !is_excluded(name)) {
                let bucket = if node.kind() == CLASS_KIND {
                    &mut surrounding.sibling_classes
                } else {
                    &mut surrounding.sibling_functions
                };
                bucket.insert(name.to_string());
            }
        }
        _ => {}
    });

    surrounding.module_constants = module_assignments(root, text);
    surrounding
}

/// Names assigned at module level
fn module_assignments(root: Node<'_>, text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut cursor = root.walk();
    for statement in root.named_children(&mut cursor) {
        if statement.kind() != "expression_statement" {
            continue;
        }
        let Some(assignment) = statement.named_child(0) else {
            continue;
        };
        if assignment.kind() != "assignment" {
            continue;
        }
        if let Some(left) = assignment.child_by_field_name("left") {
            if left.kind() == "identifier" {
                if let Ok(name) = left.utf8_text(text.as_bytes()) {
                    names.insert(name.to_string());
                }
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MODULE: &str = r#"import os
from typing import List, Optional

MAX_USERS = 10

class UserManager:
    """Manage users."""

    limit = 5

    def __init__(self):
        self.users = []

    @property
    def count(self):
        return len(self.users)

def helper(x):
    return x
"#;

    fn analyzer() -> StructuralAnalyzer {
        StructuralAnalyzer::new().unwrap()
    }

    #[test]
    fn selects_class_and_harvests_declarations() {
        let outcome = analyzer().analyze_structure(MODULE, "UserManager", None);
        let syntax = outcome.syntax.expect("class node");
        assert!(syntax.is_class());
        assert_eq!(syntax.docstring().as_deref(), Some("Manage users."));

        let surrounding = outcome.surrounding;
        assert_eq!(
            surrounding.imports,
            vec!["import os", "from typing import List, Optional"]
        );
        assert!(surrounding.sibling_functions.contains("helper"));
        assert!(surrounding.sibling_functions.contains("__init__"));
        assert!(!surrounding.sibling_classes.contains("UserManager"));
        assert_eq!(
            surrounding.module_constants.into_iter().collect::<Vec<_>>(),
            vec!["MAX_USERS"]
        );
    }

    #[test]
    fn narrows_to_decorated_method() {
        let outcome = analyzer().analyze_structure(MODULE, "UserManager", Some("count"));
        let syntax = outcome.syntax.expect("method node");
        assert!(!syntax.is_class());
        let node = syntax.node().unwrap();
        assert_eq!(definition_name(node, syntax.text()), Some("count"));
    }

    #[test]
    fn missing_method_degrades_to_class() {
        let outcome = analyzer().analyze_structure(MODULE, "UserManager", Some("absent"));
        assert!(outcome.syntax.expect("class node").is_class());
    }

    #[test]
    fn indented_block_is_parsed_after_dedent() {
        let block = "    def add(self, x):\n        return x + 1";
        let outcome = analyzer().analyze_structure(block, "add", None);
        assert!(outcome.parse_error.is_none());
        assert!(outcome.syntax.is_some());
    }

    #[test]
    fn parse_failure_is_recorded_not_raised() {
        let outcome = analyzer().analyze_structure("def broken(:\n    pass", "broken", None);
        assert!(outcome.syntax.is_none());
        assert!(outcome.parse_error.unwrap().contains("invalid syntax"));
    }

    #[test]
    fn harvest_file_excludes_target_names() {
        let surrounding = analyzer()
            .harvest_file(MODULE, &["helper"])
            .expect("file parses");
        assert!(!surrounding.sibling_functions.contains("helper"));
        assert!(surrounding.sibling_classes.contains("UserManager"));
    }
}
