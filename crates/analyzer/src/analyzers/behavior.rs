use super::syntax_of;
use crate::error::Result;
use crate::structure::{walk_tree, SyntaxTarget};
use crate::types::SourceContext;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

const CONDITIONAL_KINDS: &[&str] = &["if_statement", "elif_clause"];
const LOOP_KINDS: &[&str] = &["for_statement", "while_statement"];

/// Canned edge-case prompts shown for every entity
const EDGE_CASES: &[&str] = &[
    "None/null inputs",
    "Empty collections",
    "Very large inputs",
    "Concurrent access",
    "Network failures (if applicable)",
];

const SCENARIOS: &[(&str, &str)] = &[
    ("Happy path", "Normal execution with valid inputs"),
    ("Edge cases", "Boundary conditions and limit values"),
    ("Error cases", "Invalid inputs and error conditions"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorSimulation {
    pub state_transitions: Vec<StateTransition>,
    pub input_scenarios: Vec<Scenario>,
    pub edge_cases: Vec<String>,
    pub error_conditions: Vec<ErrorCondition>,
    pub side_effects: Vec<String>,

    /// Why the tree-derived lists are empty, when they are
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_only_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateTransition {
    /// `complexity` counts the conditionals inside this one, itself included
    Conditional { complexity: usize },
    Loop { nested: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCondition {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

/// Simulate control flow, failure modes and side effects of the entity.
///
/// Without a syntax tree only the canned scenarios are returned.
pub fn simulate(context: &SourceContext) -> Result<BehaviorSimulation> {
    let mut simulation = BehaviorSimulation {
        state_transitions: Vec::new(),
        input_scenarios: SCENARIOS
            .iter()
            .map(|(name, description)| Scenario {
                name: name.to_string(),
                description: description.to_string(),
            })
            .collect(),
        edge_cases: EDGE_CASES.iter().map(|case| case.to_string()).collect(),
        error_conditions: Vec::new(),
        side_effects: Vec::new(),
        text_only_reason: None,
    };

    match syntax_of(context) {
        Ok((syntax, node)) => {
            simulation.state_transitions = state_transitions(node);
            simulation.error_conditions = error_conditions(syntax, node);
            simulation.side_effects = side_effects(syntax, node);
        }
        Err(e) => {
            log::debug!("Behavior of '{}' simulated from text only: {e}", context.entity_name);
            simulation.text_only_reason = Some(e.to_string());
        }
    }

    Ok(simulation)
}

fn count_kinds(node: Node<'_>, kinds: &[&str]) -> usize {
    let mut count = 0;
    walk_tree(node, |inner| {
        if kinds.contains(&inner.kind()) {
            count += 1;
        }
    });
    count
}

pub fn state_transitions(entity: Node<'_>) -> Vec<StateTransition> {
    let mut transitions = Vec::new();
    walk_tree(entity, |node| {
        let kind = node.kind();
        if CONDITIONAL_KINDS.contains(&kind) {
            transitions.push(StateTransition::Conditional {
                complexity: count_kinds(node, CONDITIONAL_KINDS),
            });
        } else if LOOP_KINDS.contains(&kind) {
            transitions.push(StateTransition::Loop {
                nested: count_kinds(node, LOOP_KINDS) > 1,
            });
        }
    });
    transitions
}

/// Name of the function called by a `call` node, when it is a plain identifier
pub(crate) fn called_name<'a>(syntax: &'a SyntaxTarget, call: Node<'_>) -> Option<&'a str> {
    if call.kind() != "call" {
        return None;
    }
    let function = call.child_by_field_name("function")?;
    if function.kind() != "identifier" {
        return None;
    }
    syntax.node_text(function).ok()
}

fn push_once(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

pub fn error_conditions(syntax: &SyntaxTarget, entity: Node<'_>) -> Vec<ErrorCondition> {
    let mut kinds: Vec<String> = Vec::new();
    walk_tree(entity, |node| {
        let kind = match node.kind() {
            "subscript" => Some("IndexError"),
            "attribute" => Some("AttributeError"),
            "call" => called_name(syntax, node)
                .filter(|name| matches!(*name, "int" | "float"))
                .map(|_| "ValueError"),
            _ => None,
        };
        if let Some(kind) = kind {
            push_once(&mut kinds, kind);
        }
    });

    kinds
        .into_iter()
        .map(|kind| {
            let description = match kind.as_str() {
                "IndexError" => "Potential index out of bounds",
                "AttributeError" => "Potential missing attribute",
                _ => "Type conversion might fail",
            };
            ErrorCondition {
                kind,
                description: description.to_string(),
            }
        })
        .collect()
}

pub fn side_effects(syntax: &SyntaxTarget, entity: Node<'_>) -> Vec<String> {
    let mut effects = Vec::new();
    walk_tree(entity, |node| match node.kind() {
        "call" => match called_name(syntax, node) {
            Some("print") => push_once(&mut effects, "Console output"),
            Some("open" | "write") => push_once(&mut effects, "File system modification"),
            _ => {}
        },
        "assignment" => {
            let assigns_attribute = node
                .child_by_field_name("left")
                .is_some_and(|left| left.kind() == "attribute");
            if assigns_attribute {
                push_once(&mut effects, "Object state modification");
            }
        }
        _ => {}
    });
    effects
}
