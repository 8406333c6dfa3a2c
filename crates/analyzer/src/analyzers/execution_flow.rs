use super::behavior::called_name;
use super::{absolute_line, syntax_of};
use crate::error::Result;
use crate::structure::walk_tree;
use crate::types::SourceContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionFlow {
    pub decision_points: Vec<DecisionPoint>,
    pub loops: Vec<FlowStep>,
    pub function_calls: Vec<String>,
    pub exception_handling: Vec<FlowStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPoint {
    pub kind: String,
    pub condition: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStep {
    pub kind: String,
    pub line: usize,
}

/// Step-by-step view of the entity in source order; lines are file lines.
///
/// Fails with the parse reason when there is no syntax tree.
pub fn trace(context: &SourceContext) -> Result<ExecutionFlow> {
    let (syntax, entity) = syntax_of(context)?;
    let mut flow = ExecutionFlow::default();

    walk_tree(entity, |node| {
        let line = absolute_line(context, node);
        match node.kind() {
            kind @ ("if_statement" | "elif_clause") => {
                let condition = node
                    .child_by_field_name("condition")
                    .and_then(|condition| syntax.node_text(condition).ok())
                    .unwrap_or("condition");
                flow.decision_points.push(DecisionPoint {
                    kind: kind.to_string(),
                    condition: condition.split_whitespace().collect::<Vec<_>>().join(" "),
                    line,
                });
            }
            "for_statement" => flow.loops.push(step("for", line)),
            "while_statement" => flow.loops.push(step("while", line)),
            "try_statement" => flow.exception_handling.push(step("try", line)),
            "except_clause" => flow.exception_handling.push(step("except", line)),
            "call" => {
                if let Some(name) = called_name(syntax, node) {
                    flow.function_calls.push(name.to_string());
                }
            }
            _ => {}
        }
    });

    Ok(flow)
}

fn step(kind: &str, line: usize) -> FlowStep {
    FlowStep {
        kind: kind.to_string(),
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::context;
    use pretty_assertions::assert_eq;

    #[test]
    fn traces_with_file_lines() {
        let code = "def load(path):\n    try:\n        data = read(path)\n    except:\n        data = None\n    if data is None:\n        return default()\n    elif len(data) > 3:\n        pass\n    while data:\n        data = data[1:]\n";
        let mut ctx = context(code, "load");
        ctx.start_line = 10;

        let flow = trace(&ctx).unwrap();

        assert_eq!(
            flow.decision_points,
            vec![
                DecisionPoint {
                    kind: "if_statement".to_string(),
                    condition: "data is None".to_string(),
                    line: 15,
                },
                DecisionPoint {
                    kind: "elif_clause".to_string(),
                    condition: "len(data) > 3".to_string(),
                    line: 17,
                },
            ]
        );
        assert_eq!(flow.loops, vec![step("while", 19)]);
        assert_eq!(flow.exception_handling, vec![step("try", 11), step("except", 13)]);
        assert_eq!(flow.function_calls, vec!["read", "default", "len"]);
    }

    #[test]
    fn missing_tree_is_an_error() {
        let err = trace(&context("def broken(:\n    pass", "broken")).unwrap_err();
        assert_eq!(err.kind(), "parse_error");
    }
}
