//! Heuristic analyzers.
//!
//! Every analyzer is a function of the extracted context and returns its own
//! section. None of them depends on another having succeeded; the aggregator
//! wraps each call in a [`Stage`](crate::report::Stage) so a failing analyzer
//! only removes its own section from the report.
//!
//! The rules are text heuristics, kept behind small named predicates so each
//! one can be tested on its own.

pub mod behavior;
pub mod confidence;
pub mod execution_flow;
pub mod improvements;
pub mod line;
pub mod patterns;
pub mod purpose;
pub mod questions;
pub mod risk;

use crate::error::{AnalysisError, Result};
use crate::structure::SyntaxTarget;
use crate::types::SourceContext;
use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

static TRY_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btry\s*:").expect("Invalid regex pattern"));

/// True when the text contains a `try:` block
pub fn has_error_handling(text: &str) -> bool {
    TRY_BLOCK.is_match(text)
}

/// Syntax target and entity node, or the reason they are unavailable
pub(crate) fn syntax_of(context: &SourceContext) -> Result<(&SyntaxTarget, Node<'_>)> {
    let syntax = context.syntax.as_ref().ok_or_else(|| {
        AnalysisError::parse(
            context
                .parse_error
                .clone()
                .unwrap_or_else(|| format!("no syntax node for '{}'", context.entity_name)),
        )
    })?;
    let node = syntax
        .node()
        .ok_or_else(|| AnalysisError::internal("entity node vanished from its tree"))?;
    Ok((syntax, node))
}

/// 1-indexed file line of a node inside the located block
pub(crate) fn absolute_line(context: &SourceContext, node: Node<'_>) -> usize {
    context.start_line + SyntaxTarget::relative_line(node) - 1
}
