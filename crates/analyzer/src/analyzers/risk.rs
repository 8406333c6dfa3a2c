//! Risk detection over raw block text.
//!
//! Each rule is a named predicate with a fixed category and severity. All
//! rules run on every block; a rule fires at most once per block.

use super::has_error_handling;
use crate::error::Result;
use crate::structure::{walk_tree, SyntaxTarget};
use crate::types::{Category, Finding, Severity, SourceContext};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

static DYNAMIC_EVAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\w.])(eval|exec)\s*\(").expect("Invalid regex pattern")
});

static OPEN_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\w.])(?:io\.)?open\s*\(").expect("Invalid regex pattern")
});

static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)^[rRbBuU]{0,2}(?:"([^"]*)"|'([^']*)')$"#).expect("Invalid regex pattern")
});

static LOOP_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:for|while)\b").expect("Invalid regex pattern"));

static MEMBERSHIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bin\b").expect("Invalid regex pattern"));

static BARE_EXCEPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*except\s*:").expect("Invalid regex pattern"));

static NETWORK_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:requests\.|urllib|httpx\.|aiohttp|socket\.)").expect("Invalid regex pattern")
});

/// Loop keywords needed before a block counts as nested-loop heavy
const NESTED_LOOP_KEYWORDS: usize = 3;

/// What a rule sees
pub struct RiskInput<'a> {
    pub text: &'a str,
    pub line_count: usize,
    pub long_block_threshold: usize,
    /// Parsed block, when the structural analyzer produced one
    pub syntax: Option<&'a SyntaxTarget>,
}

struct RiskRule {
    category: Category,
    check: fn(&RiskInput<'_>) -> Option<Finding>,
}

const RULES: &[RiskRule] = &[
    RiskRule {
        category: Category::Security,
        check: dynamic_evaluation,
    },
    RiskRule {
        category: Category::Security,
        check: unguarded_file_write,
    },
    RiskRule {
        category: Category::Performance,
        check: nested_loops,
    },
    RiskRule {
        category: Category::Correctness,
        check: bare_except,
    },
    RiskRule {
        category: Category::Maintainability,
        check: long_block,
    },
    RiskRule {
        category: Category::Reliability,
        check: unguarded_network_call,
    },
];

/// Findings grouped by category and bucketed by severity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub security_issues: Vec<Finding>,
    pub performance_issues: Vec<Finding>,
    pub correctness_issues: Vec<Finding>,
    pub maintainability_issues: Vec<Finding>,
    pub reliability_issues: Vec<Finding>,
    pub severity_levels: SeverityLevels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityLevels {
    pub critical: Vec<Finding>,
    pub high: Vec<Finding>,
    pub medium: Vec<Finding>,
    pub low: Vec<Finding>,
}

impl SeverityLevels {
    pub fn bucket(&self, severity: Severity) -> &[Finding] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
        }
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut Vec<Finding> {
        match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
        }
    }
}

impl RiskAnalysis {
    pub fn issues(&self, category: Category) -> &[Finding] {
        match category {
            Category::Security => &self.security_issues,
            Category::Performance => &self.performance_issues,
            Category::Correctness => &self.correctness_issues,
            Category::Maintainability => &self.maintainability_issues,
            Category::Reliability => &self.reliability_issues,
        }
    }

    fn issues_mut(&mut self, category: Category) -> &mut Vec<Finding> {
        match category {
            Category::Security => &mut self.security_issues,
            Category::Performance => &mut self.performance_issues,
            Category::Correctness => &mut self.correctness_issues,
            Category::Maintainability => &mut self.maintainability_issues,
            Category::Reliability => &mut self.reliability_issues,
        }
    }

    /// All findings in category order
    pub fn all(&self) -> impl Iterator<Item = &Finding> {
        [
            Category::Security,
            Category::Performance,
            Category::Correctness,
            Category::Maintainability,
            Category::Reliability,
        ]
        .into_iter()
        .flat_map(move |category| self.issues(category).iter())
    }

    pub fn record(&mut self, finding: Finding) {
        self.severity_levels
            .bucket_mut(finding.severity)
            .push(finding.clone());
        self.issues_mut(finding.category).push(finding);
    }
}

/// Run every rule over the located block
pub fn assess(context: &SourceContext, long_block_threshold: usize) -> Result<RiskAnalysis> {
    let input = RiskInput {
        text: &context.source_text,
        line_count: context.line_count(),
        long_block_threshold,
        syntax: context.syntax.as_ref(),
    };
    Ok(assess_input(&input))
}

pub fn assess_input(input: &RiskInput<'_>) -> RiskAnalysis {
    let mut analysis = RiskAnalysis::default();
    for rule in RULES {
        if let Some(finding) = (rule.check)(input) {
            debug_assert_eq!(finding.category, rule.category);
            log::debug!("Risk rule fired: {} ({})", finding.title, finding.severity);
            analysis.record(finding);
        }
    }
    analysis
}

/// `eval(`/`exec(` calls; `ast.literal_eval` and methods named eval are not flagged
pub fn dynamic_evaluation(input: &RiskInput<'_>) -> Option<Finding> {
    let call = DYNAMIC_EVAL.captures(input.text)?.get(1)?.as_str();
    Some(Finding::new(
        Category::Security,
        Severity::Critical,
        "Code Injection",
        format!("Use of {call}() can execute arbitrary code"),
        format!("Replace {call}() with safer alternatives like ast.literal_eval()"),
    ))
}

/// Write, append or exclusive-mode `open` with no `try:` around it
pub fn unguarded_file_write(input: &RiskInput<'_>) -> Option<Finding> {
    let modes = match input.syntax {
        Some(syntax) => open_modes_in_tree(syntax),
        None => open_modes_in_text(input.text),
    };
    let writes = modes.iter().any(|mode| is_write_mode(mode));
    if !writes || has_error_handling(input.text) {
        return None;
    }
    Some(Finding::new(
        Category::Security,
        Severity::Medium,
        "File System Access",
        "Writing to files without validation",
        "Validate file paths and implement proper access controls",
    ))
}

fn is_write_mode(mode: &str) -> bool {
    mode.contains(['w', 'a', 'x', '+'])
}

/// Literal modes of `open(...)` calls: the `mode=` keyword, else the second positional argument
fn open_modes_in_tree(syntax: &SyntaxTarget) -> Vec<String> {
    let mut modes = Vec::new();
    walk_tree(syntax.root(), |node| {
        if node.kind() != "call" {
            return;
        }
        let is_open = node
            .child_by_field_name("function")
            .and_then(|function| syntax.node_text(function).ok())
            .is_some_and(|name| matches!(name, "open" | "io.open"));
        if !is_open {
            return;
        }
        let Some(arguments) = node.child_by_field_name("arguments") else {
            return;
        };
        if let Some(mode) = mode_argument(syntax, arguments) {
            modes.push(mode);
        }
    });
    modes
}

fn mode_argument(syntax: &SyntaxTarget, arguments: Node<'_>) -> Option<String> {
    let mut cursor = arguments.walk();
    let mut positional = 0;
    for child in arguments.named_children(&mut cursor) {
        match child.kind() {
            "keyword_argument" => {
                let name = child
                    .child_by_field_name("name")
                    .and_then(|name| syntax.node_text(name).ok());
                if name == Some("mode") {
                    return literal_of(syntax, child.child_by_field_name("value")?);
                }
            }
            "comment" => {}
            _ => {
                positional += 1;
                if positional == 2 {
                    return literal_of(syntax, child);
                }
            }
        }
    }
    None
}

fn literal_of(syntax: &SyntaxTarget, value: Node<'_>) -> Option<String> {
    if value.kind() != "string" {
        return None;
    }
    string_literal(syntax.node_text(value).ok()?)
}

/// Same lookup over raw text, for blocks that did not parse
fn open_modes_in_text(text: &str) -> Vec<String> {
    OPEN_CALL
        .find_iter(text)
        .filter_map(|call| {
            let arguments = split_arguments(&text[call.end()..]);
            let keyword = arguments
                .iter()
                .filter(|argument| is_keyword_argument(argument))
                .find_map(|argument| {
                    let (name, value) = argument.split_once('=')?;
                    (name.trim() == "mode").then_some(value)
                });
            let value = keyword.or_else(|| {
                arguments
                    .iter()
                    .filter(|argument| !is_keyword_argument(argument))
                    .nth(1)
                    .copied()
            })?;
            string_literal(value)
        })
        .collect()
}

fn is_keyword_argument(argument: &str) -> bool {
    argument.split_once('=').is_some_and(|(name, value)| {
        let name = name.trim();
        !value.starts_with('=')
            && !name.is_empty()
            && name.chars().all(|c| c.is_alphanumeric() || c == '_')
    })
}

/// Top-level comma-separated arguments up to the closing parenthesis
fn split_arguments(after_paren: &str) -> Vec<&str> {
    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (index, c) in after_paren.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == open {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' if depth > 0 => depth -= 1,
            ')' => {
                arguments.push(&after_paren[start..index]);
                break;
            }
            ',' if depth == 0 => {
                arguments.push(&after_paren[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    arguments
        .into_iter()
        .map(str::trim)
        .filter(|argument| !argument.is_empty())
        .collect()
}

fn string_literal(value: &str) -> Option<String> {
    let captures = STRING_LITERAL.captures(value.trim())?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|content| content.as_str().to_string())
}

pub fn nested_loops(input: &RiskInput<'_>) -> Option<Finding> {
    let loops = LOOP_KEYWORD.find_iter(input.text).count();
    if loops < NESTED_LOOP_KEYWORDS || !MEMBERSHIP.is_match(input.text) {
        return None;
    }
    Some(Finding::new(
        Category::Performance,
        Severity::Medium,
        "Nested Loops",
        "Multiple nested loops may cause performance issues",
        "Consider optimizing with list comprehensions or vectorized operations",
    ))
}

pub fn bare_except(input: &RiskInput<'_>) -> Option<Finding> {
    if !BARE_EXCEPT.is_match(input.text) {
        return None;
    }
    Some(Finding::new(
        Category::Correctness,
        Severity::High,
        "Broad Exception Handling",
        "Catching all exceptions can hide bugs",
        "Catch specific exception types instead of using bare except",
    ))
}

pub fn long_block(input: &RiskInput<'_>) -> Option<Finding> {
    if input.line_count <= input.long_block_threshold {
        return None;
    }
    Some(Finding::new(
        Category::Maintainability,
        Severity::Medium,
        "Long Function/Class",
        format!(
            "Entity has {} lines, consider breaking it down",
            input.line_count
        ),
        "Split into smaller, more focused functions or classes",
    ))
}

pub fn unguarded_network_call(input: &RiskInput<'_>) -> Option<Finding> {
    if !NETWORK_CALL.is_match(input.text) || has_error_handling(input.text) {
        return None;
    }
    Some(Finding::new(
        Category::Reliability,
        Severity::High,
        "Missing Error Handling",
        "Network operations without error handling",
        "Add try-except blocks around network operations",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::context;
    use pretty_assertions::assert_eq;

    fn input(text: &str) -> RiskInput<'_> {
        RiskInput {
            text,
            line_count: text.lines().count(),
            long_block_threshold: 50,
            syntax: None,
        }
    }

    fn writes_file(source: &str, entity: &str) -> (bool, bool) {
        let ctx = context(source, entity);
        let parsed = RiskInput {
            text: &ctx.source_text,
            line_count: ctx.line_count(),
            long_block_threshold: 50,
            syntax: ctx.syntax.as_ref(),
        };
        assert!(parsed.syntax.is_some());
        (
            unguarded_file_write(&parsed).is_some(),
            unguarded_file_write(&input(source)).is_some(),
        )
    }

    #[test]
    fn dynamic_evaluation_is_one_critical_finding() {
        let text = "def run(expr):\n    a = eval(expr)\n    b = eval(expr + '1')\n    exec(a)\n";
        let analysis = assess_input(&input(text));

        assert_eq!(analysis.security_issues.len(), 1);
        assert_eq!(analysis.severity_levels.critical.len(), 1);
        let finding = &analysis.severity_levels.critical[0];
        assert_eq!(finding.category, Category::Security);
        assert_eq!(finding.title, "Code Injection");
    }

    #[test]
    fn literal_eval_and_methods_are_not_flagged() {
        assert!(dynamic_evaluation(&input("ast.literal_eval(s)")).is_none());
        assert!(dynamic_evaluation(&input("model.eval()")).is_none());
        assert!(dynamic_evaluation(&input("evaluate(x)")).is_none());
    }

    #[test]
    fn write_open_requires_missing_try() {
        let unguarded = "with open(path, 'w') as fh:\n    fh.write(data)";
        assert!(unguarded_file_write(&input(unguarded)).is_some());

        let guarded = "try:\n    with open(path, \"a\") as fh:\n        pass\nexcept OSError:\n    pass";
        assert!(unguarded_file_write(&input(guarded)).is_none());

        let reading = "with open(path, 'r') as fh:\n    return fh.read()";
        assert!(unguarded_file_write(&input(reading)).is_none());
    }

    #[test]
    fn multiline_write_open_is_flagged() {
        let source = "def dump(path, data):\n    with open(\n        path,\n        \"w\",\n    ) as fh:\n        fh.write(data)\n";
        assert_eq!(writes_file(source, "dump"), (true, true));
    }

    #[test]
    fn short_file_name_is_not_a_mode() {
        let source = "def load():\n    with open(\"a\", \"r\") as fh:\n        return fh.read()\n";
        assert_eq!(writes_file(source, "load"), (false, false));

        let default_mode = "def load():\n    return open('w').read()\n";
        assert_eq!(writes_file(default_mode, "load"), (false, false));
    }

    #[test]
    fn mode_keyword_and_nested_paths() {
        let keyword = "def save(p):\n    open(p, encoding=\"utf-8\", mode=\"a\").write('x')\n";
        assert_eq!(writes_file(keyword, "save"), (true, true));

        let nested = "def save(a, b):\n    open(os.path.join(a, b), 'rb+').close()\n";
        assert_eq!(writes_file(nested, "save"), (true, true));

        let encoded = "def load(p):\n    open(p, encoding='w').read()\n";
        assert_eq!(writes_file(encoded, "load"), (false, false));
    }

    #[test]
    fn nested_loops_need_three_keywords() {
        let two = "for a in x:\n    for b in a:\n        pass";
        assert!(nested_loops(&input(two)).is_none());
        let three = "for a in x:\n    for b in a:\n        while b:\n            b -= 1";
        assert_eq!(
            nested_loops(&input(three)).map(|f| f.severity),
            Some(Severity::Medium)
        );
    }

    #[test]
    fn bare_except_is_high() {
        let text = "try:\n    go()\nexcept:\n    pass";
        let analysis = assess_input(&input(text));
        assert_eq!(analysis.correctness_issues.len(), 1);
        assert_eq!(analysis.correctness_issues[0].severity, Severity::High);
        assert!(bare_except(&input("except ValueError:\n    pass")).is_none());
    }

    #[test]
    fn long_block_uses_threshold() {
        let text = "x = 1\n".repeat(51);
        let finding = long_block(&input(&text)).unwrap();
        assert_eq!(finding.description, "Entity has 51 lines, consider breaking it down");
        assert!(long_block(&input(&"x = 1\n".repeat(50))).is_none());
    }

    #[test]
    fn network_without_try_is_reliability_risk() {
        let text = "def fetch(url):\n    return requests.get(url).json()";
        let analysis = assess_input(&input(text));
        assert_eq!(analysis.reliability_issues.len(), 1);
        assert_eq!(analysis.severity_levels.high.len(), 1);

        let guarded = "def fetch(url):\n    try:\n        return requests.get(url)\n    except requests.RequestException:\n        return None";
        assert!(unguarded_network_call(&input(guarded)).is_none());
    }

    #[test]
    fn clean_block_has_no_findings() {
        let analysis = assess_input(&input("def add(a, b):\n    return a + b"));
        assert_eq!(analysis.all().count(), 0);
        assert_eq!(analysis, RiskAnalysis::default());
    }
}
