//! Analyzers for an arbitrary line window.
//!
//! Rules that only make sense for some project kinds live in the [`KindRules`]
//! table, looked up by [`DetectedKind`]. Supporting a new kind means adding a
//! row, not another branch.

use crate::error::Result;
use crate::line_context::{DetectedKind, LineContext};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

static DECLARED_VAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:val|var)\s+(\w+)").expect("Invalid regex pattern"));

static ASSIGNED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z_]\w*)\s*=(?:[^=]|$)").expect("Invalid regex pattern")
});

static DEFINITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:fun|def)\s+(\w+)").expect("Invalid regex pattern"));

static CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bclass\s+(\w+)").expect("Invalid regex pattern"));

static ACCESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(public|private|protected|internal)\b").expect("Invalid regex pattern")
});

static BRANCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:if|when|elif|else)\b").expect("Invalid regex pattern"));

static FOR_LOOP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bfor\b").expect("Invalid regex pattern"));

static DIVISION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w)\]]\s*/\s*[\w(]").expect("Invalid regex pattern"));

/// Rule set for one project kind
pub struct KindRules {
    pub kind: DetectedKind,

    /// Marker substrings in the window and what they indicate
    pub dependencies: &'static [(&'static [&'static str], &'static str)],
    pub lifecycle: &'static [(&'static str, &'static str)],

    /// Whether the language has nullable types worth checking
    pub null_safety: bool,

    pub robustness: &'static [&'static str],
    pub best_practices: &'static [&'static str],
}

const KIND_RULES: &[KindRules] = &[
    KindRules {
        kind: DetectedKind::SpringBoot,
        dependencies: &[
            (&["@Autowired"], "Spring dependency injection detected"),
            (&["@Bean"], "Spring bean configuration"),
            (&["@Service", "@Component"], "Spring stereotype annotation"),
        ],
        lifecycle: &[
            ("@PostConstruct", "Spring bean initialization phase"),
            ("@PreDestroy", "Spring bean destruction phase"),
        ],
        null_safety: false,
        robustness: &[
            "Add @Validated annotation for input validation",
            "Consider circuit breaker pattern for external calls",
        ],
        best_practices: &[
            "Use constructor injection over field injection",
            "Make beans immutable when possible",
            "Use @ConfigurationProperties for configuration",
        ],
    },
    KindRules {
        kind: DetectedKind::Kotlin,
        dependencies: &[],
        lifecycle: &[],
        null_safety: true,
        robustness: &[],
        best_practices: &[
            "Use data classes for value objects",
            "Prefer val over var when possible",
            "Use sealed classes for restricted hierarchies",
        ],
    },
];

const DEFAULT_RULES: KindRules = KindRules {
    kind: DetectedKind::Unknown,
    dependencies: &[],
    lifecycle: &[],
    null_safety: false,
    robustness: &[],
    best_practices: &[],
};

const STANDARD_LIFECYCLE: &str = "Standard object lifecycle";

const GENERIC_ROBUSTNESS: &[&str] = &[
    "Add comprehensive error handling",
    "Include logging for debugging",
];

const CODE_QUALITY: &[&str] = &[
    "Add meaningful variable names",
    "Include documentation/comments",
    "Consider extracting complex logic to methods",
    "Add unit tests for this code",
];

const TEST_SCENARIOS: &[&str] = &[
    "Test with valid input values",
    "Test with null/empty values",
    "Test with boundary conditions",
    "Test error handling paths",
];

const MONITORING_POINTS: &[&str] = &[
    "Add metrics for execution time",
    "Monitor error rates",
    "Track method call frequency",
    "Alert on unexpected null values",
];

/// Rule set for `kind`; kinds without special rules share an empty set
pub fn rules_for(kind: DetectedKind) -> &'static KindRules {
    KIND_RULES
        .iter()
        .find(|rules| rules.kind == kind)
        .unwrap_or(&DEFAULT_RULES)
}

/// Text views of a window shared by all line analyzers
pub struct LineInput<'a> {
    /// Trimmed target lines
    pub target: String,

    /// Trimmed window lines
    pub window: String,

    /// Trimmed lines from the window start through the target
    pub leading: String,

    pub rules: &'static KindRules,
    pub question: &'a str,
    pub symbol: Option<&'a str>,
}

impl<'a> LineInput<'a> {
    pub fn new(context: &LineContext, question: &'a str, symbol: Option<&'a str>) -> Self {
        let leading = context
            .lines_before
            .iter()
            .chain(&context.target_lines)
            .map(|line| line.text.trim())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            target: context.target_code(),
            window: context.window_code(),
            leading,
            rules: rules_for(context.detected_kind),
            question,
            symbol: symbol.filter(|symbol| !symbol.is_empty()),
        }
    }

    fn question_mentions(&self, word: &str) -> bool {
        self.question.to_lowercase().contains(word)
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Labels whose predicate holds, in table order
fn matching(rules: &[(Probe, &str)], text: &str) -> Vec<String> {
    rules
        .iter()
        .filter(|(holds, _)| holds(text))
        .map(|(_, label)| label.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Engineer analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineerAnalysis {
    pub code_purpose: String,
    pub variable_analysis: VariableAnalysis,
    pub method_context: MethodContext,
    pub dependencies: Vec<String>,
    pub patterns_detected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableAnalysis {
    pub declared_variables: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_symbol_analysis: Option<SymbolAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub present_in_code: bool,
    pub usage_count: usize,
}

/// Nearest enclosing declarations at or above the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodContext {
    pub enclosing_method: Option<String>,
    pub enclosing_class: Option<String>,
    pub access_level: Option<String>,
}

type Probe = fn(&str) -> bool;

/// Ordered first-match table; the last row always holds
const CODE_PURPOSES: &[(Probe, &str)] = &[
    (
        |code| code.contains("fun ") || code.contains("def "),
        "Function/method definition",
    ),
    (
        |code| code.contains('=') && (code.contains("val ") || code.contains("var ")),
        "Variable declaration/assignment",
    ),
    (|code| code.contains('@'), "Annotation or decorator"),
    (|code| code.contains("class "), "Class definition"),
    (|code| code.contains("import "), "Import statement"),
    (
        |code| code.contains("if ") || code.contains("when "),
        "Conditional logic",
    ),
    (
        |code| code.contains("for ") || code.contains("while "),
        "Loop construct",
    ),
    (|_| true, "Statement or expression"),
];

const CODE_PATTERNS: &[(Probe, &str)] = &[
    (|code| code.contains("?."), "Safe call operator (null-safe)"),
    (
        |code| code.contains("!!"),
        "Not-null assertion operator (potentially unsafe)",
    ),
    (
        |code| code.contains("try {") || code.contains("try:"),
        "Exception handling",
    ),
    (|code| code.contains("lazy"), "Lazy initialization"),
];

pub fn code_purpose(target: &str) -> &'static str {
    CODE_PURPOSES
        .iter()
        .find(|(holds, _)| holds(target))
        .map_or("Statement or expression", |(_, label)| *label)
}

pub fn declared_variables(target: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let found = DECLARED_VAL
        .captures_iter(target)
        .chain(ASSIGNED.captures_iter(target))
        .filter_map(|captures| captures.get(1));
    for name in found {
        if !names.iter().any(|known| known == name.as_str()) {
            names.push(name.as_str().to_string());
        }
    }
    names
}

fn last_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .last()
        .map(|m| m.as_str().to_string())
}

pub fn method_context(leading: &str) -> MethodContext {
    MethodContext {
        enclosing_method: last_capture(&DEFINITION, leading),
        enclosing_class: last_capture(&CLASS, leading),
        access_level: last_capture(&ACCESS, leading),
    }
}

pub fn engineer_analysis(input: &LineInput<'_>) -> Result<EngineerAnalysis> {
    let target_symbol_analysis = input.symbol.map(|symbol| SymbolAnalysis {
        symbol: symbol.to_string(),
        present_in_code: input.target.contains(symbol),
        usage_count: input.target.matches(symbol).count(),
    });

    let dependencies = input
        .rules
        .dependencies
        .iter()
        .filter(|(markers, _)| markers.iter().any(|marker| input.window.contains(marker)))
        .map(|(_, label)| label.to_string())
        .collect();

    Ok(EngineerAnalysis {
        code_purpose: code_purpose(&input.target).to_string(),
        variable_analysis: VariableAnalysis {
            declared_variables: declared_variables(&input.target),
            target_symbol_analysis,
        },
        method_context: method_context(&input.leading),
        dependencies,
        patterns_detected: matching(CODE_PATTERNS, &input.target),
    })
}

// ---------------------------------------------------------------------------
// Runtime simulation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeSimulation {
    pub execution_flow: FlowNotes,
    pub variable_states: VariableStates,
    pub lifecycle_analysis: String,
    pub error_scenarios: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowNotes {
    pub execution_order: String,
    pub potential_branches: String,
    pub side_effects: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VariableStates {
    Tracked {
        initial_state: String,
        after_execution: String,
        nullability: String,
    },
    Untracked {
        note: String,
    },
}

const ERROR_SCENARIOS: &[(Probe, &str)] = &[
    (
        |code| code.contains("!!"),
        "KotlinNullPointerException if value is null",
    ),
    (|code| code.contains('['), "IndexOutOfBoundsException possible"),
    (
        |code| DIVISION.is_match(code),
        "ArithmeticException (division by zero)",
    ),
];

pub fn runtime_simulation(input: &LineInput<'_>) -> Result<RuntimeSimulation> {
    let target = input.target.as_str();
    let assigns = target.contains('=');

    let variable_states = match input.symbol {
        Some(symbol) => VariableStates::Tracked {
            initial_state: "Unknown".to_string(),
            after_execution: if assigns && target.contains(symbol) {
                "Potentially modified"
            } else {
                "Unchanged"
            }
            .to_string(),
            nullability: "Check null safety patterns".to_string(),
        },
        None => VariableStates::Untracked {
            note: "No target symbol specified".to_string(),
        },
    };

    let lifecycle_analysis = input
        .rules
        .lifecycle
        .iter()
        .find(|(marker, _)| input.window.contains(marker))
        .map_or(STANDARD_LIFECYCLE, |(_, phase)| *phase)
        .to_string();

    Ok(RuntimeSimulation {
        execution_flow: FlowNotes {
            execution_order: "Sequential unless control flow changes".to_string(),
            potential_branches: if BRANCH.is_match(target) {
                "Conditional execution detected"
            } else {
                "Linear execution"
            }
            .to_string(),
            side_effects: if assigns {
                "Possible state changes"
            } else {
                "Read-only operations"
            }
            .to_string(),
        },
        variable_states,
        lifecycle_analysis,
        error_scenarios: matching(ERROR_SCENARIOS, target),
    })
}

// ---------------------------------------------------------------------------
// Risk assessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub null_safety: NullSafety,
    pub concurrency_risks: Vec<String>,
    pub performance_concerns: Vec<String>,
    pub security_implications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullSafety {
    pub null_safety_level: String,
    pub risky_operations: Vec<String>,
    pub safe_operations: Vec<String>,
}

impl Default for NullSafety {
    fn default() -> Self {
        Self {
            null_safety_level: "Unknown".to_string(),
            risky_operations: Vec::new(),
            safe_operations: Vec::new(),
        }
    }
}

const PERFORMANCE_CONCERNS: &[(Probe, &str)] = &[
    (
        |code| FOR_LOOP.find_iter(code).count() >= 2,
        "Nested loops detected - O(n²) complexity",
    ),
    (
        |code| code.contains("lazy"),
        "Lazy initialization - first access cost",
    ),
];

const SECURITY_IMPLICATIONS: &[(Probe, &str)] = &[
    (
        |code| code.to_lowercase().contains("password"),
        "Password handling detected - ensure proper security",
    ),
    (
        |code| code.to_lowercase().contains("sql"),
        "SQL operations - check for injection vulnerabilities",
    ),
];

pub fn null_safety(target: &str, rules: &KindRules) -> NullSafety {
    let mut analysis = NullSafety::default();
    if !rules.null_safety {
        return analysis;
    }
    if target.contains("!!") {
        analysis
            .risky_operations
            .push("Not-null assertion (!!) - can throw NPE".to_string());
    }
    if target.contains("?.") {
        analysis
            .safe_operations
            .push("Safe call operator (?.) - null-safe".to_string());
    }
    if target.contains('?') && target.contains("fun") {
        analysis.null_safety_level = "Nullable types properly declared".to_string();
    }
    analysis
}

pub fn risk_assessment(input: &LineInput<'_>) -> Result<RiskAssessment> {
    let target = input.target.as_str();

    let mut concurrency_risks = Vec::new();
    if target.contains("var ") && input.window.contains('@') {
        concurrency_risks.push("Mutable variable in potentially shared context".to_string());
    }
    if target.contains("synchronized") || target.contains("lock") {
        concurrency_risks.push("Explicit synchronization detected".to_string());
    }

    Ok(RiskAssessment {
        null_safety: null_safety(target, input.rules),
        concurrency_risks,
        performance_concerns: matching(PERFORMANCE_CONCERNS, target),
        security_implications: matching(SECURITY_IMPLICATIONS, target),
    })
}

// ---------------------------------------------------------------------------
// Improvements and debugging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineImprovements {
    pub immediate_fixes: Vec<String>,
    pub robustness_improvements: Vec<String>,
    pub code_quality: Vec<String>,
    pub best_practices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebuggingInsights {
    pub common_issues: Vec<String>,
    pub debugging_approach: Vec<String>,
    pub test_scenarios: Vec<String>,
    pub monitoring_points: Vec<String>,
}

pub fn improvements(input: &LineInput<'_>) -> Result<LineImprovements> {
    let mut immediate_fixes = Vec::new();
    if input.question_mentions("null") && input.target.contains("!!") {
        immediate_fixes.push("Replace !! with safe call ?. or add null check".to_string());
    }
    if input.question_mentions("robust") {
        immediate_fixes.push("Add error handling with try-catch".to_string());
        immediate_fixes.push("Add input validation".to_string());
    }

    let mut robustness_improvements = to_owned(input.rules.robustness);
    robustness_improvements.extend(to_owned(GENERIC_ROBUSTNESS));

    Ok(LineImprovements {
        immediate_fixes,
        robustness_improvements,
        code_quality: to_owned(CODE_QUALITY),
        best_practices: to_owned(input.rules.best_practices),
    })
}

pub fn debugging_insights(input: &LineInput<'_>) -> Result<DebuggingInsights> {
    let mut common_issues = Vec::new();
    if input.target.contains("!!") {
        common_issues.push("Not-null assertion can cause runtime crashes".to_string());
    }
    if input.target.contains("var ") {
        common_issues.push("Mutable variables can lead to unexpected state changes".to_string());
    }

    let mut debugging_approach = Vec::new();
    if input.question_mentions("null") {
        debugging_approach.push("Add null checks and logging before the problematic line".to_string());
        debugging_approach.push("Use debugger to inspect variable states".to_string());
    }
    debugging_approach.extend(to_owned(&[
        "Add strategic log statements",
        "Write unit tests to isolate the issue",
        "Use IDE debugger with breakpoints",
    ]));

    Ok(DebuggingInsights {
        common_issues,
        debugging_approach,
        test_scenarios: to_owned(TEST_SCENARIOS),
        monitoring_points: to_owned(MONITORING_POINTS),
    })
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// One-line outcome of a line-range review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    AttentionNeeded { null_risks: usize },
    RiskyCode,
    Pass,
}

impl Verdict {
    /// Decision table: null-safety risks, then `!!` in the target, then pass
    pub fn decide(null_risks: usize, target: &str) -> Self {
        if null_risks > 0 {
            Verdict::AttentionNeeded { null_risks }
        } else if target.contains("!!") {
            Verdict::RiskyCode
        } else {
            Verdict::Pass
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::AttentionNeeded { null_risks } => write!(
                f,
                "ATTENTION NEEDED: {null_risks} null safety risks detected. Address before production."
            ),
            Verdict::RiskyCode => f.write_str(
                "RISKY CODE: Not-null assertions present. Consider safer alternatives.",
            ),
            Verdict::Pass => f.write_str(
                "CODE REVIEW: Generally safe. Follow suggested improvements for robustness.",
            ),
        }
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_context::{build_line_context, LineSpec};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    const SERVICE: &str = r#"package app

import org.springframework.stereotype.Service

@Service
class UserService(private val repo: UserRepository) {
    @PostConstruct
    fun init() {}

    fun find(id: String?): User {
        val user = repo.find(id)!!
        return user
    }
}
"#;

    const PLAIN_KOTLIN: &str = "class Cache {\n    private var hits = 0\n    fun get(key: String?): String? {\n        val value = store[key]!!\n        return value?.trim()\n    }\n}\n";

    fn context_for(name: &str, body: &str, spec: &str) -> (tempfile::TempDir, LineContext) {
        let temp = tempdir().unwrap();
        let path = temp.path().join(name);
        fs::write(&path, body).unwrap();
        let context = build_line_context(&path, &LineSpec::parse(spec).unwrap(), 10).unwrap();
        (temp, context)
    }

    #[test]
    fn spring_rules_apply_to_spring_files() {
        let (_temp, context) = context_for("UserService.kt", SERVICE, "11");
        assert_eq!(context.detected_kind, DetectedKind::SpringBoot);
        let input = LineInput::new(&context, "Is this robust?", Some("user"));

        let engineer = engineer_analysis(&input).unwrap();
        assert_eq!(engineer.code_purpose, "Variable declaration/assignment");
        assert_eq!(engineer.variable_analysis.declared_variables, vec!["user"]);
        assert_eq!(engineer.dependencies, vec!["Spring stereotype annotation"]);
        assert_eq!(engineer.method_context.enclosing_method.as_deref(), Some("find"));
        assert_eq!(
            engineer.method_context.enclosing_class.as_deref(),
            Some("UserService")
        );
        assert_eq!(
            engineer.patterns_detected,
            vec!["Not-null assertion operator (potentially unsafe)"]
        );

        let runtime = runtime_simulation(&input).unwrap();
        assert_eq!(runtime.lifecycle_analysis, "Spring bean initialization phase");

        let risks = risk_assessment(&input).unwrap();
        assert!(risks.null_safety.risky_operations.is_empty());

        let fixes = improvements(&input).unwrap();
        assert_eq!(
            fixes.immediate_fixes,
            vec!["Add error handling with try-catch", "Add input validation"]
        );
        assert_eq!(fixes.robustness_improvements.len(), 4);
        assert_eq!(fixes.best_practices[0], "Use constructor injection over field injection");

        let verdict = Verdict::decide(risks.null_safety.risky_operations.len(), &input.target);
        assert_eq!(verdict, Verdict::RiskyCode);
    }

    #[test]
    fn kotlin_null_safety_drives_verdict() {
        let (_temp, context) = context_for("Cache.kt", PLAIN_KOTLIN, "3-5");
        assert_eq!(context.detected_kind, DetectedKind::Kotlin);
        let input = LineInput::new(&context, "Can this be null?", None);

        let risks = risk_assessment(&input).unwrap();
        assert_eq!(
            risks.null_safety.risky_operations,
            vec!["Not-null assertion (!!) - can throw NPE"]
        );
        assert_eq!(
            risks.null_safety.null_safety_level,
            "Nullable types properly declared"
        );

        let verdict = Verdict::decide(risks.null_safety.risky_operations.len(), &input.target);
        assert_eq!(
            verdict.to_string(),
            "ATTENTION NEEDED: 1 null safety risks detected. Address before production."
        );

        let fixes = improvements(&input).unwrap();
        assert_eq!(
            fixes.immediate_fixes,
            vec!["Replace !! with safe call ?. or add null check"]
        );
        let debugging = debugging_insights(&input).unwrap();
        assert_eq!(debugging.debugging_approach.len(), 5);

        let runtime = runtime_simulation(&input).unwrap();
        assert_eq!(
            runtime.variable_states,
            VariableStates::Untracked {
                note: "No target symbol specified".to_string()
            }
        );
        assert_eq!(
            runtime.error_scenarios,
            vec![
                "KotlinNullPointerException if value is null",
                "IndexOutOfBoundsException possible"
            ]
        );
    }

    #[test]
    fn unknown_kind_uses_default_rules() {
        let (_temp, context) = context_for("script.rb", "total = a / b\nputs total\n", "1");
        let input = LineInput::new(&context, "What happens here?", Some("total"));

        let risks = risk_assessment(&input).unwrap();
        assert_eq!(risks.null_safety, NullSafety::default());

        let runtime = runtime_simulation(&input).unwrap();
        assert_eq!(runtime.lifecycle_analysis, STANDARD_LIFECYCLE);
        assert_eq!(
            runtime.error_scenarios,
            vec!["ArithmeticException (division by zero)"]
        );
        assert!(improvements(&input).unwrap().best_practices.is_empty());
        assert_eq!(
            Verdict::decide(0, &input.target),
            Verdict::Pass
        );
    }

    #[test]
    fn code_purpose_is_first_match() {
        assert_eq!(code_purpose("def run(self):"), "Function/method definition");
        assert_eq!(code_purpose("@Bean"), "Annotation or decorator");
        assert_eq!(code_purpose("import os"), "Import statement");
        assert_eq!(code_purpose("when (x) {"), "Conditional logic");
        assert_eq!(code_purpose("while True:"), "Loop construct");
        assert_eq!(code_purpose("x += 1"), "Statement or expression");
    }

    #[test]
    fn comparisons_are_not_declarations() {
        assert_eq!(declared_variables("if a == b and c <= d:"), Vec::<String>::new());
        assert_eq!(declared_variables("var count = 0\nlimit = 5"), vec!["count", "limit"]);
    }

    #[test]
    fn verdict_serializes_as_text() {
        let json = serde_json::to_string(&Verdict::Pass).unwrap();
        assert!(json.starts_with("\"CODE REVIEW"));
    }
}
