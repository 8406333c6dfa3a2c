use super::risk::RiskAnalysis;
use crate::error::Result;
use serde::{Deserialize, Serialize};

const TESTING_RECOMMENDATIONS: &[&str] = &[
    "Add unit tests for each public method",
    "Include edge case testing",
    "Add integration tests if the code interacts with external systems",
    "Consider property-based testing for complex logic",
];

const MISSING_DOCSTRING: &str =
    "Add comprehensive docstring with purpose, parameters, and return values";

const DOCUMENTATION_IMPROVEMENTS: &[&str] = &[
    "Add type hints for better code clarity",
    "Include usage examples in docstrings",
    "Document any side effects or dependencies",
];

const ARCHITECTURAL_IMPROVEMENTS: &[&str] = &[
    "Consider applying SOLID principles",
    "Evaluate if the class/function has a single responsibility",
    "Consider dependency injection for better testability",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvements {
    pub immediate_fixes: Vec<String>,
    pub refactoring_opportunities: Vec<String>,
    pub architectural_improvements: Vec<String>,
    pub testing_recommendations: Vec<String>,
    pub documentation_improvements: Vec<String>,
    pub prioritized_actions: Vec<PrioritizedAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritizedAction {
    pub improvement: String,
    pub priority: Priority,
    pub effort: String,
    pub impact: String,
}

impl PrioritizedAction {
    fn immediate(improvement: &str) -> Self {
        Self {
            improvement: improvement.to_string(),
            priority: Priority::High,
            effort: "Low-Medium".to_string(),
            impact: "High".to_string(),
        }
    }

    fn refactor(improvement: &str) -> Self {
        Self {
            improvement: improvement.to_string(),
            priority: Priority::Medium,
            effort: "Medium".to_string(),
            impact: "Medium".to_string(),
        }
    }
}

/// Turn findings into fixes and append the standing recommendations.
///
/// Critical and high findings become immediate fixes, the rest refactoring
/// opportunities. Order follows the findings' category order.
pub fn suggest(risks: &RiskAnalysis, documented: bool) -> Result<Improvements> {
    let mut improvements = Improvements::default();

    for finding in risks.all() {
        if finding.severity.is_urgent() {
            improvements.immediate_fixes.push(finding.suggestion.clone());
        } else {
            improvements
                .refactoring_opportunities
                .push(finding.suggestion.clone());
        }
    }

    improvements.testing_recommendations = to_owned(TESTING_RECOMMENDATIONS);
    if !documented {
        improvements
            .documentation_improvements
            .push(MISSING_DOCSTRING.to_string());
    }
    improvements
        .documentation_improvements
        .extend(to_owned(DOCUMENTATION_IMPROVEMENTS));
    improvements.architectural_improvements = to_owned(ARCHITECTURAL_IMPROVEMENTS);

    improvements.prioritized_actions = improvements
        .immediate_fixes
        .iter()
        .map(|fix| PrioritizedAction::immediate(fix))
        .chain(
            improvements
                .refactoring_opportunities
                .iter()
                .map(|refactor| PrioritizedAction::refactor(refactor)),
        )
        .collect();

    Ok(improvements)
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::risk::{assess_input, RiskInput};
    use pretty_assertions::assert_eq;

    #[test]
    fn urgent_findings_come_first() {
        let text = "def f(p):\n    open(p, 'w').write(eval(p))\n    try:\n        pass\n    except:\n        pass\n";
        let risks = assess_input(&RiskInput {
            text,
            line_count: 6,
            long_block_threshold: 50,
            syntax: None,
        });

        let improvements = suggest(&risks, true).unwrap();

        assert_eq!(
            improvements.immediate_fixes,
            vec![
                "Replace eval() with safer alternatives like ast.literal_eval()",
                "Catch specific exception types instead of using bare except"
            ]
        );
        assert!(improvements.refactoring_opportunities.is_empty());
        let priorities: Vec<_> = improvements
            .prioritized_actions
            .iter()
            .map(|action| action.priority)
            .collect();
        assert_eq!(priorities, vec![Priority::High, Priority::High]);
        assert_eq!(improvements.documentation_improvements.len(), 3);
    }

    #[test]
    fn medium_findings_become_refactors() {
        let text = "x = 1\n".repeat(60);
        let risks = assess_input(&RiskInput {
            text: &text,
            line_count: 60,
            long_block_threshold: 50,
            syntax: None,
        });
        let improvements = suggest(&risks, false).unwrap();

        assert!(improvements.immediate_fixes.is_empty());
        assert_eq!(improvements.prioritized_actions.len(), 1);
        assert_eq!(improvements.prioritized_actions[0].effort, "Medium");
        assert_eq!(improvements.documentation_improvements[0], MISSING_DOCSTRING);
        assert_eq!(improvements.testing_recommendations.len(), 4);
        assert_eq!(improvements.architectural_improvements.len(), 3);
    }

    #[test]
    fn priority_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"HIGH\"");
    }
}
