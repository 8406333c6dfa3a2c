//! Report assembly.
//!
//! Analyzer calls go through [`Aggregator::stage`], which turns a failure
//! into [`Stage::Skipped`] and records a diagnostic instead of failing the
//! whole report.

use crate::analyzers::behavior::{self, BehaviorSimulation};
use crate::analyzers::confidence::{self, ConfidenceSignals};
use crate::analyzers::execution_flow::{self, ExecutionFlow};
use crate::analyzers::improvements::{self, Improvements};
use crate::analyzers::line::{
    self, DebuggingInsights, EngineerAnalysis, LineImprovements, LineInput, RiskAssessment,
    RuntimeSimulation, Verdict,
};
use crate::analyzers::purpose::{self, PurposeAnalysis};
use crate::analyzers::questions;
use crate::analyzers::risk::{self, RiskAnalysis};
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::line_context::{DetectedKind, LineContext, NumberedLine};
use crate::types::{Category, EntityKind, Severity, SourceContext, Surrounding};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Outcome of one analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Stage<T> {
    Ok(T),
    Skipped {
        #[serde(rename = "skipped")]
        reason: String,
    },
}

impl<T> Stage<T> {
    pub fn ok(&self) -> Option<&T> {
        match self {
            Stage::Ok(section) => Some(section),
            Stage::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Stage::Skipped { .. })
    }
}

/// Why a stage produced no section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub stage: String,
    pub kind: String,
    pub reason: String,
}

/// Collects stage outcomes and builds the final reports
#[derive(Debug, Default)]
pub struct Aggregator {
    diagnostics: Vec<Diagnostic>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one analyzer, isolating its failure
    pub fn stage<T>(&mut self, name: &str, run: impl FnOnce() -> Result<T>) -> Stage<T> {
        match run() {
            Ok(section) => Stage::Ok(section),
            Err(e) => {
                if matches!(e, AnalysisError::ParseError(_)) {
                    log::debug!("Stage '{name}' skipped: {e}");
                } else {
                    log::warn!("Stage '{name}' failed: {e}");
                }
                self.diagnostics.push(Diagnostic {
                    stage: name.to_string(),
                    kind: e.kind().to_string(),
                    reason: e.to_string(),
                });
                Stage::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Run the entity analyzer suite and merge the sections
    pub fn entity_report(mut self, context: &SourceContext, config: &AnalyzerConfig) -> EntityReport {
        if let Some(parse_error) = &context.parse_error {
            self.diagnostics.push(Diagnostic {
                stage: "structure".to_string(),
                kind: "parse_error".to_string(),
                reason: parse_error.clone(),
            });
        }

        let documented = purpose::documentation(context).exists;

        let purpose_analysis = self.stage("purpose_analysis", || {
            purpose::analyze(context, config.short_name_threshold)
        });
        let behavior_simulation = self.stage("behavior_simulation", || behavior::simulate(context));
        let risk_analysis = self.stage("risk_analysis", || {
            risk::assess(context, config.long_block_threshold)
        });
        let no_risks = RiskAnalysis::default();
        let risks = risk_analysis.ok().unwrap_or(&no_risks);
        let improvements = self.stage("improvements", || improvements::suggest(risks, documented));
        let execution_flow = self.stage("execution_flow", || execution_flow::trace(context));

        let clarification_questions =
            questions::generate(context, documented, config.short_name_threshold);
        let confidence_score =
            confidence::score(ConfidenceSignals::from_context(context, documented));
        let summary = TechLeadSummary::new(risks, improvements.ok(), confidence_score);

        EntityReport {
            entity_name: context.entity_name.clone(),
            method_name: context.method_name.clone(),
            location: EntityLocation {
                file_path: context.file_path.clone(),
                start_line: context.start_line,
                end_line: context.end_line(),
                entity_kind: context.entity_kind,
            },
            surrounding: context.surrounding.clone(),
            purpose_analysis,
            behavior_simulation,
            risk_analysis,
            improvements,
            execution_flow,
            clarification_questions,
            confidence_score,
            summary,
            diagnostics: self.diagnostics,
        }
    }

    /// Run the line analyzer suite over a window
    pub fn line_report(
        mut self,
        context: &LineContext,
        question: &str,
        target_symbol: Option<&str>,
        preview_lines: usize,
    ) -> LineReport {
        let input = LineInput::new(context, question, target_symbol);

        let engineer_analysis = self.stage("engineer_analysis", || line::engineer_analysis(&input));
        let runtime_simulation =
            self.stage("runtime_simulation", || line::runtime_simulation(&input));
        let risk_assessment = self.stage("risk_assessment", || line::risk_assessment(&input));
        let improvements = self.stage("improvements", || line::improvements(&input));
        let debugging_insights =
            self.stage("debugging_insights", || line::debugging_insights(&input));

        let null_risks = risk_assessment
            .ok()
            .map_or(0, |risks| risks.null_safety.risky_operations.len());
        let verdict = Verdict::decide(null_risks, &input.target);

        let before_skip = context.lines_before.len().saturating_sub(preview_lines);

        LineReport {
            location: LineLocation {
                file_path: context.file_path.clone(),
                target_lines: format!("{}-{}", context.start_line, context.end_line),
                total_file_lines: context.total_file_lines,
                context_range: format!("{}-{}", context.context_start, context.context_end),
                detected_kind: context.detected_kind,
                target_symbol: input.symbol.map(str::to_string),
            },
            question: question.to_string(),
            code_context: CodeContext {
                lines_before: context.lines_before[before_skip..].to_vec(),
                target_lines: context.target_lines.clone(),
                lines_after: context
                    .lines_after
                    .iter()
                    .take(preview_lines)
                    .cloned()
                    .collect(),
            },
            engineer_analysis,
            runtime_simulation,
            risk_assessment,
            improvements,
            debugging_insights,
            verdict,
            diagnostics: self.diagnostics,
        }
    }
}

/// Where the analyzed entity lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityLocation {
    pub file_path: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub entity_kind: EntityKind,
}

/// Report for a named entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityReport {
    pub entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
    pub location: EntityLocation,
    pub surrounding: Surrounding,
    pub purpose_analysis: Stage<PurposeAnalysis>,
    pub behavior_simulation: Stage<BehaviorSimulation>,
    pub risk_analysis: Stage<RiskAnalysis>,
    pub improvements: Stage<Improvements>,
    pub execution_flow: Stage<ExecutionFlow>,
    pub clarification_questions: Vec<String>,

    /// In `0..=100`; how much signal the analysis had, not code quality
    pub confidence_score: u8,

    pub summary: TechLeadSummary,
    pub diagnostics: Vec<Diagnostic>,
}

/// Headline judgement of an entity report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    Critical { count: usize },
    HighRisk { count: usize },
    NeedsInvestigation,
    Good,
}

/// Confidence below this asks for more context
const INVESTIGATION_CONFIDENCE: u8 = 70;

/// More high findings than this is a high-risk entity
const HIGH_RISK_FINDINGS: usize = 2;

impl Assessment {
    pub fn decide(critical: usize, high: usize, confidence_score: u8) -> Self {
        if critical > 0 {
            Assessment::Critical { count: critical }
        } else if high > HIGH_RISK_FINDINGS {
            Assessment::HighRisk { count: high }
        } else if confidence_score < INVESTIGATION_CONFIDENCE {
            Assessment::NeedsInvestigation
        } else {
            Assessment::Good
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assessment::Critical { count } => write!(
                f,
                "CRITICAL: {count} critical issues found. Immediate attention required before production."
            ),
            Assessment::HighRisk { count } => write!(
                f,
                "HIGH RISK: {count} high-priority issues. Recommend addressing before next release."
            ),
            Assessment::NeedsInvestigation => f.write_str(
                "NEEDS INVESTIGATION: Analysis confidence is low. More context or documentation needed.",
            ),
            Assessment::Good => f.write_str(
                "GOOD: Code appears well-structured. Focus on the suggested improvements for optimization.",
            ),
        }
    }
}

/// Effect of maintainability findings on the team
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamImpact {
    High,
    Medium,
    Low,
}

impl TeamImpact {
    pub fn from_maintainability(findings: usize) -> Self {
        match findings {
            0..=1 => TeamImpact::Low,
            2..=3 => TeamImpact::Medium,
            _ => TeamImpact::High,
        }
    }
}

impl fmt::Display for TeamImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TeamImpact::High => "HIGH: Multiple maintainability issues may slow down team development",
            TeamImpact::Medium => {
                "MEDIUM: Some maintainability concerns that could affect team velocity"
            }
            TeamImpact::Low => "LOW: Code is generally maintainable and shouldn't block team progress",
        })
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

const DEFAULT_NEXT_STEPS: &[&str] = &[
    "Review the code structure and naming conventions",
    "Add comprehensive unit tests",
    "Improve documentation and type hints",
];

/// Next steps shown when nothing was prioritized
const NEXT_STEP_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechLeadSummary {
    #[serde(serialize_with = "serialize_display")]
    pub overall_assessment: Assessment,
    pub recommended_next_steps: Vec<String>,
    #[serde(serialize_with = "serialize_display")]
    pub team_impact: TeamImpact,
}

impl TechLeadSummary {
    pub fn new(risks: &RiskAnalysis, improvements: Option<&Improvements>, confidence_score: u8) -> Self {
        let levels = &risks.severity_levels;
        let overall_assessment = Assessment::decide(
            levels.bucket(Severity::Critical).len(),
            levels.bucket(Severity::High).len(),
            confidence_score,
        );

        let prioritized: Vec<String> = improvements
            .map(|improvements| {
                improvements
                    .prioritized_actions
                    .iter()
                    .take(NEXT_STEP_COUNT)
                    .map(|action| action.improvement.clone())
                    .collect()
            })
            .unwrap_or_default();
        let recommended_next_steps = if prioritized.is_empty() {
            DEFAULT_NEXT_STEPS.iter().map(|step| step.to_string()).collect()
        } else {
            prioritized
        };

        Self {
            overall_assessment,
            recommended_next_steps,
            team_impact: TeamImpact::from_maintainability(
                risks.issues(Category::Maintainability).len(),
            ),
        }
    }
}

/// Where the analyzed window lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineLocation {
    pub file_path: PathBuf,
    pub target_lines: String,
    pub total_file_lines: usize,
    pub context_range: String,
    pub detected_kind: DetectedKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_symbol: Option<String>,
}

/// Lines shown around the target, trimmed to the preview size
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeContext {
    pub lines_before: Vec<NumberedLine>,
    pub target_lines: Vec<NumberedLine>,
    pub lines_after: Vec<NumberedLine>,
}

/// Report for a file line or line range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineReport {
    pub location: LineLocation,
    pub question: String,
    pub code_context: CodeContext,
    pub engineer_analysis: Stage<EngineerAnalysis>,
    pub runtime_simulation: Stage<RuntimeSimulation>,
    pub risk_assessment: Stage<RiskAssessment>,
    pub improvements: Stage<LineImprovements>,
    pub debugging_insights: Stage<DebuggingInsights>,
    pub verdict: Verdict,
    pub diagnostics: Vec<Diagnostic>,
}
