//! # Code Insight Analyzer
//!
//! Heuristic, explainable understanding of Python definitions and of
//! arbitrary line ranges in any text file.
//!
//! ## Philosophy
//!
//! Every finding is the result of a named textual or structural rule, so the
//! same input always yields the same report. A stage that cannot run is
//! reported as skipped; it never takes the rest of the report down with it.
//!
//! ## Architecture
//!
//! ```text
//! LocateRequest                      LineRequest
//!     │                                  │
//!     ├──> Entity Locator (scan/regex)   ├──> Line Spec parsing
//!     │                                  │
//!     ├──> Block Extractor (indent)      ├──> Line Context (window, kind)
//!     │                                  │
//!     ├──> Structural Analyzer           └──> Line Analyzers
//!     │    ├─> Tree-sitter parse              ├─> Engineer / runtime notes
//!     │    └─> Surrounding declarations       └─> Risks / verdict
//!     │
//!     └──> Entity Analyzers
//!          ├─> Purpose / behavior / flow
//!          ├─> Risks / improvements
//!          └─> Questions / confidence
//!                      │
//!                      └──> Report Aggregator → EntityReport | LineReport
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use code_insight_analyzer::{AnalyzerConfig, CodeInsight, LocateRequest};
//!
//! let engine = CodeInsight::new(AnalyzerConfig::for_root("."))?;
//! let report = engine.analyze_entity(&LocateRequest::new("UserService").method("save"))?;
//! println!("confidence {}", report.confidence_score);
//! # Ok::<(), code_insight_analyzer::AnalysisError>(())
//! ```

pub mod analyzers;
mod block;
mod cache;
mod config;
mod engine;
mod error;
mod language;
mod line_context;
mod locator;
mod report;
mod scanner;
mod structure;
mod types;

pub use block::{dedent, extract_block};
pub use cache::{AnalysisCache, Fingerprint};
pub use config::{
    AnalyzerConfig, DEFAULT_CONTEXT_WINDOW, MAX_CONTEXT_WINDOW, MIN_CONTEXT_WINDOW,
};
pub use engine::CodeInsight;
pub use error::{AnalysisError, ErrorReport, Result};
pub use line_context::{build_line_context, DetectedKind, LineContext, LineSpec, NumberedLine};
pub use locator::{EntityLocator, LocatedEntity};
pub use report::{
    Aggregator, Assessment, CodeContext, Diagnostic, EntityLocation, EntityReport, LineLocation,
    LineReport, Stage, TeamImpact, TechLeadSummary,
};
pub use structure::{StructuralAnalyzer, StructureOutcome, SyntaxTarget};
pub use types::{
    Category, EntityKind, Finding, LineRequest, LocateRequest, Severity, SourceContext,
    Surrounding,
};
