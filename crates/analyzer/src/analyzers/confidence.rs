use crate::types::SourceContext;
use serde::{Deserialize, Serialize};

pub const MAX_CONFIDENCE: u8 = 100;

const LOCATED_POINTS: u8 = 30;
const DOCUMENTED_POINTS: u8 = 20;
const PARSED_POINTS: u8 = 20;
const IMPORTS_POINTS: u8 = 15;
const PATH_POINTS: u8 = 15;

/// The five binary signals behind the confidence score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceSignals {
    pub located: bool,
    pub documented: bool,
    pub parsed: bool,
    pub has_imports: bool,
    pub has_path: bool,
}

impl ConfidenceSignals {
    pub fn from_context(context: &SourceContext, documented: bool) -> Self {
        Self {
            located: !context.source_text.is_empty(),
            documented,
            parsed: context.syntax.is_some(),
            has_imports: !context.surrounding.imports.is_empty(),
            has_path: context.has_file_path(),
        }
    }
}

/// Additive score in `0..=100`; no partial credit
pub fn score(signals: ConfidenceSignals) -> u8 {
    let weighted = [
        (signals.located, LOCATED_POINTS),
        (signals.documented, DOCUMENTED_POINTS),
        (signals.parsed, PARSED_POINTS),
        (signals.has_imports, IMPORTS_POINTS),
        (signals.has_path, PATH_POINTS),
    ];
    let total: u8 = weighted
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, points)| *points)
        .sum();
    total.min(MAX_CONFIDENCE)
}
