use crate::cache::AnalysisCache;
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::line_context::{build_line_context, LineSpec};
use crate::locator::EntityLocator;
use crate::report::{Aggregator, EntityReport, LineReport};
use crate::structure::StructuralAnalyzer;
use crate::types::{LineRequest, LocateRequest, SourceContext};
use std::path::{Path, PathBuf};

/// Entry point: one instance per project root
pub struct CodeInsight {
    config: AnalyzerConfig,
    locator: EntityLocator,
    cache: AnalysisCache,
}

impl CodeInsight {
    /// Validate the configuration and check that the grammar loads
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        StructuralAnalyzer::new()?;

        Ok(Self {
            locator: EntityLocator::new(&config.project_root, config.max_file_size_bytes),
            cache: AnalysisCache::new(config.cache_capacity),
            config,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Locate a class or function by name and analyze it
    pub fn analyze_entity(&self, request: &LocateRequest) -> Result<EntityReport> {
        if let Some(report) = self.cache.get(request) {
            return Ok(report);
        }

        log::info!(
            "Analyzing '{}'{}",
            request.entity_name,
            request
                .method_name
                .as_deref()
                .map(|method| format!(" (method {method})"))
                .unwrap_or_default()
        );

        let context = self.source_context(request)?;
        let report = Aggregator::new().entity_report(&context, &self.config);

        self.cache.insert(request.clone(), &report);
        Ok(report)
    }

    /// Build the full source context for a request
    pub fn source_context(&self, request: &LocateRequest) -> Result<SourceContext> {
        let located = self.locator.locate(request)?;
        let method = request.method_name.as_deref();

        let mut analyzer = StructuralAnalyzer::new()?;
        let outcome =
            analyzer.analyze_structure(&located.source_text, &request.entity_name, method);

        let mut surrounding = outcome.surrounding;
        let mut exclude = vec![request.entity_name.as_str()];
        exclude.extend(method);
        if let Some(file_level) = analyzer.harvest_file(&located.file_text, &exclude) {
            surrounding.merge(file_level);
        }

        Ok(SourceContext {
            entity_name: request.entity_name.clone(),
            method_name: request.method_name.clone(),
            source_text: located.source_text,
            file_path: located.file_path,
            start_line: located.start_line,
            entity_kind: located.entity_kind,
            syntax: outcome.syntax,
            surrounding,
            parse_error: outcome.parse_error,
        })
    }

    /// Analyze a line or line range of any text file
    pub fn analyze_line_range(&self, request: &LineRequest) -> Result<LineReport> {
        let path = self.resolve_line_path(&request.file_path)?;
        let spec = LineSpec::parse(&request.line_spec)?;
        let window = AnalyzerConfig::clamp_window(
            request.context_window.unwrap_or(self.config.context_window),
        );

        log::info!(
            "Line analysis for {}:{} (window {window})",
            path.display(),
            request.line_spec
        );

        let context = build_line_context(&path, &spec, window)?;
        Ok(Aggregator::new().line_report(
            &context,
            &request.question,
            request.target_symbol.as_deref(),
            self.config.preview_lines,
        ))
    }

    /// Absolute paths are used as is; relative ones are tried against the
    /// project root, then the working directory
    fn resolve_line_path(&self, file_path: &str) -> Result<PathBuf> {
        let requested = Path::new(file_path);
        let attempted: Vec<PathBuf> = if requested.is_absolute() {
            vec![requested.to_path_buf()]
        } else {
            vec![self.config.project_root.join(requested), requested.to_path_buf()]
        };

        match attempted.iter().find(|candidate| candidate.is_file()) {
            Some(found) => Ok(found.clone()),
            None => Err(AnalysisError::file_not_found(file_path, attempted)),
        }
    }
}
