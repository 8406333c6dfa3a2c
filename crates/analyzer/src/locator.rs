use crate::block::extract_block;
use crate::error::{AnalysisError, Result};
use crate::scanner::FileScanner;
use crate::types::{EntityKind, LocateRequest};
use regex::Regex;
use std::path::{Path, PathBuf};

/// A definition found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedEntity {
    pub file_path: PathBuf,
    pub file_text: String,

    /// 1-indexed header line
    pub start_line: usize,

    pub entity_kind: EntityKind,

    /// Full block of the definition
    pub source_text: String,
}

/// Finds class/function definitions by name
pub struct EntityLocator {
    root: PathBuf,
    max_file_size_bytes: u64,
}

impl EntityLocator {
    pub fn new(root: impl Into<PathBuf>, max_file_size_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_file_size_bytes,
        }
    }

    /// Locate the entity named in `request`.
    ///
    /// With a file path only that file is searched. Otherwise the project is
    /// scanned and the first file in walker order holding a match wins.
    pub fn locate(&self, request: &LocateRequest) -> Result<LocatedEntity> {
        let pattern = definition_pattern(&request.entity_name)?;
        let not_found =
            || AnalysisError::not_found(&request.entity_name, request.method_name.as_deref());

        if let Some(file_path) = &request.file_path {
            let path = self.resolve(file_path);
            if !path.is_file() {
                log::debug!("Requested file {} does not exist", path.display());
                return Err(not_found());
            }
            let text = std::fs::read_to_string(&path).map_err(|source| {
                AnalysisError::FileReadError {
                    path: path.clone(),
                    source,
                }
            })?;
            return search_text(&pattern, &path, text).ok_or_else(not_found);
        }

        let candidates = FileScanner::new(&self.root, self.max_file_size_bytes).scan();
        let mut visited = 0usize;
        for path in candidates {
            visited += 1;
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("Skipping unreadable file {}: {e}", path.display());
                    continue;
                }
            };
            if let Some(found) = search_text(&pattern, &path, text) {
                log::info!(
                    "Located '{}' in {}:{} after {visited} file(s)",
                    request.entity_name,
                    found.file_path.display(),
                    found.start_line
                );
                return Ok(found);
            }
        }

        log::info!(
            "Entity '{}' not found in {visited} file(s) under {}",
            request.entity_name,
            self.root.display()
        );
        Err(not_found())
    }

    /// Resolve a relative request path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        let rooted = self.root.join(path);
        if rooted.exists() {
            rooted
        } else {
            path.to_path_buf()
        }
    }
}

/// Header regex: optional indentation, a defining keyword, the exact name,
/// then `(` or `:`
fn definition_pattern(entity_name: &str) -> Result<Regex> {
    let pattern = format!(
        r"(?m)^[ \t]*(class|def|async[ \t]+def)[ \t]+{}[ \t]*[(:]",
        regex::escape(entity_name)
    );
    Regex::new(&pattern)
        .map_err(|e| AnalysisError::internal(format!("invalid entity pattern: {e}")))
}

fn search_text(pattern: &Regex, path: &Path, text: String) -> Option<LocatedEntity> {
    let captures = pattern.captures(&text)?;
    let header = captures.get(0)?;
    let keyword = captures.get(1).map_or("def", |m| m.as_str());

    let start_line = text[..header.start()].matches('\n').count() + 1;
    let source_text = extract_block(&text, start_line);
    if source_text.is_empty() {
        return None;
    }

    Some(LocatedEntity {
        file_path: path.to_path_buf(),
        start_line,
        entity_kind: EntityKind::from_keyword(keyword),
        source_text,
        file_text: text,
    })
}
