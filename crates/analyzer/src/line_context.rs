use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Lines scanned for framework markers
const KIND_PROBE_LINES: usize = 50;

/// A single line or an inclusive range, 1-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpec {
    pub start: usize,
    pub end: usize,
}

impl LineSpec {
    /// Parse "42" or "42-45"
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = || AnalysisError::invalid_line_spec(spec);
        let trimmed = spec.trim();

        let (start, end) = match trimmed.split_once('-') {
            Some((start, end)) => (
                start.trim().parse::<usize>().map_err(|_| invalid())?,
                end.trim().parse::<usize>().map_err(|_| invalid())?,
            ),
            None => {
                let line = trimmed.parse::<usize>().map_err(|_| invalid())?;
                (line, line)
            }
        };

        if end < start {
            return Err(invalid());
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for LineSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// One source line with its 1-indexed number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    pub number: usize,
    pub text: String,
}

impl fmt::Display for NumberedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}: {}", self.number, self.text)
    }
}

impl Serialize for NumberedLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Coarse project/language kind of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectedKind {
    #[serde(rename = "spring_boot")]
    SpringBoot,
    #[serde(rename = "kotlin")]
    Kotlin,
    #[serde(rename = "java")]
    Java,
    #[serde(rename = "fastapi")]
    FastApi,
    #[serde(rename = "django")]
    Django,
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "react")]
    React,
    #[serde(rename = "javascript")]
    JavaScript,
    #[serde(rename = "react_typescript")]
    ReactTypeScript,
    #[serde(rename = "typescript")]
    TypeScript,
    #[serde(rename = "unknown")]
    Unknown,
}

/// Extension family with the framework markers that refine it
struct KindProbe {
    extensions: &'static [&'static str],
    markers: &'static [(&'static [&'static str], DetectedKind)],
    fallback: DetectedKind,
}

const SPRING_MARKERS: &[&str] = &["import org.springframework", "@SpringBootApplication"];

const KIND_PROBES: &[KindProbe] = &[
    KindProbe {
        extensions: &["kt", "kts"],
        markers: &[(&["import org.springframework"], DetectedKind::SpringBoot)],
        fallback: DetectedKind::Kotlin,
    },
    KindProbe {
        extensions: &["java"],
        markers: &[(SPRING_MARKERS, DetectedKind::SpringBoot)],
        fallback: DetectedKind::Java,
    },
    KindProbe {
        extensions: &["py", "pyw"],
        markers: &[
            (&["from fastapi", "import fastapi"], DetectedKind::FastApi),
            (&["from django", "import django"], DetectedKind::Django),
        ],
        fallback: DetectedKind::Python,
    },
    KindProbe {
        extensions: &["js", "jsx"],
        markers: &[(&["import React", "from \"react\""], DetectedKind::React)],
        fallback: DetectedKind::JavaScript,
    },
    KindProbe {
        extensions: &["ts", "tsx"],
        markers: &[(&["import React"], DetectedKind::ReactTypeScript)],
        fallback: DetectedKind::TypeScript,
    },
];

impl DetectedKind {
    /// Detect from extension plus framework markers in the leading lines
    pub fn detect<S: AsRef<str>>(path: &Path, lines: &[S]) -> Self {
        let Some(ext) = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
        else {
            return DetectedKind::Unknown;
        };

        let Some(probe) = KIND_PROBES
            .iter()
            .find(|probe| probe.extensions.contains(&ext.as_str()))
        else {
            return DetectedKind::Unknown;
        };

        let head: Vec<&str> = lines
            .iter()
            .take(KIND_PROBE_LINES)
            .map(AsRef::as_ref)
            .collect();
        let head = head.join("\n");

        probe
            .markers
            .iter()
            .find(|(needles, _)| needles.iter().any(|needle| head.contains(needle)))
            .map_or(probe.fallback, |(_, kind)| *kind)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DetectedKind::SpringBoot => "spring_boot",
            DetectedKind::Kotlin => "kotlin",
            DetectedKind::Java => "java",
            DetectedKind::FastApi => "fastapi",
            DetectedKind::Django => "django",
            DetectedKind::Python => "python",
            DetectedKind::React => "react",
            DetectedKind::JavaScript => "javascript",
            DetectedKind::ReactTypeScript => "react_typescript",
            DetectedKind::TypeScript => "typescript",
            DetectedKind::Unknown => "unknown",
        }
    }
}

/// Window of lines around a line-range target
#[derive(Debug, Clone, Serialize)]
pub struct LineContext {
    pub file_path: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub context_start: usize,
    pub context_end: usize,
    pub total_file_lines: usize,
    pub detected_kind: DetectedKind,
    pub lines_before: Vec<NumberedLine>,
    pub target_lines: Vec<NumberedLine>,
    pub lines_after: Vec<NumberedLine>,
}

impl LineContext {
    /// Code of the target lines, one trimmed line each
    pub fn target_code(&self) -> String {
        join_code(&self.target_lines)
    }

    /// Code of the whole window
    pub fn window_code(&self) -> String {
        let all: Vec<NumberedLine> = self
            .lines_before
            .iter()
            .chain(&self.target_lines)
            .chain(&self.lines_after)
            .cloned()
            .collect();
        join_code(&all)
    }
}

fn join_code(lines: &[NumberedLine]) -> String {
    lines
        .iter()
        .map(|line| line.text.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the context window for `spec` in the file at `path`.
///
/// Works on any text file; no grammar is required.
pub fn build_line_context(path: &Path, spec: &LineSpec, window: usize) -> Result<LineContext> {
    if !path.is_file() {
        return Err(AnalysisError::file_not_found(
            path.display().to_string(),
            vec![path.to_path_buf()],
        ));
    }

    let text = std::fs::read_to_string(path).map_err(|source| AnalysisError::FileReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let lines: Vec<&str> = text.lines().collect();
    let total = lines.len();

    if spec.start < 1 || spec.start > total {
        return Err(AnalysisError::line_out_of_range(spec.start, total));
    }
    let start_line = spec.start;
    let end_line = spec.end.min(total);

    let context_start = start_line.saturating_sub(window).max(1);
    let context_end = (end_line + window).min(total);

    let mut context = LineContext {
        file_path: path.to_path_buf(),
        start_line,
        end_line,
        context_start,
        context_end,
        total_file_lines: total,
        detected_kind: DetectedKind::detect(path, &lines),
        lines_before: Vec::new(),
        target_lines: Vec::new(),
        lines_after: Vec::new(),
    };

    for (idx, text) in lines
        .iter()
        .enumerate()
        .take(context_end)
        .skip(context_start - 1)
    {
        let number = idx + 1;
        let line = NumberedLine {
            number,
            text: text.trim_end().to_string(),
        };
        if number < start_line {
            context.lines_before.push(line);
        } else if number <= end_line {
            context.target_lines.push(line);
        } else {
            context.lines_after.push(line);
        }
    }

    Ok(context)
}
