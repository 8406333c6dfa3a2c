//! Indentation-delimited block extraction.
//!
//! Purely lexical: works on files that do not parse.

/// Leading whitespace width of a line (tabs count as one column)
pub fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// True for lines that never terminate a block
fn is_transparent(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Extract the full definition starting at `start_line` (1-indexed).
///
/// The block ends before the first non-blank, non-comment line whose
/// indentation is at or below the header's. Returns an empty string when
/// `start_line` is outside the file.
pub fn extract_block(file_text: &str, start_line: usize) -> String {
    let lines: Vec<&str> = file_text.lines().collect();
    if start_line == 0 || start_line > lines.len() {
        return String::new();
    }

    let header = lines[start_line - 1];
    let base_indent = indent_width(header);

    let mut extracted = vec![header];
    for line in &lines[start_line..] {
        if is_transparent(line) {
            extracted.push(line);
            continue;
        }
        if indent_width(line) <= base_indent {
            break;
        }
        extracted.push(line);
    }

    extracted.join("\n")
}

/// Remove the common indentation of a block so it parses as top-level code
pub fn dedent(text: &str) -> String {
    let common = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(indent_width)
        .min()
        .unwrap_or(0);

    if common == 0 {
        return text.to_string();
    }

    text.lines()
        .map(|line| {
            if line.len() >= common && line.is_char_boundary(common) {
                &line[common..]
            } else {
                line.trim_start()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
