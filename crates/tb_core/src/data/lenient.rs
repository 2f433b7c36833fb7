// Hand-edited JSON: BOM and comments are tolerated
use crate::error::{Result, TeamError};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Removes a leading BOM and `//` / `/* */` comments outside string literals.
///
/// Line comments keep their terminating newline so error positions still
/// point at the right line.
pub fn strip_json_comments(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Parses JSON text after stripping BOM and comments.
pub fn parse_json_lenient<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    serde_json::from_str(strip_json_comments(text).trim())
}

/// Reads and parses one reference table.
pub fn load_json_lenient<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let table = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let text = std::fs::read_to_string(path)
        .map_err(|e| TeamError::ReferenceDataLoadFailure { table: table.clone(), reason: e.to_string() })?;
    parse_json_lenient(&text).map_err(|e| TeamError::ReferenceDataLoadFailure { table, reason: e.to_string() })
}
